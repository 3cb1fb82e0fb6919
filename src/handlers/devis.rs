use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;
use crate::models::{CreateDevis, DevisSummary};
use crate::repositories::DevisRepository;
use crate::services::AuthService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

/// Submission body. Every field carries an explicit default so that a
/// missing field reaches handler validation (and its 400 message) instead of
/// being rejected during deserialization.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevisRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub project_address: String,
    #[serde(default)]
    pub project_type: String,
    /// Area in m²; absent or null is stored as 0
    #[serde(default)]
    pub surface: Option<f64>,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub description: String,
    /// Ordered list of selected task labels
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub additional_tasks: String,
    /// Target date as YYYY-MM-DD; empty or absent stores NULL
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevisResponse {
    pub success: bool,
    pub message: String,
    pub devis_id: i64,
    pub client_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevisSummaryResponse {
    pub id: i64,
    pub client_name: String,
    pub project_type: String,
    pub surface: f64,
    pub budget: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl From<DevisSummary> for DevisSummaryResponse {
    fn from(d: DevisSummary) -> Self {
        Self {
            id: d.id,
            client_name: d.client_name,
            project_type: d.project_type,
            surface: d.surface,
            budget: d.budget,
            status: d.status,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DevisListResponse {
    pub success: bool,
    pub devis: Vec<DevisSummaryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub timestamp: OffsetDateTime,
}

fn parse_deadline(raw: Option<&str>) -> AppResult<Option<Date>> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Ok(None),
    };

    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format)
        .map(Some)
        .map_err(|_| AppError::Validation("Format de date limite invalide".to_string()))
}

// ============ Handlers ============

/// Submit a quote request. Public: a bearer credential is optional and only
/// associates the row with an account when it verifies.
#[utoipa::path(
    post,
    path = "/api/devis/create",
    request_body = CreateDevisRequest,
    responses(
        (status = 201, description = "Devis created successfully", body = CreateDevisResponse),
        (status = 400, description = "Missing required field, duplicate, or over-length data"),
        (status = 500, description = "Storage error")
    ),
    tag = "Devis"
)]
pub async fn create_devis(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateDevisRequest>,
) -> AppResult<(StatusCode, Json<CreateDevisResponse>)> {
    if payload.client_name.trim().is_empty()
        || payload.client_email.trim().is_empty()
        || payload.project_type.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Nom, email et type de projet sont requis".to_string(),
        ));
    }

    // Anonymous submission is a normal branch, not a swallowed failure
    let user_id = AuthService::resolve_user(
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
        &state.config,
    );

    let input = CreateDevis {
        client_name: payload.client_name.trim().to_string(),
        client_email: payload.client_email.trim().to_string(),
        client_phone: payload.client_phone,
        project_address: payload.project_address,
        project_type: payload.project_type,
        surface: payload.surface.unwrap_or(0.0),
        budget: payload.budget,
        description: payload.description,
        tasks: payload.tasks,
        additional_tasks: payload.additional_tasks,
        deadline: parse_deadline(payload.deadline.as_deref())?,
        style: payload.style,
    };

    let devis_id = DevisRepository::create(&state.pool, user_id, &input)
        .await
        .map_err(|e| {
            e.with_storage_message("Erreur serveur lors de l'envoi de votre demande")
                .redacted(state.config.is_production())
        })?;

    tracing::info!(devis_id, client_email = %input.client_email, "Devis created");

    Ok((
        StatusCode::CREATED,
        Json(CreateDevisResponse {
            success: true,
            message: "Votre demande de devis a été envoyée avec succès !".to_string(),
            devis_id,
            client_name: input.client_name,
        }),
    ))
}

/// List the authenticated user's quote requests, newest first
#[utoipa::path(
    get,
    path = "/api/devis/my-devis",
    responses(
        (status = 200, description = "The user's devis, newest first", body = DevisListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Devis"
)]
pub async fn my_devis(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DevisListResponse>> {
    let devis = DevisRepository::list_by_user(&state.pool, user.id)
        .await
        .map_err(|e| {
            e.with_storage_message("Erreur récupération devis")
                .redacted(state.config.is_production())
        })?;

    Ok(Json(DevisListResponse {
        success: true,
        devis: devis.into_iter().map(Into::into).collect(),
    }))
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/devis/test",
    responses(
        (status = 200, description = "Route is up", body = LivenessResponse)
    ),
    tag = "Devis"
)]
pub async fn devis_test() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        success: true,
        message: "Route devis fonctionne".to_string(),
        timestamp: OffsetDateTime::now_utc(),
    })
}
