use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CreateDevis, Devis, DevisSummary};

/// Devis repository: parameterized SQL against the `projects` table.
/// Owns column mapping only; validation and error wording live in the
/// handler layer.
pub struct DevisRepository;

impl DevisRepository {
    /// Insert a quote request and return the generated identifier.
    ///
    /// Each call is a single statement; no transaction spans the insert.
    pub async fn create(
        pool: &PgPool,
        user_id: Option<Uuid>,
        input: &CreateDevis,
    ) -> AppResult<i64> {
        let tasks = serde_json::to_string(&input.tasks).unwrap_or_else(|_| "[]".to_string());

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO projects (
                user_id, client_name, client_email, client_phone, project_address,
                project_type, surface, budget, description, tasks,
                additional_tasks, deadline, style, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&input.client_name)
        .bind(&input.client_email)
        .bind(&input.client_phone)
        .bind(&input.project_address)
        .bind(&input.project_type)
        .bind(input.surface)
        .bind(&input.budget)
        .bind(&input.description)
        .bind(&tasks)
        .bind(&input.additional_tasks)
        .bind(input.deadline)
        .bind(&input.style)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// List a user's quote requests, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> AppResult<Vec<DevisSummary>> {
        let rows = sqlx::query_as::<_, DevisSummary>(
            r#"
            SELECT id, client_name, project_type, surface, budget, status, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Fetch a full row by identifier.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Devis> {
        let devis = sqlx::query_as::<_, Devis>(
            r#"
            SELECT id, user_id, client_name, client_email, client_phone,
                   project_address, project_type, surface, budget, description,
                   tasks, additional_tasks, deadline, style, status, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(devis)
    }
}
