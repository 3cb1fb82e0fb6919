use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// A persisted quote request (one row of the `projects` table).
///
/// Rows are created once by a submission and never updated or deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Devis {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub project_address: String,
    pub project_type: String,
    pub surface: f64,
    pub budget: String,
    pub description: String,
    /// JSON-encoded ordered list of selected task labels
    pub tasks: String,
    pub additional_tasks: String,
    pub deadline: Option<Date>,
    pub style: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl Devis {
    /// Decode the serialized task list. An unreadable encoding yields an
    /// empty list rather than an error; the column is display-only.
    pub fn task_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tasks).unwrap_or_default()
    }
}

/// Normalized submission input, ready for insertion.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevis {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub project_address: String,
    pub project_type: String,
    pub surface: f64,
    pub budget: String,
    pub description: String,
    pub tasks: Vec<String>,
    pub additional_tasks: String,
    pub deadline: Option<Date>,
    pub style: String,
}

/// Projection returned by the per-user listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DevisSummary {
    pub id: i64,
    pub client_name: String,
    pub project_type: String,
    pub surface: f64,
    pub budget: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}
