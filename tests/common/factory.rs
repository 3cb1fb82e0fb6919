use time::OffsetDateTime;
use uuid::Uuid;

use batirenov::models::CreateDevis;
use batirenov::repositories::DevisRepository;
use batirenov::services::AuthService;
use batirenov::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Mint a signed token for a fresh user id. Accounts live in a separate
    /// service; a valid credential is all this API ever sees of them.
    pub fn auth_user(&self) -> TestAuth {
        let user_id = Uuid::new_v4();
        let email = format!("test-{}@example.com", user_id);
        let token = AuthService::generate_token(user_id, &email, &self.state.config).unwrap();

        TestAuth {
            user_id,
            email,
            token,
        }
    }

    /// Insert a devis row directly, bypassing the handler.
    pub async fn create_devis(&self, user_id: Option<Uuid>) -> i64 {
        let input = CreateDevis {
            client_name: "Test Client".to_string(),
            client_email: format!("client-{}@example.com", Uuid::new_v4()),
            client_phone: String::new(),
            project_address: String::new(),
            project_type: "renovation".to_string(),
            surface: 40.0,
            budget: String::new(),
            description: "Test project".to_string(),
            tasks: vec!["Peinture".to_string()],
            additional_tasks: String::new(),
            deadline: None,
            style: String::new(),
        };

        DevisRepository::create(&self.state.pool, user_id, &input)
            .await
            .unwrap()
    }

    /// Pin a row's creation timestamp for deterministic ordering checks.
    pub async fn set_created_at(&self, id: i64, created_at: OffsetDateTime) {
        sqlx::query("UPDATE projects SET created_at = $2 WHERE id = $1")
            .bind(id)
            .bind(created_at)
            .execute(&self.state.pool)
            .await
            .unwrap();
    }

    /// Count rows submitted under a given client email. The database is
    /// shared between concurrently running tests, so assertions count by a
    /// per-test marker instead of globally.
    pub async fn count_by_email(&self, client_email: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE client_email = $1")
            .bind(client_email)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }

    /// Count rows submitted under a given client name.
    pub async fn count_by_name(&self, client_name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE client_name = $1")
            .bind(client_name)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }
}
