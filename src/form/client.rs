use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::state::{DevisPayload, SubmitOutcome};

/// Default request timeout; a hung connection ends up in demo mode after
/// this long. Overridable via DEVIS_HTTP_TIMEOUT_SECS in the form binary.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the devis endpoint. Produces [`SubmitOutcome`]s for the
/// form state machine; never panics or errors past this boundary.
pub struct DevisClient {
    client: Client,
    base_url: String,
}

/// The `{success, message}` envelope every devis response carries.
#[derive(Debug, Default, Deserialize)]
struct ApiBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl DevisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Send a submission and classify the result.
    ///
    /// Transport failures and server-error statuses both count as
    /// [`SubmitOutcome::Unreachable`]: the caller cannot tell them apart and
    /// degrades to demo mode either way.
    pub async fn submit(&self, payload: &DevisPayload, token: Option<&str>) -> SubmitOutcome {
        let mut request = self
            .client
            .post(format!("{}/api/devis/create", self.base_url))
            .json(payload);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Devis submission got no response");
                return SubmitOutcome::Unreachable;
            }
        };

        let status = response.status();
        if status.is_server_error() {
            return SubmitOutcome::Unreachable;
        }

        let body: ApiBody = response.json().await.unwrap_or_default();

        if status.is_success() && body.success {
            SubmitOutcome::Accepted {
                message: body.message,
            }
        } else {
            SubmitOutcome::Rejected {
                status: status.as_u16(),
                message: body.message,
            }
        }
    }
}
