use std::time::Duration;

use serde::Serialize;
use time::Date;

use super::session::Session;
use super::validate;

/// Fixed task vocabulary offered by the form.
pub const AVAILABLE_TASKS: [&str; 12] = [
    "Plomberie",
    "Électricité",
    "Maçonnerie",
    "Menuiserie",
    "Peinture",
    "Carrelage",
    "Isolation",
    "Toiture",
    "Chauffage",
    "Climatisation",
    "Plâtrerie",
    "Revêtement de sol",
];

/// Success message stays visible this long before the form resets.
const RESET_DELAY: Duration = Duration::from_secs(3);
/// Delay between the reset and the post-success navigation.
const NAVIGATE_DELAY: Duration = Duration::from_secs(2);

/// Raw field input, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct DevisFormData {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub project_address: String,
    pub project_type: String,
    /// Free-text area field, coerced to a number at submit time
    pub surface: String,
    pub budget: String,
    pub description: String,
    /// Selected tasks in first-selection order
    pub tasks: Vec<String>,
    pub additional_tasks: String,
    /// YYYY-MM-DD, empty when no target date
    pub deadline: String,
    pub style: String,
}

impl DevisFormData {
    pub fn blank() -> Self {
        Self {
            client_name: String::new(),
            client_email: String::new(),
            client_phone: String::new(),
            project_address: String::new(),
            project_type: "construction".to_string(),
            surface: "0".to_string(),
            budget: String::new(),
            description: String::new(),
            tasks: Vec::new(),
            additional_tasks: String::new(),
            deadline: String::new(),
            style: String::new(),
        }
    }

    fn prefilled(session: &Session) -> Self {
        let mut data = Self::blank();
        if let Some(user) = &session.user {
            data.client_name = user.full_name();
            data.client_email = user.email.clone();
            data.client_phone = user.phone.clone();
        }
        data
    }
}

/// Submission lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    /// Persisted success; resets after a delay, then navigates
    Success,
    /// Local-only demo success after a connectivity failure; resets after
    /// the same delay but never navigates
    Demo,
}

/// Navigation target requested by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Dashboard,
}

/// Wire payload produced at submit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevisPayload {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub style: String,
}

/// Outcome of one submission attempt, as classified by the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted and persisted the request
    Accepted { message: Option<String> },
    /// Server answered with a client-error status (or `success: false`)
    Rejected { status: u16, message: Option<String> },
    /// No response was received, or the server answered with a server error
    Unreachable,
}

/// Quote form state machine.
///
/// Time-dependent behavior is driven entirely by the `now` arguments
/// (elapsed time since the form was opened). The caller owns the clock and
/// the network; tests advance simulated time through [`DevisForm::tick`].
#[derive(Debug)]
pub struct DevisForm {
    session: Session,
    pub data: DevisFormData,
    phase: Phase,
    error_message: Option<String>,
    success_message: Option<String>,
    reset_at: Option<Duration>,
    navigate_at: Option<Duration>,
}

impl DevisForm {
    /// Open the form with an explicit session; a signed-in user pre-fills
    /// the contact fields.
    pub fn new(session: Session) -> Self {
        let data = DevisFormData::prefilled(&session);
        Self {
            session,
            data,
            phase: Phase::Idle,
            error_message: None,
            success_message: None,
            reset_at: None,
            navigate_at: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    /// Auth token to attach to the request, when a session exists.
    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// True when no submission is in flight and no timer is pending.
    pub fn settled(&self) -> bool {
        self.phase == Phase::Idle && self.reset_at.is_none() && self.navigate_at.is_none()
    }

    /// Add the task if absent, remove it if present. First-selection order
    /// is preserved; toggling twice is the identity.
    pub fn toggle_task(&mut self, task: &str) {
        match self.data.tasks.iter().position(|t| t == task) {
            Some(index) => {
                self.data.tasks.remove(index);
            }
            None => self.data.tasks.push(task.to_string()),
        }
    }

    pub fn is_task_selected(&self, task: &str) -> bool {
        self.data.tasks.iter().any(|t| t == task)
    }

    /// Validate and enter the submitting state.
    ///
    /// Returns the payload to send, or `None` when validation failed or a
    /// submission is already in flight (double-submit guard).
    pub fn start_submit(&mut self) -> Option<DevisPayload> {
        if self.phase == Phase::Submitting {
            return None;
        }

        self.error_message = None;
        self.success_message = None;

        if let Err(message) = validate::validate(&self.data) {
            self.error_message = Some(message);
            return None;
        }

        self.phase = Phase::Submitting;

        let deadline = match self.data.deadline.trim() {
            "" => None,
            d => Some(d.to_string()),
        };

        Some(DevisPayload {
            client_name: self.data.client_name.clone(),
            client_email: self.data.client_email.clone(),
            client_phone: self.data.client_phone.clone(),
            project_address: self.data.project_address.clone(),
            project_type: self.data.project_type.clone(),
            surface: validate::parsed_surface(&self.data.surface),
            budget: self.data.budget.clone(),
            description: self.data.description.clone(),
            tasks: self.data.tasks.clone(),
            additional_tasks: self.data.additional_tasks.clone(),
            deadline,
            style: self.data.style.clone(),
        })
    }

    /// Apply the outcome of the in-flight submission.
    pub fn resolve(&mut self, outcome: SubmitOutcome, now: Duration) {
        if self.phase != Phase::Submitting {
            return;
        }

        match outcome {
            SubmitOutcome::Accepted { message } => {
                self.success_message = Some(message.unwrap_or_else(|| {
                    "Votre demande a été envoyée avec succès !".to_string()
                }));
                self.phase = Phase::Success;
                self.reset_at = Some(now + RESET_DELAY);
            }

            // Degraded mode: the connectivity error and the demo success are
            // both visible, distinct from a true success.
            SubmitOutcome::Unreachable => {
                self.error_message = Some(
                    "Impossible de se connecter au serveur. Vérifiez que le backend est démarré."
                        .to_string(),
                );
                self.success_message = Some(
                    "⚠️ Mode démo: Votre demande a été enregistrée localement".to_string(),
                );
                self.phase = Phase::Demo;
                self.reset_at = Some(now + RESET_DELAY);
            }

            SubmitOutcome::Rejected { status, message } => {
                let fallback = if status == 400 {
                    "Données invalides. Vérifiez votre formulaire."
                } else {
                    "Une erreur est survenue lors de l'envoi de votre demande"
                };
                self.error_message = Some(message.unwrap_or_else(|| fallback.to_string()));
                self.phase = Phase::Idle;
            }
        }
    }

    /// Advance timers. Returns a navigation request when one fires.
    pub fn tick(&mut self, now: Duration) -> Option<Route> {
        if let Some(at) = self.reset_at {
            if now >= at {
                self.reset_at = None;
                let navigate = self.phase == Phase::Success;
                self.reset();
                if navigate {
                    self.navigate_at = Some(now + NAVIGATE_DELAY);
                }
            }
        }

        if let Some(at) = self.navigate_at {
            if now >= at {
                self.navigate_at = None;
                return Some(self.post_success_route());
            }
        }

        None
    }

    /// Interactive cancel; the caller supplies the user's confirmation.
    pub fn cancel(&self, confirmed: bool) -> Option<Route> {
        confirmed.then_some(Route::Landing)
    }

    /// Reset fields to pre-filled defaults and clear messages.
    pub fn reset(&mut self) {
        self.data = DevisFormData::prefilled(&self.session);
        self.phase = Phase::Idle;
        self.error_message = None;
        self.success_message = None;
    }

    fn post_success_route(&self) -> Route {
        if self.session.is_logged_in() {
            Route::Dashboard
        } else {
            Route::Landing
        }
    }
}

/// Earliest selectable deadline: one month from the given day, clamped to
/// the target month's length.
pub fn min_deadline(today: Date) -> Date {
    let month = today.month().next();
    let year = if month == time::Month::January {
        today.year() + 1
    } else {
        today.year()
    };
    let day = today.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::session::SessionUser;
    use time::macros::date;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn logged_in_session() -> Session {
        Session {
            user: Some(SessionUser {
                first_name: "Jeanne".to_string(),
                last_name: "Martin".to_string(),
                email: "jeanne@example.com".to_string(),
                phone: "0601020304".to_string(),
            }),
            token: Some("token".to_string()),
        }
    }

    fn filled_form(session: Session) -> DevisForm {
        let mut form = DevisForm::new(session);
        form.data.client_name = "Jane Doe".to_string();
        form.data.client_email = "jane@x.com".to_string();
        form.data.project_type = "renovation".to_string();
        form.data.surface = "50".to_string();
        form.data.description = "Kitchen remodel".to_string();
        form
    }

    #[test]
    fn session_prefills_contact_fields() {
        let form = DevisForm::new(logged_in_session());
        assert_eq!(form.data.client_name, "Jeanne Martin");
        assert_eq!(form.data.client_email, "jeanne@example.com");
        assert_eq!(form.data.client_phone, "0601020304");

        let anonymous = DevisForm::new(Session::anonymous());
        assert_eq!(anonymous.data.client_name, "");
    }

    #[test]
    fn toggle_task_twice_is_identity() {
        let mut form = DevisForm::new(Session::anonymous());

        form.toggle_task("Plomberie");
        assert!(form.is_task_selected("Plomberie"));

        form.toggle_task("Plomberie");
        assert!(!form.is_task_selected("Plomberie"));
        assert!(form.data.tasks.is_empty());
    }

    #[test]
    fn toggle_preserves_first_selection_order() {
        let mut form = DevisForm::new(Session::anonymous());

        form.toggle_task("Peinture");
        form.toggle_task("Plomberie");
        form.toggle_task("Isolation");
        form.toggle_task("Plomberie"); // deselect the middle one

        assert_eq!(form.data.tasks, vec!["Peinture", "Isolation"]);
    }

    #[test]
    fn invalid_form_does_not_submit() {
        let mut form = DevisForm::new(Session::anonymous());
        form.data.client_name = "Jane".to_string();

        assert!(form.start_submit().is_none());
        assert_eq!(form.phase(), Phase::Idle);
        assert_eq!(form.error_message(), Some("L'email est requis"));
    }

    #[test]
    fn payload_coerces_surface_and_omits_empty_deadline() {
        let mut form = filled_form(Session::anonymous());
        form.data.surface = "abc".to_string();

        let payload = form.start_submit().unwrap();
        assert_eq!(payload.surface, 0.0);
        assert_eq!(payload.deadline, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("deadline").is_none());
        assert_eq!(json["clientName"], "Jane Doe");
    }

    #[test]
    fn double_submission_is_guarded() {
        let mut form = filled_form(Session::anonymous());

        assert!(form.start_submit().is_some());
        assert_eq!(form.phase(), Phase::Submitting);
        // Second trigger while in flight is a no-op
        assert!(form.start_submit().is_none());
        assert_eq!(form.phase(), Phase::Submitting);
    }

    #[test]
    fn success_resets_then_navigates_to_dashboard() {
        let mut form = filled_form(logged_in_session());
        form.start_submit().unwrap();

        form.resolve(SubmitOutcome::Accepted { message: None }, secs(1));
        assert_eq!(form.phase(), Phase::Success);
        assert_eq!(
            form.success_message(),
            Some("Votre demande a été envoyée avec succès !")
        );

        // Nothing happens before the 3-second display window closes
        assert_eq!(form.tick(secs(3)), None);
        assert_eq!(form.phase(), Phase::Success);

        // Reset fires at +3s; fields return to pre-filled defaults
        assert_eq!(form.tick(secs(4)), None);
        assert_eq!(form.phase(), Phase::Idle);
        assert_eq!(form.data.client_name, "Jeanne Martin");
        assert_eq!(form.success_message(), None);

        // Navigation fires 2s after the reset
        assert_eq!(form.tick(secs(5)), None);
        assert_eq!(form.tick(secs(6)), Some(Route::Dashboard));
        assert!(form.settled());
    }

    #[test]
    fn anonymous_success_navigates_to_landing() {
        let mut form = filled_form(Session::anonymous());
        form.start_submit().unwrap();

        form.resolve(
            SubmitOutcome::Accepted {
                message: Some("Votre demande de devis a été envoyée avec succès !".to_string()),
            },
            secs(0),
        );
        assert_eq!(
            form.success_message(),
            Some("Votre demande de devis a été envoyée avec succès !")
        );

        assert_eq!(form.tick(secs(3)), None);
        assert_eq!(form.tick(secs(5)), Some(Route::Landing));
    }

    #[test]
    fn unreachable_server_enters_demo_mode() {
        let mut form = filled_form(Session::anonymous());
        form.start_submit().unwrap();

        form.resolve(SubmitOutcome::Unreachable, secs(1));
        assert_eq!(form.phase(), Phase::Demo);

        // Both messages are visible at once
        assert_eq!(
            form.error_message(),
            Some("Impossible de se connecter au serveur. Vérifiez que le backend est démarré.")
        );
        assert_eq!(
            form.success_message(),
            Some("⚠️ Mode démo: Votre demande a été enregistrée localement")
        );

        // Resets after 3 seconds, but never navigates
        assert_eq!(form.tick(secs(4)), None);
        assert_eq!(form.phase(), Phase::Idle);
        assert_eq!(form.error_message(), None);
        assert_eq!(form.success_message(), None);
        assert_eq!(form.tick(secs(60)), None);
        assert!(form.settled());
    }

    #[test]
    fn client_error_surfaces_server_message_or_fallback() {
        let mut form = filled_form(Session::anonymous());
        form.start_submit().unwrap();
        form.resolve(
            SubmitOutcome::Rejected {
                status: 400,
                message: Some("Une demande similaire existe déjà".to_string()),
            },
            secs(1),
        );
        assert_eq!(form.phase(), Phase::Idle);
        assert_eq!(
            form.error_message(),
            Some("Une demande similaire existe déjà")
        );

        let mut form = filled_form(Session::anonymous());
        form.start_submit().unwrap();
        form.resolve(
            SubmitOutcome::Rejected {
                status: 400,
                message: None,
            },
            secs(1),
        );
        assert_eq!(
            form.error_message(),
            Some("Données invalides. Vérifiez votre formulaire.")
        );
    }

    #[test]
    fn cancel_requires_confirmation() {
        let form = DevisForm::new(Session::anonymous());
        assert_eq!(form.cancel(false), None);
        assert_eq!(form.cancel(true), Some(Route::Landing));
    }

    #[test]
    fn min_deadline_is_one_month_out() {
        assert_eq!(min_deadline(date!(2026 - 08 - 29)), date!(2026 - 09 - 29));
        // Clamped to the target month's length
        assert_eq!(min_deadline(date!(2026 - 01 - 31)), date!(2026 - 02 - 28));
        // Year rollover
        assert_eq!(min_deadline(date!(2026 - 12 - 15)), date!(2027 - 01 - 15));
    }
}
