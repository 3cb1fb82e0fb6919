//! Form-side devis submission: a pure state machine over the submission
//! lifecycle, its validation rules, and the HTTP client that feeds it.
//!
//! The machine never touches a clock or the network itself. Callers pass
//! elapsed time into [`DevisForm::tick`] and feed back [`SubmitOutcome`]s,
//! which keeps the timed success/reset/navigate transitions and the demo
//! fallback fully testable with simulated time.

pub mod client;
pub mod session;
pub mod state;
pub mod validate;

pub use client::{DevisClient, DEFAULT_TIMEOUT};
pub use session::{Session, SessionUser};
pub use state::{
    min_deadline, DevisForm, DevisFormData, DevisPayload, Phase, Route, SubmitOutcome,
    AVAILABLE_TASKS,
};
