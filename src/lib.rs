//! Registration Desk
//!
//! A credential-gated registration form whose rows are posted to a
//! spreadsheet-backed HTTP API.
//!
//! ## Module Structure
//!
//! - `auth`: credential check behind the `Authenticator` trait
//! - `form`: form data, field metadata and the required-field validator
//! - `state`: event-driven form state, confirmation gate and submit status
//! - `submission`: sheet row payload and HTTP client
//! - `controller`: async driver owning the state and the status reset timer
//! - `session`: login / logout around the registration form
//! - `config`: TOML configuration

pub mod auth;
pub mod config;
pub mod controller;
pub mod form;
pub mod session;
pub mod state;
pub mod submission;

pub use auth::{AuthError, Authenticator, Credentials, StaticAuthenticator};
pub use config::{AppConfig, ConfigError, PLACEHOLDER_ENDPOINT};
pub use controller::{RegistrationController, SubmitAttempt, DEFAULT_RESET_DELAY};
pub use form::{validate, FormErrors, FormField, RegistrationForm};
pub use session::Session;
pub use state::{ConfirmGate, Effect, Event, RegistrationState, SubmitStatus, Ticket};
pub use submission::{
    build_payload, extract_error_message, SheetRow, SubmissionClient, SubmissionError,
    HEADER_HINT,
};
