//! Sheet Submission Client
//!
//! Posts a registration as a single row to a spreadsheet-backed HTTP API
//! (SheetDB / Sheet.best style). The API maps JSON object keys onto the
//! sheet's column headers, so the keys below must match the header row
//! exactly, case included.

use crate::form::RegistrationForm;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Endpoints containing this marker were never filled in
pub const PLACEHOLDER_MARKER: &str = "PASTE_YOUR";

/// Appended to every rejected or failed submission
pub const HEADER_HINT: &str = "Please double-check that your sheet headers are exactly: Name, Entry, Phone, Town, State, Remarks (case-sensitive).";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Configuration error: The submission URL is not set. Please follow the setup guide.")]
    NotConfigured,
    #[error("Error: {message}. {hint}", hint = HEADER_HINT)]
    Rejected { status: u16, message: String },
    #[error("Error: {0}. {hint}", hint = HEADER_HINT)]
    Transport(#[from] reqwest::Error),
}

/// One sheet row. Field order is the column order of the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Entry")]
    pub entry: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Town")]
    pub town: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Remarks", skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl From<&RegistrationForm> for SheetRow {
    fn from(form: &RegistrationForm) -> Self {
        let remarks = form.remarks.trim();
        Self {
            name: form.full_name.clone(),
            entry: form.entry_number.clone(),
            phone: form.phone_number.clone(),
            town: form.town.clone(),
            state: form.state.clone(),
            remarks: (!remarks.is_empty()).then(|| remarks.to_string()),
        }
    }
}

/// The request body: the sheet API expects an array of rows
pub fn build_payload(form: &RegistrationForm) -> Vec<SheetRow> {
    vec![SheetRow::from(form)]
}

/// Whether an endpoint value can actually be posted to
pub fn is_configured(endpoint: Option<&str>) -> bool {
    match endpoint {
        Some(url) => !url.trim().is_empty() && !url.contains(PLACEHOLDER_MARKER),
        None => false,
    }
}

/// HTTP client for the sheet endpoint
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl SubmissionClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: Option<String>, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        is_configured(self.endpoint())
    }

    /// Post the form as one sheet row.
    ///
    /// Single attempt: no timeout, no retry.
    pub async fn submit(&self, form: &RegistrationForm) -> Result<(), SubmissionError> {
        let url = match self.endpoint() {
            Some(url) if is_configured(Some(url)) => url,
            _ => {
                warn!("Sheet endpoint is not configured, submission skipped");
                return Err(SubmissionError::NotConfigured);
            }
        };

        let payload = build_payload(form);
        debug!("Submitting payload: {:?}", payload);
        info!("Submitting registration for entry {}", form.entry_number);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .inspect_err(|e| warn!("Submission request failed: {}", e))?;

        let status = response.status();
        if status.is_success() {
            info!("Registration submitted ({})", status);
            return Ok(());
        }

        // An unreadable body still ends in the status-code message.
        let body = response.text().await.unwrap_or_else(|e| {
            debug!("Failed to read error body: {}", e);
            String::new()
        });
        let message = extract_error_message(status.as_u16(), &body);
        warn!("Submission rejected with status {}: {}", status, message);
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Best-effort reason from a failed response body.
///
/// Prefers a JSON `error`, then `message` field; a body that is not JSON is
/// used verbatim; an empty body falls back to the status code.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = format!("Submission failed with status: {}", status);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(render_reason))
            .unwrap_or(fallback),
        Err(_) if !body.is_empty() => format!("Error: {}", body),
        Err(_) => fallback,
    }
}

/// Text for a reason field; null, false, zero and "" count as absent
fn render_reason(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
