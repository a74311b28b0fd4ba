//! Registration Controller
//!
//! Async driver around `RegistrationState`: feeds it events, performs the
//! effects it asks for, and owns the cancellable status reset timer.

use crate::form::{FormErrors, FormField};
use crate::state::{Effect, Event, RegistrationState, Ticket};
use crate::submission::{SubmissionClient, SubmissionError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Delay before a success message reverts to idle
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Form is valid; waiting for the user to confirm or cancel
    AwaitingConfirmation,
    /// Required fields are missing
    Invalid(FormErrors),
    /// A submission is still in flight
    Busy,
}

pub struct RegistrationController {
    state: Arc<Mutex<RegistrationState>>,
    client: SubmissionClient,
    reset_delay: Duration,
    reset_timer: Mutex<Option<JoinHandle<()>>>,
}

impl RegistrationController {
    pub fn new(client: SubmissionClient) -> Self {
        Self::with_reset_delay(client, DEFAULT_RESET_DELAY)
    }

    pub fn with_reset_delay(client: SubmissionClient, reset_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistrationState::new())),
            client,
            reset_delay,
            reset_timer: Mutex::new(None),
        }
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> RegistrationState {
        self.state.lock().clone()
    }

    pub fn client(&self) -> &SubmissionClient {
        &self.client
    }

    fn dispatch(&self, event: Event) -> Option<Effect> {
        self.state.lock().update(event)
    }

    pub fn edit(&self, field: FormField, value: impl Into<String>) {
        self.dispatch(Event::FieldEdited {
            field,
            value: value.into(),
        });
    }

    /// Validate and, if the form is complete, open the confirmation gate
    pub fn request_submit(&self) -> SubmitAttempt {
        let mut state = self.state.lock();
        if state.is_submitting() {
            return SubmitAttempt::Busy;
        }
        state.update(Event::SubmitRequested);
        if state.gate().is_open() {
            SubmitAttempt::AwaitingConfirmation
        } else {
            SubmitAttempt::Invalid(state.errors().clone())
        }
    }

    pub fn cancel(&self) {
        self.dispatch(Event::ConfirmCancelled);
    }

    /// Send the confirmed snapshot.
    ///
    /// Returns `None` when the confirm was refused: the gate was not open or
    /// another submission is still in flight.
    pub async fn confirm(&self) -> Option<Result<(), SubmissionError>> {
        let (ticket, form) = match self.dispatch(Event::ConfirmAccepted) {
            Some(Effect::Submit { ticket, form }) => (ticket, form),
            _ => {
                debug!("Confirm refused");
                return None;
            }
        };

        // A new submission supersedes any pending reset.
        self.cancel_reset_timer();

        let result = self.client.submit(&form).await;
        let reported = result.as_ref().map(|_| ()).map_err(|e| e.to_string());
        let effect = self.dispatch(Event::SubmissionFinished {
            ticket,
            result: reported,
        });
        if let Some(Effect::ScheduleStatusReset { ticket }) = effect {
            self.schedule_reset(ticket);
        }
        Some(result)
    }

    fn schedule_reset(&self, ticket: Ticket) {
        let state = Arc::clone(&self.state);
        let delay = self.reset_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.lock().update(Event::StatusResetElapsed { ticket });
        });
        if let Some(previous) = self.reset_timer.lock().replace(handle) {
            previous.abort();
        }
    }

    fn cancel_reset_timer(&self) {
        if let Some(handle) = self.reset_timer.lock().take() {
            handle.abort();
        }
    }

    /// Stop reacting to outstanding work; used on logout
    pub fn detach(&self) {
        info!("Registration view detached");
        self.cancel_reset_timer();
        self.dispatch(Event::Detached);
    }
}

impl std::fmt::Debug for RegistrationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationController")
            .field("state", &*self.state.lock())
            .field("endpoint", &self.client.endpoint())
            .field("reset_delay", &self.reset_delay)
            .finish()
    }
}

impl Drop for RegistrationController {
    fn drop(&mut self) {
        if let Some(handle) = self.reset_timer.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SubmitStatus;
    use httpmock::prelude::*;

    fn fill(controller: &RegistrationController) {
        controller.edit(FormField::FullName, "Jane Doe");
        controller.edit(FormField::EntryNumber, "2021CS123");
        controller.edit(FormField::PhoneNumber, "9999999999");
        controller.edit(FormField::Town, "Delhi");
        controller.edit(FormField::State, "Delhi");
    }

    fn controller_for(url: String, delay: Duration) -> RegistrationController {
        RegistrationController::with_reset_delay(SubmissionClient::new(Some(url)), delay)
    }

    #[test]
    fn test_request_submit_reports_missing_fields() {
        let controller = RegistrationController::new(SubmissionClient::new(None));
        controller.edit(FormField::Town, "Delhi");
        match controller.request_submit() {
            SubmitAttempt::Invalid(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(!errors.contains_key(&FormField::Town));
            }
            other => panic!("unexpected attempt {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_confirm_without_gate_is_refused() {
        let controller = RegistrationController::new(SubmissionClient::new(None));
        fill(&controller);
        assert!(controller.confirm().await.is_none());
        assert_eq!(controller.request_submit(), SubmitAttempt::AwaitingConfirmation);
        controller.cancel();
        assert!(controller.confirm().await.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_surfaces_configuration_error() {
        let controller = RegistrationController::new(SubmissionClient::new(None));
        fill(&controller);
        controller.request_submit();
        let result = controller.confirm().await.expect("confirm accepted");
        assert!(matches!(result, Err(SubmissionError::NotConfigured)));

        let state = controller.snapshot();
        assert!(state.status().is_error());
        assert!(!state.is_submitting());
        // form kept so the user can retry
        assert_eq!(state.form().full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_success_resets_form_then_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rows");
            then.status(201).body(r#"{"created":1}"#);
        });

        let controller = controller_for(server.url("/rows"), Duration::from_millis(50));
        fill(&controller);
        controller.request_submit();
        controller.confirm().await.unwrap().unwrap();

        let state = controller.snapshot();
        assert_eq!(state.status(), &SubmitStatus::Success);
        assert!(state.form().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(controller.snapshot().status(), &SubmitStatus::Idle);
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_pending_reset_does_not_clobber_new_error() {
        let server = MockServer::start();
        let mut ok = server.mock(|when, then| {
            when.method(POST).path("/rows");
            then.status(201);
        });

        let controller = controller_for(server.url("/rows"), Duration::from_millis(200));
        fill(&controller);
        controller.request_submit();
        controller.confirm().await.unwrap().unwrap();

        ok.delete();
        server.mock(|when, then| {
            when.method(POST).path("/rows");
            then.status(500).body(r#"{"message":"quota exceeded"}"#);
        });

        fill(&controller);
        controller.request_submit();
        assert!(controller.confirm().await.unwrap().is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        match controller.snapshot().status() {
            SubmitStatus::Error(message) => assert!(message.contains("quota exceeded")),
            other => panic!("status was reset to {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_confirm_sends_one_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rows");
            then.status(201).delay(Duration::from_millis(200));
        });

        let controller = Arc::new(controller_for(server.url("/rows"), DEFAULT_RESET_DELAY));
        fill(&controller);
        controller.request_submit();

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.confirm().await })
        };
        // wait until the first request is in flight
        while !controller.snapshot().is_submitting() {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.request_submit(), SubmitAttempt::Busy);
        assert!(controller.confirm().await.is_none());

        let outcome = first.await.unwrap();
        assert!(matches!(outcome, Some(Ok(()))));
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_response_after_detach_is_ignored() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/rows");
            then.status(201).delay(Duration::from_millis(200));
        });

        let controller = Arc::new(controller_for(server.url("/rows"), DEFAULT_RESET_DELAY));
        fill(&controller);
        controller.request_submit();

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.confirm().await })
        };
        while !controller.snapshot().is_submitting() {
            tokio::task::yield_now().await;
        }
        controller.detach();
        pending.await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.status(), &SubmitStatus::Idle);
        assert_eq!(state.form().full_name, "Jane Doe");
        assert!(!state.is_submitting());
    }
}
