//! Registration State Management
//!
//! The registration form is an explicit state struct driven by discrete
//! events. `RegistrationState::update` applies one event and returns the side
//! effect (if any) the driver must perform; it never performs I/O itself.

use crate::form::{validate, FormErrors, FormField, RegistrationForm};
use tracing::debug;

/// Identifies one submission; stale tickets are ignored
pub type Ticket = u64;

/// Outcome shown below the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error(String),
}

impl SubmitStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Second explicit confirmation before anything is sent.
///
/// Holds the snapshot that passed validation when the gate was opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmGate {
    snapshot: Option<RegistrationForm>,
}

impl ConfirmGate {
    pub fn is_open(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&RegistrationForm> {
        self.snapshot.as_ref()
    }

    fn open(&mut self, snapshot: RegistrationForm) {
        self.snapshot = Some(snapshot);
    }

    fn close(&mut self) -> Option<RegistrationForm> {
        self.snapshot.take()
    }
}

/// User or runtime event fed into the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FieldEdited { field: FormField, value: String },
    SubmitRequested,
    ConfirmCancelled,
    ConfirmAccepted,
    SubmissionFinished {
        ticket: Ticket,
        result: Result<(), String>,
    },
    StatusResetElapsed { ticket: Ticket },
    /// The owning view went away (logout)
    Detached,
}

/// Work the driver must perform after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post this snapshot, then report back with `SubmissionFinished`
    Submit {
        ticket: Ticket,
        form: RegistrationForm,
    },
    /// Report `StatusResetElapsed` after the reset delay
    ScheduleStatusReset { ticket: Ticket },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationState {
    form: RegistrationForm,
    errors: FormErrors,
    gate: ConfirmGate,
    status: SubmitStatus,
    in_flight: Option<Ticket>,
    generation: Ticket,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn gate(&self) -> &ConfirmGate {
        &self.gate
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// A request is outstanding; the submit control must be disabled
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn update(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::FieldEdited { field, value } => {
                if self.gate.is_open() {
                    debug!("Ignoring edit to {} while confirmation is pending", field);
                    return None;
                }
                self.form.set(field, value);
                self.errors.remove(&field);
                None
            }
            Event::SubmitRequested => {
                if self.is_submitting() {
                    debug!("Submit requested while a submission is in flight");
                    return None;
                }
                self.errors = validate(&self.form);
                if self.errors.is_empty() {
                    self.gate.open(self.form.clone());
                }
                None
            }
            Event::ConfirmCancelled => {
                self.gate.close();
                None
            }
            Event::ConfirmAccepted => {
                if self.is_submitting() {
                    debug!("Confirm ignored: submission already in flight");
                    return None;
                }
                let form = self.gate.close()?;
                self.generation += 1;
                self.in_flight = Some(self.generation);
                self.status = SubmitStatus::Idle;
                Some(Effect::Submit {
                    ticket: self.generation,
                    form,
                })
            }
            Event::SubmissionFinished { ticket, result } => {
                if self.in_flight != Some(ticket) {
                    debug!("Dropping result of stale submission {}", ticket);
                    return None;
                }
                self.in_flight = None;
                match result {
                    Ok(()) => {
                        self.status = SubmitStatus::Success;
                        self.form = RegistrationForm::default();
                        self.errors.clear();
                        Some(Effect::ScheduleStatusReset { ticket })
                    }
                    Err(message) => {
                        self.status = SubmitStatus::Error(message);
                        None
                    }
                }
            }
            Event::StatusResetElapsed { ticket } => {
                if ticket == self.generation && self.status == SubmitStatus::Success {
                    self.status = SubmitStatus::Idle;
                } else {
                    debug!("Stale status reset {} ignored", ticket);
                }
                None
            }
            Event::Detached => {
                self.generation += 1;
                self.in_flight = None;
                self.gate.close();
                None
            }
        }
    }
}
