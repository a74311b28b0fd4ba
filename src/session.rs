//! Login session: gates access to the registration form

use crate::auth::{check, AuthError, Authenticator, StaticAuthenticator};
use crate::config::AppConfig;
use crate::controller::RegistrationController;
use crate::submission::SubmissionClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct Session<A: Authenticator = StaticAuthenticator> {
    authenticator: A,
    client: SubmissionClient,
    reset_delay: Duration,
    registration: Option<Arc<RegistrationController>>,
}

impl Session<StaticAuthenticator> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            StaticAuthenticator::new(config.credentials.clone()),
            SubmissionClient::new(config.endpoint.clone()),
            config.reset_delay(),
        )
    }
}

impl<A: Authenticator> Session<A> {
    pub fn new(authenticator: A, client: SubmissionClient, reset_delay: Duration) -> Self {
        Self {
            authenticator,
            client,
            reset_delay,
            registration: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.registration.is_some()
    }

    /// The registration form, while logged in
    pub fn registration(&self) -> Option<&Arc<RegistrationController>> {
        self.registration.as_ref()
    }

    /// Check credentials and open a fresh registration form
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Arc<RegistrationController>, AuthError> {
        if let Err(e) = check(&self.authenticator, email, password) {
            warn!("Login failed");
            return Err(e);
        }
        info!("Logged in as {}", email);

        if let Some(previous) = self.registration.take() {
            previous.detach();
        }
        let controller = Arc::new(RegistrationController::with_reset_delay(
            self.client.clone(),
            self.reset_delay,
        ));
        self.registration = Some(Arc::clone(&controller));
        Ok(controller)
    }

    pub fn logout(&mut self) {
        if let Some(controller) = self.registration.take() {
            controller.detach();
            info!("Logged out");
        }
    }
}
