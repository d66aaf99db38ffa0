//! Login and logout.

use std::sync::Arc;
use thiserror::Error;

use crate::client::ApiClient;
use crate::credential::{Credential, CredentialStore};
use crate::error::{ApiError, CredentialError};
use crate::form::FormData;
use crate::types::LoginResponse;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Writes the credential at login and clears it at logout. The only writer
/// of the credential store.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    credentials: Arc<CredentialStore>,
}

impl AuthService {
    pub fn new(client: ApiClient, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let form = FormData::new()
            .text("email", email)
            .text("password", password);

        let response: LoginResponse = self
            .client
            .post("/login", form, None, "Login failed")
            .await?;

        self.credentials.set(Credential::new(response.token.clone()))?;
        tracing::info!(email, "Logged in");
        Ok(response)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.credentials.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_set()
    }
}
