//! REST client for the student-loan site's content API.
//!
//! Covers the authenticated management API (`/api/...`) used by the admin
//! dashboard and the public website API (`/api/website/...`). Every resource
//! goes through one generic [`Resource<T>`]; mutations are multipart so
//! images can ride along.
//!
//! # Example
//!
//! ```rust,ignore
//! use cms_client::{ClientConfig, CmsClient, types::{News, NewsDraft}};
//!
//! let cms = CmsClient::new(&ClientConfig::from_env()?)?;
//! cms.auth().login("admin@example.com", "secret").await?;
//!
//! let news = cms.resource::<News>();
//! let created = news.create(&NewsDraft {
//!     title: "Rates drop".into(),
//!     content: "...".into(),
//!     ..Default::default()
//! }).await?;
//! news.delete(&created.id).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod form;
pub mod resource;
pub mod testing;
pub mod transport;
pub mod types;
pub mod website;

pub use auth::{AuthError, AuthService};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use credential::{Credential, CredentialStore};
pub use error::{ApiError, ConfigError, CredentialError, Result, TransportError};
pub use form::{FileUpload, FormData, FormValue, ImageInput};
pub use resource::{
    Draft, Entity, PublishService, PublishToggle, Publishable, Resource, ResourceService,
};
pub use transport::{ApiRequest, ApiResponse, ApiScope, BaseTransport, HttpMethod, ReqwestTransport};
pub use types::EntityId;
pub use website::WebsiteClient;

use std::sync::Arc;

/// Entry point bundling the API client and the credential store.
#[derive(Clone)]
pub struct CmsClient {
    client: ApiClient,
    credentials: Arc<CredentialStore>,
}

impl CmsClient {
    /// Build a reqwest-backed client. Loads the persisted credential when a
    /// token file is configured.
    pub fn new(config: &ClientConfig) -> std::result::Result<Self, CredentialError> {
        let credentials = match &config.token_file {
            Some(path) => CredentialStore::with_file(path)?,
            None => CredentialStore::new(),
        };
        Ok(Self {
            client: ApiClient::new(config.api_url.clone()),
            credentials: Arc::new(credentials),
        })
    }

    pub fn from_parts(client: ApiClient, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub fn resource<T: Entity>(&self) -> Resource<T> {
        Resource::new(self.client.clone(), self.credentials.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone(), self.credentials.clone())
    }

    pub fn website(&self) -> WebsiteClient {
        WebsiteClient::new(self.client.clone())
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn api(&self) -> &ApiClient {
        &self.client
    }
}
