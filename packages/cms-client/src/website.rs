//! Public, read-only website API. No credential is ever sent.

use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiScope;
use crate::types::{AboutPage, HomePage, MinService, News};

#[derive(Clone)]
pub struct WebsiteClient {
    client: ApiClient,
}

impl WebsiteClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn home(&self) -> Result<HomePage> {
        self.client
            .get(ApiScope::Website, "/home", None, "Failed to load home page")
            .await
    }

    pub async fn min_services(&self) -> Result<Vec<MinService>> {
        self.client
            .get(
                ApiScope::Website,
                "/get-min-service",
                None,
                "Failed to fetch min services",
            )
            .await
    }

    pub async fn about_us(&self) -> Result<AboutPage> {
        self.client
            .get(ApiScope::Website, "/about-us", None, "Failed to load about page")
            .await
    }

    pub async fn news(&self) -> Result<Vec<News>> {
        self.client
            .get(ApiScope::Website, "/get-news", None, "Failed to fetch news")
            .await
    }
}
