//! HTTP client wrapper.
//!
//! Builds [`ApiRequest`]s for the management and website APIs, hands them to a
//! transport, and normalizes every failure into an [`ApiError`] carrying a
//! human-readable message.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::credential::Credential;
use crate::error::{ApiError, Result};
use crate::form::{FormData, METHOD_FIELD};
use crate::transport::{ApiRequest, ApiResponse, ApiScope, BaseTransport, HttpMethod, ReqwestTransport};

/// Response bodies come either wrapped as `{ "data": ... }` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Shared API client. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn BaseTransport>,
    base_url: String,
}

impl ApiClient {
    /// Client using the reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn BaseTransport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, scope: ApiScope, path: &str) -> String {
        format!("{}{}{}", self.base_url, scope.prefix(), path)
    }

    /// Build a request value without sending it.
    pub fn request(
        &self,
        method: HttpMethod,
        scope: ApiScope,
        path: &str,
        form: Option<FormData>,
        credential: Option<&Credential>,
    ) -> ApiRequest {
        ApiRequest {
            method,
            scope,
            path: path.to_string(),
            url: self.url(scope, path),
            form,
            bearer: credential.map(|c| c.token().to_string()),
        }
    }

    /// GET and decode.
    pub async fn get<T: DeserializeOwned>(
        &self,
        scope: ApiScope,
        path: &str,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<T> {
        let request = self.request(HttpMethod::Get, scope, path, None, credential);
        let response = self.send(request, fallback).await?;
        decode(&response, fallback)
    }

    /// Plain multipart POST, no `_method` override.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormData,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<T> {
        let request = self.request(
            HttpMethod::Post,
            ApiScope::Management,
            path,
            Some(form),
            credential,
        );
        let response = self.send(request, fallback).await?;
        decode(&response, fallback)
    }

    /// Create: POST with `_method=POST`.
    pub async fn create<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormData,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<T> {
        self.post(path, form.text(METHOD_FIELD, "POST"), credential, fallback)
            .await
    }

    /// Update: POST with `_method=PUT`.
    pub async fn update<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormData,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<T> {
        self.post(path, form.text(METHOD_FIELD, "PUT"), credential, fallback)
            .await
    }

    /// Partial update: POST with `_method=PATCH`.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormData,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<T> {
        self.post(path, form.text(METHOD_FIELD, "PATCH"), credential, fallback)
            .await
    }

    /// DELETE. The response body is ignored.
    pub async fn delete(
        &self,
        path: &str,
        credential: Option<&Credential>,
        fallback: &str,
    ) -> Result<()> {
        let request = self.request(
            HttpMethod::Delete,
            ApiScope::Management,
            path,
            None,
            credential,
        );
        self.send(request, fallback).await?;
        Ok(())
    }

    /// Execute a request and normalize failures.
    pub async fn send(&self, request: ApiRequest, fallback: &str) -> Result<ApiResponse> {
        debug!(
            method = %request.method,
            url = %request.url,
            fields = request.form.as_ref().map(|f| f.len()).unwrap_or(0),
            authenticated = request.bearer.is_some(),
            "Sending API request"
        );

        let method = request.method;
        let url = request.url.clone();
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, error = %e, "API request failed before a response");
                return Err(ApiError::Network {
                    message: fallback.to_string(),
                });
            }
        };

        if !response.is_success() {
            let message = error_message(&response.body).unwrap_or_else(|| fallback.to_string());
            warn!(%method, %url, status = response.status, %message, "API returned an error");
            return Err(ApiError::Api {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }
}

/// Decode a success body, accepting `{ "data": T }` or a bare `T`.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse, fallback: &str) -> Result<T> {
    serde_json::from_str::<Envelope<T>>(&response.body)
        .map(Envelope::into_inner)
        .map_err(|e| {
            warn!(error = %e, "Unexpected API response shape");
            ApiError::Decode {
                message: fallback.to_string(),
            }
        })
}

/// Pull a non-empty `message` out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays one canned outcome and keeps the request it saw.
    struct Canned {
        outcome: std::result::Result<ApiResponse, TransportError>,
        seen: Mutex<Option<ApiRequest>>,
    }

    impl Canned {
        fn new(outcome: std::result::Result<ApiResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl BaseTransport for Canned {
        async fn execute(
            &self,
            request: ApiRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            *self.seen.lock().unwrap() = Some(request);
            self.outcome.clone()
        }
    }

    #[test]
    fn test_url_joins_scope_and_trims_slash() {
        let client = ApiClient::new("https://cms.example.com/");
        assert_eq!(
            client.url(ApiScope::Management, "/news"),
            "https://cms.example.com/api/news"
        );
        assert_eq!(
            client.url(ApiScope::Website, "/home"),
            "https://cms.example.com/api/website/home"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"The title field is required."}"#),
            Some("The title field is required.".to_string())
        );
        assert_eq!(error_message(r#"{"message":"   "}"#), None);
        assert_eq!(error_message(r#"{"error":"nope"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_decode_accepts_wrapped_and_bare() {
        let wrapped = ApiResponse::new(200, r#"{"data":[1,2,3]}"#);
        let bare = ApiResponse::new(200, "[4,5]");

        let a: Vec<u32> = decode(&wrapped, "x").unwrap();
        let b: Vec<u32> = decode(&bare, "x").unwrap();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_bearer_is_attached_when_present() {
        let transport = Canned::new(Ok(ApiResponse::new(200, "[]")));
        let client = ApiClient::with_transport("http://cms.test", transport.clone());

        let credential = Credential::new("tok-1");
        let _: Vec<u32> = client
            .get(ApiScope::Management, "/faqs", Some(&credential), "Failed to fetch FAQs")
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.bearer.as_deref(), Some("tok-1"));
        assert_eq!(seen.url, "http://cms.test/api/faqs");
    }

    #[tokio::test]
    async fn test_update_is_post_with_put_override() {
        let transport = Canned::new(Ok(ApiResponse::new(200, r#"{"data":{}}"#)));
        let client = ApiClient::with_transport("http://cms.test", transport.clone());

        let _: serde_json::Value = client
            .update("/news/4", FormData::new().text("title", "x"), None, "Failed")
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.method, HttpMethod::Post);
        assert_eq!(seen.simulated_method(), Some("PUT"));
    }

    #[tokio::test]
    async fn test_api_error_uses_body_message_or_fallback() {
        let with_message = Canned::new(Ok(ApiResponse::new(
            422,
            r#"{"message":"Title is taken"}"#,
        )));
        let client = ApiClient::with_transport("http://cms.test", with_message);
        let err = client
            .delete("/news/1", None, "Failed to delete news")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                status: 422,
                message: "Title is taken".into()
            }
        );

        let without_message = Canned::new(Ok(ApiResponse::new(500, "Internal Server Error")));
        let client = ApiClient::with_transport("http://cms.test", without_message);
        let err = client
            .delete("/news/1", None, "Failed to delete news")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to delete news");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_network_error() {
        let transport = Canned::new(Err(TransportError("connection refused".into())));
        let client = ApiClient::with_transport("http://cms.test", transport);

        let err = client
            .get::<Vec<u32>>(ApiScope::Management, "/services", None, "Failed to fetch services")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Network {
                message: "Failed to fetch services".into()
            }
        );
    }
}
