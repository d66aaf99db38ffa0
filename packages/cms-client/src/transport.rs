//! Transport seam between the API client and the network.
//!
//! [`ApiRequest`] is a plain value built by the client; a [`BaseTransport`]
//! turns it into an HTTP exchange. Production code uses [`ReqwestTransport`],
//! tests use the in-memory mock backend.

use async_trait::async_trait;
use reqwest::header;
use reqwest::multipart::{Form, Part};

use crate::error::TransportError;
use crate::form::{FormData, FormValue, METHOD_FIELD};

/// Verbs actually put on the wire. PUT/PATCH are simulated through `_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of the API a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScope {
    /// Authenticated management API (`/api/...`)
    Management,
    /// Public read-only website API (`/api/website/...`)
    Website,
}

impl ApiScope {
    pub fn prefix(&self) -> &'static str {
        match self {
            ApiScope::Management => "/api",
            ApiScope::Website => "/api/website",
        }
    }
}

/// A fully-resolved request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub scope: ApiScope,
    /// Path relative to the scope prefix, e.g. `/news/3`
    pub path: String,
    pub url: String,
    pub form: Option<FormData>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// The `_method` override carried in the form, if any.
    pub fn simulated_method(&self) -> Option<&str> {
        self.form.as_ref().and_then(|f| f.get_text(METHOD_FIELD))
    }
}

/// Raw response: status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait BaseTransport: Send + Sync {
    /// Execute a request. Only fails when no HTTP response was received.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        }
        .header(header::ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        if let Some(form) = request.form {
            builder = builder.multipart(into_multipart(form)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

fn into_multipart(form: FormData) -> Result<Form, TransportError> {
    let mut multipart = Form::new();
    for (key, value) in form.into_parts() {
        multipart = match value {
            FormValue::Text(text) => multipart.text(key, text),
            FormValue::File(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportError(format!("invalid content type: {}", e)))?;
                multipart.part(key, part)
            }
        };
    }
    Ok(multipart)
}
