//! Testing utilities including an in-memory backend.
//!
//! [`MockBackend`] implements [`BaseTransport`] and behaves like the real CMS
//! API closely enough to exercise resource services and admin managers
//! without a network: collections per path, never-reused ids, merged updates,
//! bearer auth, and scripted failures.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::error::TransportError;
use crate::form::{FormValue, IMAGE_FIELD, METHOD_FIELD, REMOVE_IMAGE_FIELD};
use crate::transport::{ApiRequest, ApiResponse, ApiScope, BaseTransport, HttpMethod};

/// Base URL the mock pretends to live at.
pub const MOCK_BASE_URL: &str = "http://cms.mock";

/// A scripted failure for the next request.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Api { status: u16, body: String },
    Network(String),
}

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    token: String,
}

#[derive(Default)]
struct MockState {
    collections: HashMap<String, Vec<Value>>,
    website: HashMap<String, Value>,
    accounts: Vec<Account>,
    required_token: Option<String>,
    failures: VecDeque<MockFailure>,
    calls: Vec<ApiRequest>,
    next_id: u64,
}

/// In-memory stand-in for the CMS backend.
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed a management collection, e.g. `("/faqs", vec![...])`.
    pub fn with_collection(self, path: &str, items: Vec<Value>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let max_id = items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0);
            state.next_id = state.next_id.max(max_id + 1);
            state.collections.insert(path.to_string(), items);
        }
        self
    }

    /// Canned body for a public website path, e.g. `("/home", json!({...}))`.
    pub fn with_website(self, path: &str, body: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .website
            .insert(path.to_string(), body);
        self
    }

    /// Account accepted by `POST /login`.
    pub fn with_account(self, email: &str, password: &str, token: &str) -> Self {
        self.state.lock().unwrap().accounts.push(Account {
            email: email.to_string(),
            password: password.to_string(),
            token: token.to_string(),
        });
        self
    }

    /// Reject management calls that do not carry this bearer token.
    pub fn require_token(self, token: &str) -> Self {
        self.state.lock().unwrap().required_token = Some(token.to_string());
        self
    }

    /// Answer the next request with an error status. `message` becomes the
    /// body's `message` field; `None` sends a body without one.
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        let body = match message {
            Some(message) => json!({ "message": message }).to_string(),
            None => "Internal Server Error".to_string(),
        };
        self.state
            .lock()
            .unwrap()
            .failures
            .push_back(MockFailure::Api { status, body });
    }

    /// Drop the next request as if the connection failed.
    pub fn fail_next_network(&self) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push_back(MockFailure::Network("connection refused".to_string()));
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Current contents of a collection.
    pub fn collection(&self, path: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// An [`ApiClient`] wired to this backend.
    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::with_transport(MOCK_BASE_URL, self.clone())
    }
}

#[async_trait]
impl BaseTransport for MockBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request.clone());

        if let Some(failure) = state.failures.pop_front() {
            return match failure {
                MockFailure::Api { status, body } => Ok(ApiResponse::new(status, body)),
                MockFailure::Network(reason) => Err(TransportError(reason)),
            };
        }

        Ok(state.route(&request))
    }
}

impl MockState {
    fn route(&mut self, request: &ApiRequest) -> ApiResponse {
        if request.scope == ApiScope::Website {
            return match (request.method, self.website.get(&request.path)) {
                (HttpMethod::Get, Some(body)) => respond(200, body.clone()),
                _ => not_found(),
            };
        }

        if request.path == "/login" && request.method == HttpMethod::Post {
            return self.login(request);
        }

        if let Some(required) = &self.required_token {
            if request.bearer.as_deref() != Some(required.as_str()) {
                return respond(401, json!({ "message": "Unauthenticated." }));
            }
        }

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let override_method = request.simulated_method().unwrap_or("POST");

        match (request.method, segments.as_slice()) {
            (HttpMethod::Get, [collection]) => {
                let items = self
                    .collections
                    .get(&format!("/{collection}"))
                    .cloned()
                    .unwrap_or_default();
                respond(200, json!({ "data": items }))
            }
            (HttpMethod::Get, [collection, id]) => match self.find(collection, id) {
                Some(item) => respond(200, json!({ "data": item })),
                None => not_found(),
            },
            (HttpMethod::Post, [collection]) if override_method == "POST" => {
                self.create(collection, request)
            }
            (HttpMethod::Post, [collection, id]) if override_method == "PUT" => {
                self.update(collection, id, request)
            }
            (HttpMethod::Post, [collection, id, "toggle-publish"]) if override_method == "PATCH" => {
                self.toggle(collection, id, request)
            }
            (HttpMethod::Delete, [collection, id]) => self.delete(collection, id),
            _ => respond(405, json!({ "message": "Method not allowed." })),
        }
    }

    fn login(&self, request: &ApiRequest) -> ApiResponse {
        let form = request.form.as_ref();
        let email = form.and_then(|f| f.get_text("email")).unwrap_or_default();
        let password = form.and_then(|f| f.get_text("password")).unwrap_or_default();

        match self
            .accounts
            .iter()
            .position(|a| a.email == email && a.password == password)
        {
            Some(index) => {
                let account = &self.accounts[index];
                respond(
                    200,
                    json!({
                        "token": account.token,
                        "user": { "id": index + 1, "name": "Admin", "email": account.email },
                    }),
                )
            }
            None => respond(401, json!({ "message": "Invalid credentials." })),
        }
    }

    fn find(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .get(&format!("/{collection}"))?
            .iter()
            .find(|item| id_matches(item, id))
            .cloned()
    }

    fn create(&mut self, collection: &str, request: &ApiRequest) -> ApiResponse {
        let id = self.next_id;
        self.next_id += 1;

        let now = chrono::Utc::now().to_rfc3339();
        let mut item = Map::new();
        item.insert("id".into(), json!(id));
        apply_form(&mut item, collection, id, request);
        item.insert("created_at".into(), json!(now));
        item.insert("updated_at".into(), json!(now));

        let item = Value::Object(item);
        self.collections
            .entry(format!("/{collection}"))
            .or_default()
            .push(item.clone());
        respond(201, json!({ "data": item }))
    }

    fn update(&mut self, collection: &str, id: &str, request: &ApiRequest) -> ApiResponse {
        let Some(item) = self.find_mut(collection, id) else {
            return not_found();
        };
        let numeric_id = item.get("id").and_then(Value::as_u64).unwrap_or_default();
        if let Value::Object(fields) = item {
            apply_form(fields, collection, numeric_id, request);
            fields.insert("updated_at".into(), json!(chrono::Utc::now().to_rfc3339()));
        }
        let item = item.clone();
        respond(200, json!({ "data": item }))
    }

    fn toggle(&mut self, collection: &str, id: &str, request: &ApiRequest) -> ApiResponse {
        let published = request
            .form
            .as_ref()
            .and_then(|f| f.get_text("is_published"))
            .map(|v| v == "1")
            .unwrap_or(false);
        let Some(item) = self.find_mut(collection, id) else {
            return not_found();
        };
        if let Value::Object(fields) = item {
            fields.insert("is_published".into(), json!(published));
        }
        let item = item.clone();
        respond(200, json!({ "data": item }))
    }

    fn delete(&mut self, collection: &str, id: &str) -> ApiResponse {
        let Some(items) = self.collections.get_mut(&format!("/{collection}")) else {
            return not_found();
        };
        match items.iter().position(|item| id_matches(item, id)) {
            Some(index) => {
                items.remove(index);
                respond(200, json!({ "message": "Deleted successfully." }))
            }
            None => not_found(),
        }
    }

    fn find_mut(&mut self, collection: &str, id: &str) -> Option<&mut Value> {
        self.collections
            .get_mut(&format!("/{collection}"))?
            .iter_mut()
            .find(|item| id_matches(item, id))
    }
}

/// Merge form parts into a stored record the way the backend's model casts
/// would: numeric text becomes a number, `key[]` becomes an array, an
/// uploaded file becomes a storage URL.
fn apply_form(item: &mut Map<String, Value>, collection: &str, id: u64, request: &ApiRequest) {
    let Some(form) = &request.form else {
        return;
    };

    let mut arrays: HashMap<String, Vec<Value>> = HashMap::new();
    for (key, value) in form.parts() {
        if key == METHOD_FIELD {
            continue;
        }
        if key == REMOVE_IMAGE_FIELD {
            if matches!(value, FormValue::Text(flag) if flag == "1") {
                item.insert(IMAGE_FIELD.into(), Value::Null);
            }
            continue;
        }
        match value {
            FormValue::File(file) => {
                item.insert(
                    key.clone(),
                    json!(format!("/storage/{collection}/{id}-{}", file.file_name)),
                );
            }
            FormValue::Text(text) => match key.strip_suffix("[]") {
                Some(array_key) => arrays
                    .entry(array_key.to_string())
                    .or_default()
                    .push(cast(text)),
                None => {
                    item.insert(key.clone(), cast(text));
                }
            },
        }
    }
    for (key, values) in arrays {
        item.insert(key, Value::Array(values));
    }
}

fn cast(text: &str) -> Value {
    let looks_numeric = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    match text.parse::<u64>() {
        Ok(n) if looks_numeric => json!(n),
        _ => json!(text),
    }
}

fn id_matches(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn not_found() -> ApiResponse {
    respond(404, json!({ "message": "Record not found." }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FileUpload, FormData};

    fn request(method: HttpMethod, path: &str, form: Option<FormData>) -> ApiRequest {
        ApiRequest {
            method,
            scope: ApiScope::Management,
            path: path.to_string(),
            url: format!("{MOCK_BASE_URL}/api{path}"),
            form,
            bearer: None,
        }
    }

    #[test]
    fn test_cast_numeric_text() {
        assert_eq!(cast("42"), json!(42));
        assert_eq!(cast("0"), json!(0));
        assert_eq!(cast("007"), json!("007"));
        assert_eq!(cast("Hello"), json!("Hello"));
        assert_eq!(cast(""), json!(""));
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let backend = MockBackend::new().with_collection("/news", vec![json!({"id": 4})]);

        let created = backend
            .execute(request(
                HttpMethod::Post,
                "/news",
                Some(FormData::new().text("title", "a").text(METHOD_FIELD, "POST")),
            ))
            .await
            .unwrap();
        assert_eq!(created.status, 201);
        assert_eq!(backend.collection("/news")[1]["id"], json!(5));

        backend
            .execute(request(HttpMethod::Delete, "/news/5", None))
            .await
            .unwrap();
        backend
            .execute(request(
                HttpMethod::Post,
                "/news",
                Some(FormData::new().text("title", "b").text(METHOD_FIELD, "POST")),
            ))
            .await
            .unwrap();
        assert_eq!(backend.collection("/news")[1]["id"], json!(6));
    }

    #[tokio::test]
    async fn test_update_keeps_image_without_new_upload() {
        let backend = MockBackend::new().with_collection(
            "/sliders",
            vec![json!({"id": 1, "title": "Old", "image": "/storage/sliders/1-a.png"})],
        );

        let form = FormData::new().text("title", "New").text(METHOD_FIELD, "PUT");
        backend
            .execute(request(HttpMethod::Post, "/sliders/1", Some(form)))
            .await
            .unwrap();
        let item = &backend.collection("/sliders")[0];
        assert_eq!(item["title"], json!("New"));
        assert_eq!(item["image"], json!("/storage/sliders/1-a.png"));

        let mut form = FormData::new().text(METHOD_FIELD, "PUT");
        form.push_file(IMAGE_FIELD, FileUpload::new("b.png", "image/png", vec![1]));
        backend
            .execute(request(HttpMethod::Post, "/sliders/1", Some(form)))
            .await
            .unwrap();
        assert_eq!(
            backend.collection("/sliders")[0]["image"],
            json!("/storage/sliders/1-b.png")
        );
    }

    #[tokio::test]
    async fn test_scripted_failures_are_consumed_in_order() {
        let backend = MockBackend::new();
        backend.fail_next(500, None);
        backend.fail_next_network();

        let first = backend
            .execute(request(HttpMethod::Get, "/faqs", None))
            .await
            .unwrap();
        assert_eq!(first.status, 500);

        let second = backend.execute(request(HttpMethod::Get, "/faqs", None)).await;
        assert!(second.is_err());

        let third = backend
            .execute(request(HttpMethod::Get, "/faqs", None))
            .await
            .unwrap();
        assert_eq!(third.status, 200);
        assert_eq!(backend.call_count(), 3);
    }
}
