//! Remote data service
//!
//! One call per (resource, operation) pair against the REST backend:
//! - `Transport` is the object-safe seam (HTTP in production, mock in tests)
//! - `RemoteService` adds typed list/get/create/update/delete on top
//! - No retries, no caching, no batching

pub mod http;
pub mod mock;
pub mod query;

pub use http::HttpTransport;
pub use mock::{MockReply, MockTransport};
pub use query::{ListQuery, Ordering};
pub use reqwest::Method;

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A REST collection on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource(&'static str);

impl Resource {
    pub const CLIENTS: Resource = Resource("clients");
    pub const SUBCONTRACTORS: Resource = Resource("subcontractors");
    pub const EMPLOYEES: Resource = Resource("employees");

    pub const CLIENT_LOCATIONS: Resource = Resource("client-locations");
    pub const CLIENT_CONTACTS: Resource = Resource("client-contacts");
    pub const CLIENT_DOCUMENTS: Resource = Resource("client-documents");

    pub const SUBCONTRACTOR_LOCATIONS: Resource = Resource("subcontractor-locations");
    pub const SUBCONTRACTOR_CONTACTS: Resource = Resource("subcontractor-contacts");
    pub const SUBCONTRACTOR_DOCUMENTS: Resource = Resource("subcontractor-documents");
    pub const VERIFICATIONS: Resource = Resource("verifications");

    pub const EMPLOYEE_DOCUMENTS: Resource = Resource("employee-documents");
    pub const PLACEMENTS: Resource = Resource("placements");

    pub const fn new(name: &'static str) -> Self {
        Resource(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }

    /// `/{resource}/`
    pub fn collection_path(&self) -> String {
        format!("/{}/", self.0)
    }

    /// `/{resource}/{id}/`
    pub fn item_path(&self, id: i64) -> String {
        format!("/{}/{}/", self.0, id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Binary file attached to a multipart request
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Scalar fields plus an optional file, sent as `multipart/form-data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.file = Some(part);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl Payload {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartForm> {
        match self {
            Payload::Multipart(form) => Some(form),
            _ => None,
        }
    }
}

/// One backend call, fully described
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub resource: Resource,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Payload,
}

impl ApiRequest {
    fn new(method: Method, resource: Resource, path: String, payload: Payload) -> Self {
        Self {
            method,
            resource,
            path,
            query: Vec::new(),
            payload,
        }
    }

    pub fn list(resource: Resource, query: &ListQuery) -> Self {
        let mut request = Self::new(Method::GET, resource, resource.collection_path(), Payload::Empty);
        request.query = query.to_params();
        request
    }

    pub fn get(resource: Resource, id: i64) -> Self {
        Self::new(Method::GET, resource, resource.item_path(id), Payload::Empty)
    }

    pub fn create(resource: Resource, payload: Payload) -> Self {
        Self::new(Method::POST, resource, resource.collection_path(), payload)
    }

    pub fn update(resource: Resource, id: i64, payload: Payload) -> Self {
        Self::new(Method::PUT, resource, resource.item_path(id), payload)
    }

    pub fn partial_update(resource: Resource, id: i64, payload: Payload) -> Self {
        Self::new(Method::PATCH, resource, resource.item_path(id), payload)
    }

    pub fn delete(resource: Resource, id: i64) -> Self {
        Self::new(Method::DELETE, resource, resource.item_path(id), Payload::Empty)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Successful response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded body; `Null` when the backend sent nothing
    pub data: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, data: serde_json::Value) -> Self {
        Self { status, data }
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Decode the body into a record; an empty body is an error
    pub fn into_record<T: DeserializeOwned>(self, resource: Resource) -> Result<T> {
        if !self.has_data() {
            return Err(AppError::EmptyResponse {
                resource: resource.to_string(),
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Paginated list body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Transport seam for backend calls
///
/// Implementations turn non-2xx statuses into `AppError::Api` carrying the
/// extracted `detail`/`message` text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Typed wrapper over a transport
#[derive(Clone)]
pub struct RemoteService {
    transport: Arc<dyn Transport>,
}

impl RemoteService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a prepared request as-is
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();

        tracing::debug!(method = %method, path = %path, "Sending request");

        match self.transport.execute(request).await {
            Ok(response) => {
                tracing::debug!(method = %method, path = %path, status = response.status, "Request completed");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Request failed");
                Err(e)
            }
        }
    }

    /// `GET /{resource}/` with page, ordering, and filters
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource, query: &ListQuery) -> Result<Page<T>> {
        let response = self.execute(ApiRequest::list(resource, query)).await?;
        if !response.has_data() {
            return Ok(Page::default());
        }
        Ok(serde_json::from_value(response.data)?)
    }

    /// `GET /{resource}/{id}/`
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: i64) -> Result<T> {
        let response = self.execute(ApiRequest::get(resource, id)).await?;
        if !response.has_data() {
            return Err(AppError::NotFound {
                resource: resource.to_string(),
                id,
            });
        }
        Ok(serde_json::from_value(response.data)?)
    }

    /// `POST /{resource}/`
    pub async fn create(&self, resource: Resource, payload: Payload) -> Result<ApiResponse> {
        self.execute(ApiRequest::create(resource, payload)).await
    }

    /// `PUT /{resource}/{id}/`
    pub async fn update(&self, resource: Resource, id: i64, payload: Payload) -> Result<ApiResponse> {
        self.execute(ApiRequest::update(resource, id, payload)).await
    }

    /// `PATCH /{resource}/{id}/`
    pub async fn partial_update(&self, resource: Resource, id: i64, payload: Payload) -> Result<ApiResponse> {
        self.execute(ApiRequest::partial_update(resource, id, payload)).await
    }

    /// `DELETE /{resource}/{id}/`
    pub async fn delete(&self, resource: Resource, id: i64) -> Result<()> {
        self.execute(ApiRequest::delete(resource, id)).await?;
        Ok(())
    }
}
