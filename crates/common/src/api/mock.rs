//! In-memory transport for testing
//!
//! Records every request and answers from scripted replies keyed by
//! method and path. Unscripted requests get `200` with an empty body.

use super::{ApiRequest, ApiResponse, Transport};
use crate::errors::{extract_error_message, AppError, Result};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Scripted answer for one request
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Respond { status: u16, body: serde_json::Value },
    Timeout { timeout_ms: u64 },
}

impl MockReply {
    pub fn ok(body: serde_json::Value) -> Self {
        MockReply::Respond { status: 200, body }
    }

    pub fn created(body: serde_json::Value) -> Self {
        MockReply::Respond { status: 201, body }
    }

    pub fn no_content() -> Self {
        MockReply::Respond { status: 204, body: serde_json::Value::Null }
    }

    pub fn error(status: u16, body: serde_json::Value) -> Self {
        MockReply::Respond { status, body }
    }

    fn into_result(self) -> Result<ApiResponse> {
        match self {
            MockReply::Respond { status, body } if (200..300).contains(&status) => {
                Ok(ApiResponse::new(status, body))
            }
            MockReply::Respond { status, body } => Err(AppError::Api {
                status,
                message: extract_error_message(&body),
            }),
            MockReply::Timeout { timeout_ms } => Err(AppError::Timeout { timeout_ms }),
        }
    }
}

#[derive(Default)]
struct Route {
    once: VecDeque<MockReply>,
    sticky: Option<MockReply>,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<ApiRequest>,
}

/// Mock transport for testing
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer every `method path` request with `reply`
    pub fn reply(&self, method: Method, path: &str, reply: MockReply) {
        self.state()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .sticky = Some(reply);
    }

    /// Answer the next `method path` request with `reply`, ahead of any sticky reply
    pub fn reply_once(&self, method: Method, path: &str, reply: MockReply) {
        self.state()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .once
            .push_back(reply);
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    /// Requests seen with the given method
    pub fn requests_with(&self, method: &Method) -> Vec<ApiRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| &r.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let reply = {
            let mut state = self.state();
            let key = (request.method.clone(), request.path.clone());
            state.requests.push(request);
            state.routes.get_mut(&key).and_then(|route| {
                route.once.pop_front().or_else(|| route.sticky.clone())
            })
        };

        reply
            .unwrap_or_else(|| MockReply::ok(serde_json::Value::Null))
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use serde_json::json;

    #[tokio::test]
    async fn test_once_replies_take_priority() {
        let mock = MockTransport::new();
        mock.reply(Method::GET, "/clients/1/", MockReply::ok(json!({"id": 1})));
        mock.reply_once(Method::GET, "/clients/1/", MockReply::error(500, json!({"detail": "boom"})));

        let first = mock.execute(ApiRequest::get(Resource::CLIENTS, 1)).await;
        assert!(matches!(first, Err(AppError::Api { status: 500, .. })));

        let second = mock.execute(ApiRequest::get(Resource::CLIENTS, 1)).await.unwrap();
        assert_eq!(second.data, json!({"id": 1}));
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_error_message_extracted() {
        let mock = MockTransport::new();
        mock.reply(Method::DELETE, "/clients/2/", MockReply::error(403, json!({"message": "Locked"})));

        let err = mock.execute(ApiRequest::delete(Resource::CLIENTS, 2)).await.unwrap_err();
        assert_eq!(err.toast_text("Failed to delete client"), "Locked");
        assert_eq!(mock.requests_with(&Method::DELETE).len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_reply() {
        let mock = MockTransport::new();
        mock.reply(Method::POST, "/placements/", MockReply::Timeout { timeout_ms: 30_000 });

        let err = mock
            .execute(ApiRequest::create(Resource::PLACEMENTS, crate::api::Payload::Empty))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout { timeout_ms: 30_000 }));
    }
}
