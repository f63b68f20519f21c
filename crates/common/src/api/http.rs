//! HTTP transport over reqwest

use super::{ApiRequest, ApiResponse, Payload, Transport};
use crate::config::ApiConfig;
use crate::errors::{extract_error_message, AppError, Result};
use crate::metrics::RequestMetrics;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Production transport talking to the REST backend
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn multipart(form: super::MultipartForm) -> Result<Form> {
        let mut out = Form::new();
        for (name, value) in form.fields {
            out = out.text(name, value);
        }
        if let Some(file) = form.file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            out = out.part(file.field, part);
        }
        Ok(out)
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path))
            .header("Accept", "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        builder = match request.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(Self::multipart(form)?),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                AppError::Transport(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let metrics = RequestMetrics::start(request.method.as_str(), request.resource.name());

        let result = self.send(request).await;

        metrics.finish(match &result {
            Ok(response) => Some(response.status),
            Err(AppError::Api { status, .. }) => Some(*status),
            Err(_) => None,
        });

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ListQuery, Ordering, RemoteService, Resource};
    use crate::models::Location;
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{delete, get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/api/clients/",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "count": 1,
                        "next": null,
                        "previous": null,
                        "results": [{"id": 1, "name": "Acme"}],
                        "echo": params,
                    }))
                }),
            )
            .route(
                "/api/client-locations/",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    if headers.get("authorization").is_none() {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Missing token"})));
                    }
                    let mut created = body;
                    created["id"] = json!(11);
                    (StatusCode::CREATED, Json(created))
                }),
            )
            .route(
                "/api/client-locations/{id}/",
                delete(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
                    } else {
                        StatusCode::NO_CONTENT.into_response()
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api/", addr)
    }

    fn service(base_url: String, token: Option<&str>) -> RemoteService {
        let config = ApiConfig {
            base_url,
            timeout_secs: 5,
            auth_token: token.map(str::to_string),
        };
        RemoteService::new(Arc::new(HttpTransport::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_list_sends_query_params() {
        let base = spawn_backend().await;
        let service = service(base, None);

        let query = ListQuery::page(2)
            .with_ordering(Ordering::descending("created_at"))
            .with_filter("city", "Austin");
        let response = service
            .execute(crate::api::ApiRequest::list(Resource::CLIENTS, &query))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.data["echo"],
            json!({"page": "2", "ordering": "-created_at", "city__icontains": "Austin"})
        );
        assert_eq!(response.data["results"][0]["name"], "Acme");
    }

    #[tokio::test]
    async fn test_create_forwards_token_and_decodes_record() {
        let base = spawn_backend().await;
        let service = service(base, Some("secret"));

        let response = service
            .create(
                Resource::CLIENT_LOCATIONS,
                Payload::Json(json!({"name": "Austin HQ", "client": 1})),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        let location: Location = response.into_record(Resource::CLIENT_LOCATIONS).unwrap();
        assert_eq!(location.id, 11);
        assert_eq!(location.name, "Austin HQ");
    }

    #[tokio::test]
    async fn test_error_body_detail_is_extracted() {
        let base = spawn_backend().await;
        let service = service(base, None);

        let err = service
            .create(Resource::CLIENT_LOCATIONS, Payload::Json(json!({"name": "x"})))
            .await
            .unwrap_err();

        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Missing token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let base = spawn_backend().await;
        let service = service(base, None);

        service.delete(Resource::CLIENT_LOCATIONS, 3).await.unwrap();

        let err = service.delete(Resource::CLIENT_LOCATIONS, 404).await.unwrap_err();
        assert!(matches!(err, AppError::Api { status: 404, .. }));
    }

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new(&ApiConfig::default()).unwrap();
        assert_eq!(transport.url("/clients/"), "http://localhost:8000/api/clients/");
    }
}
