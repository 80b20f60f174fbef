// ABOUTME: In-process HTTP client for exercising the routine planner router in tests
// ABOUTME: Sends requests as a given acting user and decodes JSON bodies and error codes

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use routine_planner::constants::USER_ID_HEADER;
use serde_json::Value;
use tower::ServiceExt;

/// A request against the router, built up fluently
pub struct ApiRequest {
    method: Method,
    uri: String,
    user_id: Option<String>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri.into())
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri.into())
    }

    const fn new(method: Method, uri: String) -> Self {
        Self {
            method,
            uri,
            user_id: None,
            body: None,
        }
    }

    /// Act as this user (sets the acting-user header)
    pub fn as_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_owned());
        self
    }

    pub fn json_body(mut self, body: &Value) -> Self {
        self.body = Some(body.clone());
        self
    }

    /// Run the request through a clone of the router
    pub async fn send(self, router: &Router) -> ApiResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(user_id) = &self.user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        let body = match self.body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        ApiResponse { status, body }
    }
}

/// Status and decoded JSON body of a routed request
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// The `error.code` field of an error body, if present
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}
