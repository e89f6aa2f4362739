use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that automatically adds the success envelope:
/// `{"status": "success", "data"?, "results"?, "message"?}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub results: Option<usize>,
    pub message: Option<String>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            results: None,
            message: None,
            status_code: StatusCode::OK,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    /// Adds the `results` count used by list endpoints
    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Response carrying only a message, e.g. after a delete
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            results: None,
            message: Some(message.into()),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut envelope = Map::new();
        envelope.insert("status".into(), json!("success"));

        if let Some(message) = self.message {
            envelope.insert("message".into(), json!(message));
        }
        if let Some(results) = self.results {
            envelope.insert("results".into(), json!(results));
        }
        if let Some(data) = self.data {
            // Convert data to JSON Value for consistent envelope format
            match serde_json::to_value(&data) {
                Ok(value) => {
                    envelope.insert("data".into(), value);
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "status": "error",
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (self.status_code, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_envelope_carries_results() {
        let response = ApiResponse::success(json!({"songs": [1, 2]}))
            .with_results(2)
            .into_response();
        let (status, body) = body_of(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "results": 2, "data": {"songs": [1, 2]}}));
    }

    #[tokio::test]
    async fn message_only_envelope_has_no_data() {
        let (status, body) = body_of(ApiResponse::message("Song deleted successfully").into_response()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "Song deleted successfully"}));
    }

    #[tokio::test]
    async fn created_uses_201() {
        let (status, body) = body_of(ApiResponse::created(json!({"id": 1})).into_response()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);
    }
}
