//! The JSON envelope shared by every `/api` endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Respond with `data` wrapped in a success envelope.
pub fn ok<T: Serialize>(status_code: StatusCode, data: T) -> Response {
    (status_code, Json(ApiResponse::success(data))).into_response()
}

/// The empty object returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiResponse, Empty};

    #[test]
    fn success_omits_error() {
        let got = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();

        assert_eq!(got, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn failure_omits_data() {
        let got = serde_json::to_value(ApiResponse::<()>::failure("Budget not found")).unwrap();

        assert_eq!(got, json!({"success": false, "error": "Budget not found"}));
    }

    #[test]
    fn empty_data_is_an_object() {
        let got = serde_json::to_value(ApiResponse::success(Empty {})).unwrap();

        assert_eq!(got, json!({"success": true, "data": {}}));
    }
}
