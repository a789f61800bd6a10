use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::{error, warn};

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }

    /// Entity endpoints: dedicated error kinds keep their status, anything
    /// else is reported as a bad request.
    pub fn entity(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.message())),
            ServiceError::Duplicate(_) => Self::new(StatusCode::CONFLICT, "Duplicate Entity", Some(e.message())),
            ServiceError::InvalidTransition(_) | ServiceError::TransitionRejected(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Invalid Transition", Some(e.message()))
            }
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.message()))
            }
            ServiceError::Unavailable(_) | ServiceError::Platform(_) => {
                warn!(err = %e, "entity platform call failed");
                Self::bad_request(e.message())
            }
        }
    }

    /// Dashboard endpoints distinguish an unreachable source from a failed computation.
    pub fn dashboard(e: ServiceError) -> Self {
        match e {
            ServiceError::Unavailable(_) => Self::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", Some(e.message())),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Dashboard Computation Failed", Some(e.message())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = self.title, message = ?self.message, "request failed");
        }
        let body = serde_json::json!({"error": self.title, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}
