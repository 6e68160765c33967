use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use zotproxy_core::tree::TreeError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("Cycle detected in collection hierarchy at {0}")]
    CycleDetected(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// JSON body returned for every failed request
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl Error {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::CycleDetected(_) => "cycle_detected",
            Error::Upstream(_) => "upstream",
            Error::Parse(_) => "parse",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            // A cycle can only come from corrupt upstream data.
            Error::CycleDetected(_) | Error::Upstream(_) | Error::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NotFound(key) => Error::NotFound(key),
            TreeError::CycleDetected(key) => Error::CycleDetected(key),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            log::warn!("{} ({}): {}", status, self.kind(), self);
        } else {
            log::debug!("{} ({}): {}", status, self.kind(), self);
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::NotFound("Z".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::CycleDetected("A".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Upstream("HTTP 500".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Parse("expected value".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_from_tree_error() {
        let err: Error = TreeError::NotFound("Z".into()).into();
        assert!(matches!(err, Error::NotFound(ref key) if key == "Z"));

        let err: Error = TreeError::CycleDetected("A".into()).into();
        assert!(matches!(err, Error::CycleDetected(ref key) if key == "A"));
    }

    #[test]
    fn test_into_response_status() {
        let response = Error::NotFound("Z".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::Upstream("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
