use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // non-2xx from the completion service, body kept as sent
    #[error("completion service returned HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("completion service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from completion service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RelayError {

    pub fn status_code(&self) -> StatusCode {

        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) | RelayError::Decode(_) => StatusCode::BAD_GATEWAY,
        }

    }

    pub fn outcome(&self) -> &'static str {

        match self {
            RelayError::InvalidRequest(_) => "INVALID",
            RelayError::Upstream { .. } => "UPSTREAM_ERR",
            RelayError::Transport(_) => "TRANSPORT_ERR",
            RelayError::Decode(_) => "DECODE_ERR",
        }

    }

}

impl IntoResponse for RelayError {

    fn into_response(self) -> Response {

        let status = self.status_code();

        let message = match self {
            RelayError::Upstream { body, .. } => body,
            RelayError::Transport(e) if e.is_timeout() => "completion service timed out".to_string(),
            RelayError::Transport(_) => "completion service unreachable".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()

    }

}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_upstream_status_is_reproduced() {

        let err = RelayError::Upstream { status: 429, body: "rate limited".to_string() };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);

        let err = RelayError::Upstream { status: 401, body: String::new() };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

    }

    #[test]
    fn test_out_of_range_upstream_status_becomes_bad_gateway() {

        let err = RelayError::Upstream { status: 1000, body: String::new() };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

    }

    #[test]
    fn test_decode_and_invalid_request_statuses() {

        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(RelayError::Decode(decode).status_code(), StatusCode::BAD_GATEWAY);

        let invalid = RelayError::InvalidRequest("missing prompt".to_string());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.outcome(), "INVALID");

    }

}
