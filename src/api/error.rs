use http::StatusCode;
use std::fmt;

/// Failure talking to the admin backend, classified so the CLI can pick an
/// exit code and the retry loop can tell transient from permanent errors.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    NotFound(String),
    Server(StatusCode, String),
    Client(StatusCode, String),
    Network(String),
    Backend(String),
    Decode(String),
}

impl ApiError {
    /// Map a non-success status to an error. Returns `None` for 2xx.
    pub fn from_status(status: StatusCode, url: &str) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(url.to_string()),
            StatusCode::NOT_FOUND => ApiError::NotFound(url.to_string()),
            s if s.is_server_error() => ApiError::Server(s, url.to_string()),
            s => ApiError::Client(s, url.to_string()),
        })
    }

    /// Worth another attempt: transport failures, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Server(_, _) => true,
            ApiError::Client(status, _) => *status == StatusCode::TOO_MANY_REQUESTS,
            _ => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(url) => write!(f, "Not authorized to access {}. Check the backend session.", url),
            ApiError::NotFound(url) => write!(f, "Endpoint not found: {}. Check api_url in your config.", url),
            ApiError::Server(status, url) => write!(f, "Backend error {} from {}", status, url),
            ApiError::Client(status, url) => write!(f, "Request rejected with {} by {}", status, url),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Backend(msg) => write!(f, "Backend reported failure: {}", msg),
            ApiError::Decode(msg) => write!(f, "Unexpected response format: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ApiError::from_status(status, e.url().map(|u| u.as_str()).unwrap_or("?"))
                .unwrap_or_else(|| ApiError::Network(e.to_string())),
            None if e.is_decode() => ApiError::Decode(e.to_string()),
            None => ApiError::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_not_an_error() {
        assert!(ApiError::from_status(StatusCode::OK, "u").is_none());
        assert!(ApiError::from_status(StatusCode::NO_CONTENT, "u").is_none());
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "u"),
            Some(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "u"),
            Some(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "u"),
            Some(ApiError::NotFound(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "u"),
            Some(ApiError::Server(StatusCode::BAD_GATEWAY, _))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "u"),
            Some(ApiError::Client(StatusCode::BAD_REQUEST, _))
        ));
    }

    #[test]
    fn test_transient_errors() {
        assert!(ApiError::Network("reset".into()).is_transient());
        assert!(ApiError::Server(StatusCode::SERVICE_UNAVAILABLE, "u".into()).is_transient());
        assert!(ApiError::Client(StatusCode::TOO_MANY_REQUESTS, "u".into()).is_transient());
        assert!(!ApiError::Client(StatusCode::BAD_REQUEST, "u".into()).is_transient());
        assert!(!ApiError::Unauthorized("u".into()).is_transient());
        assert!(!ApiError::Backend("nope".into()).is_transient());
    }

    #[test]
    fn test_display_mentions_url() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "http://localhost:5000/api/leads").unwrap();
        assert!(err.to_string().contains("/api/leads"));
    }
}
