//! HTTP error types

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    /// Non-2xx response other than 401; `message` is the backend's own text
    /// when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Network(err)
        }
    }
}

impl HttpError {
    /// HTTP status, for errors that came back as a response
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let not_found = HttpError::Status {
            status: 404,
            message: "Tenant not found".into(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "Tenant not found");

        let unauthorized = HttpError::Unauthorized {
            message: "Unauthorized".into(),
        };
        assert_eq!(unauthorized.status(), Some(401));
        assert!(unauthorized.is_unauthorized());
        assert_eq!(HttpError::Timeout.status(), None);
    }
}
