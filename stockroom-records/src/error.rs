use stockroom_http::HttpError;
use thiserror::Error;

/// A form check that failed before anything was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub field: &'static str,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Backend rejected or failed the call; `message` is fit to show inline
    #[error("{message}")]
    Operation { entity: &'static str, message: String },

    /// The session was rejected and has already been purged
    #[error("Session expired, please sign in again")]
    Unauthorized,
}

impl RecordError {
    pub(crate) fn from_http(entity: &'static str, err: HttpError) -> Self {
        match err {
            HttpError::Unauthorized { .. } => RecordError::Unauthorized,
            other => RecordError::Operation {
                entity,
                message: other.to_string(),
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RecordError::Validation(_))
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_errors_map_to_record_errors() {
        let err = RecordError::from_http(
            "product",
            HttpError::Status {
                status: 409,
                message: "Product already exists".into(),
            },
        );
        assert_eq!(err.to_string(), "Product already exists");
        assert!(matches!(err, RecordError::Operation { entity: "product", .. }));

        let err = RecordError::from_http(
            "product",
            HttpError::Unauthorized {
                message: "Unauthorized".into(),
            },
        );
        assert!(matches!(err, RecordError::Unauthorized));
    }

    #[test]
    fn test_validation_failure_displays_message() {
        let err: RecordError = ValidationFailure::new("name", "Supplier name is required").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Supplier name is required");
    }
}
