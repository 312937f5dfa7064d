use axum::http::StatusCode;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Invalid provider base URL: {0}")]
    InvalidApiBase(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Webhook server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<figment::Error> for BridgeError {
    fn from(e: figment::Error) -> Self {
        BridgeError::Config(Box::new(e))
    }
}

/// Failure kinds of a single call-creation request.
#[derive(Debug, ThisError)]
pub enum CallError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("authentication rejected ({status}): {message}")]
    Authentication { status: StatusCode, message: String },

    #[error("invalid destination number (code {code}): {message}")]
    InvalidDestination { code: u32, message: String },

    #[error("provider error ({status}): {message}")]
    Provider {
        status: StatusCode,
        code: Option<u32>,
        message: String,
    },
}

impl CallError {
    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::Network(_) => "network",
            CallError::Authentication { .. } => "authentication",
            CallError::InvalidDestination { .. } => "invalid_destination",
            CallError::Provider { .. } => "provider",
        }
    }
}

impl From<reqwest::Error> for CallError {
    fn from(e: reqwest::Error) -> Self {
        CallError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_lists_every_key() {
        let err = BridgeError::MissingConfig(vec!["TWILIO_ACCOUNT_SID", "TWILIO_AUTH_TOKEN"]);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN"
        );
    }

    #[test]
    fn call_error_kinds() {
        let auth = CallError::Authentication {
            status: StatusCode::UNAUTHORIZED,
            message: "Authenticate".to_string(),
        };
        assert_eq!(auth.kind(), "authentication");
        assert!(auth.to_string().contains("401"));

        let dest = CallError::InvalidDestination {
            code: 21211,
            message: "Invalid 'To' Phone Number".to_string(),
        };
        assert_eq!(dest.kind(), "invalid_destination");
        assert!(dest.to_string().contains("21211"));
    }
}
