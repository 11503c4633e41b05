//! Error types shared by the wizard, the preference form and the API collaborators

use thiserror::Error;

/// Failure talking to the prediction/listing/recommendation backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Builds a status error, pretty printing the body when it is JSON.
    pub fn status(status: u16, body: &str) -> Self {
        let body = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| serde_json::to_string_pretty(&json).ok())
            .unwrap_or_else(|| body.to_string());
        ApiError::Status { status, body }
    }
}

/// Rejected wizard action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: String, action: String },
    #[error("submit is cooling down after reaching the last section")]
    SubmitCoolingDown,
    #[error("a request is already in flight")]
    Busy,
    #[error("field {0} is not part of this form")]
    UnknownField(String),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Carries the role whose id is absent: "vendor" or "client".
    #[error("no {0} identity found in the session, sign in again")]
    MissingIdentity(&'static str),
    #[error("compute the price by submitting the form first")]
    NoPrediction,
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("catalog error: {0}")]
    Catalog(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_pretty_prints_json() {
        let err = ApiError::status(400, r#"{"error":"Campo requerido: title"}"#);
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains('\n'));
                assert!(body.contains("\"error\": \"Campo requerido: title\""));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_keeps_plain_text() {
        let err = ApiError::status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "backend returned 502: Bad Gateway");
    }
}
