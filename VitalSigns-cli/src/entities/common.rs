use serde::{Deserialize, Serialize};

/// Standardized error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicErrorResponse {
    /// Error message
    pub message: String,

    /// Optional error code for machine handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Optional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl PublicErrorResponse {
    /// Create a validation error response. Individual rule messages are
    /// split out of the `"; "`-joined service message into `details`.
    pub fn validation_error(message: &str) -> Self {
        let details = message
            .trim_start_matches("Validation error: ")
            .split("; ")
            .map(str::to_string)
            .collect();

        Self {
            message: message.to_string(),
            code: Some("validation_error".to_string()),
            details: Some(details),
        }
    }

    /// Create an insufficient data error response
    pub fn insufficient_data(message: &str) -> Self {
        Self {
            message: message.to_string(),
            code: Some("insufficient_data".to_string()),
            details: None,
        }
    }
}
