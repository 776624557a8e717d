use thiserror::Error;

/// Failure of a single Gateway call.
///
/// `HttpStatus` and `Network` are transport failures; `Decode` means the
/// service answered but the body was not a JSON object. Callers treat all
/// three alike, and none is retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("API Error: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("request failed: {cause}")]
    Network { cause: String },

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::HttpStatus { .. } | GatewayError::Network { .. }
        )
    }
}
