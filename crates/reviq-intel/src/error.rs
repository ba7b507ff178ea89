use thiserror::Error;

/// Errors returned by the intelligence client.
#[derive(Debug, Error)]
pub enum IntelError {
    /// Hotel name or city was blank; no request was sent.
    #[error("{field} must not be blank")]
    EmptyInput { field: &'static str },

    /// Transport failure, timeout, or non-2xx status from the provider.
    #[error("intelligence provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// The response body did not match the declared shape.
    #[error("malformed provider response for {context}: {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client could not be constructed (bad base URL, TLS setup).
    #[error("intelligence client setup failed: {0}")]
    Setup(String),
}

/// Coarse failure category shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyInput,
    MalformedResponse,
    ProviderUnavailable,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::EmptyInput => write!(f, "empty input"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::ProviderUnavailable => write!(f, "provider unavailable"),
        }
    }
}

impl IntelError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            IntelError::EmptyInput { .. } => FailureKind::EmptyInput,
            IntelError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            IntelError::ProviderUnavailable { .. } | IntelError::Setup(_) => {
                FailureKind::ProviderUnavailable
            }
        }
    }

    pub(crate) fn transport(context: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("{context}: request timed out")
        } else if err.is_connect() {
            format!("{context}: connection failed: {err}")
        } else {
            format!("{context}: {err}")
        };
        IntelError::ProviderUnavailable { reason }
    }
}
