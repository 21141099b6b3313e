/// Convenience result type used across the card pipeline.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy for one card request.
///
/// Per-item resolution failures never reach this type; they are absorbed by the resolver
/// and the affected ring slot is dropped.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Missing or malformed request input (no profile id, blank id).
    #[error("client input error: {0}")]
    ClientInput(String),

    /// The upstream profile payload is unavailable or lacks its identity section.
    #[error("profile not found")]
    ProfileNotFound,

    /// Invalid configuration or layout parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unexpected failure while laying out, drawing or encoding the card.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body returned to callers when a request fails.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    /// Human-readable, non-sensitive message.
    pub error: String,
}

impl CardError {
    /// Build a [`CardError::ClientInput`] value.
    pub fn client_input(msg: impl Into<String>) -> Self {
        Self::ClientInput(msg.into())
    }

    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ClientInput(_) => 400,
            Self::ProfileNotFound => 404,
            Self::Validation(_) | Self::Render(_) | Self::Other(_) => 500,
        }
    }

    /// Caller-facing payload. Internal causes are replaced by a generic message.
    pub fn to_payload(&self) -> ErrorPayload {
        let error = match self {
            Self::ClientInput(msg) => msg.clone(),
            Self::ProfileNotFound => "profile not found".to_owned(),
            Self::Validation(_) | Self::Render(_) | Self::Other(_) => {
                return ErrorPayload::internal();
            }
        };
        ErrorPayload { error }
    }
}

impl ErrorPayload {
    /// Generic payload for failures whose cause stays in the logs.
    pub fn internal() -> Self {
        Self {
            error: "failed to render outfit card".to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
