//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Image processing failed: {0}")]
    Image(String),

    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Envelope did not carry generated text. `raw` is shown to the user as-is.
    #[error("Malformed completion response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// Local UI server could not start or stopped unexpectedly.
    #[error("UI server error: {0}")]
    Ui(String),
}

/// Coarse classes the UI reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reported inline; user fixes the form and resubmits.
    Input,
    /// Network or non-2xx; no retry.
    Transport,
    /// Displayed as raw text fallback.
    MalformedResponse,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::MissingInput(_)
            | DomainError::InvalidInput(_)
            | DomainError::UnsupportedImage(_)
            | DomainError::Image(_) => ErrorKind::Input,
            DomainError::Transport(_) | DomainError::Api { .. } | DomainError::Ui(_) => {
                ErrorKind::Transport
            }
            DomainError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Short hint shown under the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DomainError::Api { status: 401 | 403, .. } => {
                Some("Check your API key and try again.")
            }
            DomainError::Api { status: 429, .. } => {
                Some("The provider is rate limiting requests; wait a moment and resubmit.")
            }
            DomainError::Transport(_) => Some("Check your network connection and resubmit."),
            DomainError::UnsupportedImage(_) => Some("Upload a PNG or JPEG image."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DomainError::MissingInput("image").kind(), ErrorKind::Input);
        assert_eq!(
            DomainError::Api {
                status: 500,
                body: String::new()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            DomainError::MalformedResponse {
                reason: "no choices".into(),
                raw: "{}".into()
            }
            .kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[test]
    fn test_unauthorized_hint() {
        let err = DomainError::Api {
            status: 401,
            body: "invalid key".into(),
        };
        assert_eq!(err.hint(), Some("Check your API key and try again."));
        assert_eq!(err.to_string(), "Completion API error 401: invalid key");
    }
}
