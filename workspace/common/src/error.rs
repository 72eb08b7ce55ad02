use thiserror::Error;

/// Fallback message when the train endpoint rejects a request with an empty body.
pub(crate) const TRAIN_REJECTED_FALLBACK: &str = "Training request failed";

/// Fallback message when a poll response carries neither a known status nor a message.
pub(crate) const UNKNOWN_RESPONSE_FALLBACK: &str = "Unknown polling response";

/// Failures that end a workflow run.
///
/// Every variant lands in the same terminal `error` status; the `Display`
/// output is the message shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// The train endpoint answered with a non-success status
    #[error("{0}")]
    Rejected(String),

    /// Network failure or a body that could not be decoded
    #[error("{0}")]
    Transport(String),

    /// Poll answered with a status other than "ready"/"training", or a broken payload
    #[error("{0}")]
    UnexpectedStatus(String),

    /// Poll ceiling reached while the service was still training
    #[error("Training took too long. Please try again.")]
    Timeout,
}

impl WorkflowError {
    /// Build a rejection from the response body, falling back to a generic message.
    pub fn rejected(body: impl Into<String>) -> Self {
        let body = body.into();
        if body.trim().is_empty() {
            Self::Rejected(TRAIN_REJECTED_FALLBACK.to_string())
        } else {
            Self::Rejected(body)
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Build an unexpected-status error from the optional server message.
    pub fn unexpected(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self::UnexpectedStatus(message),
            _ => Self::UnexpectedStatus(UNKNOWN_RESPONSE_FALLBACK.to_string()),
        }
    }
}

/// Invalid form input, caught before any request is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Ticker symbol must not be empty")]
    EmptyTicker,

    #[error("Start date {start} is after today ({today})")]
    FutureStartDate {
        start: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },
}
