use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::validation::FieldErrors;

/// Error returned by a submit handler.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Carries text meant for the user.
    #[error("{0}")]
    Message(String),
    /// Anything else; the form shows its generic banner text.
    #[error("submission failed: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SubmitError {
    pub fn message(message: impl Into<String>) -> Self {
        SubmitError::Message(message.into())
    }

    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SubmitError::Other(err.into())
    }

    /// The user-facing text, if the error has any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            SubmitError::Message(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for SubmitError {
    fn from(err: anyhow::Error) -> Self {
        SubmitError::Other(err.into())
    }
}

/// Receives the normalized values once the whole form validates.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, values: Value) -> Result<(), SubmitError>;
}

pub struct SubmitFn<F>(F);

/// Wrap an async closure as a [`SubmitHandler`].
pub fn submit_fn<F, Fut>(f: F) -> SubmitFn<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
{
    SubmitFn(f)
}

#[async_trait]
impl<F, Fut> SubmitHandler for SubmitFn<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
{
    async fn submit(&self, values: Value) -> Result<(), SubmitError> {
        (self.0)(values).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The handler accepted these normalized values.
    Submitted(Value),
    Invalid(FieldErrors),
    /// The handler failed; carries the banner text shown.
    Failed(String),
    /// A submit was already in flight.
    Ignored,
}

/// First half of a submit, for callers that drive the handler themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    Ready(Value),
    Invalid(FieldErrors),
    Ignored,
}
