//! Error types owned by the combinator itself

use std::any::Any;

/// Boxed, thread-safe error used as the common currency of every wrapped call
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shape violations when assembling a [`ResultTuple`](crate::ResultTuple) from loose parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TupleError {
    /// Neither an error nor a value was supplied
    #[error("result tuple needs either an error or a value")]
    Empty,
    /// Both an error and a value were supplied
    #[error("result tuple cannot carry both an error and a value")]
    Conflicting,
}

/// A [`Produced`](crate::Produced) whose output was already handed out was
/// returned again
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("result was already consumed")]
pub struct Consumed;

/// A panic captured at a wrapped call's boundary, surfaced as an ordinary error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panicked: {message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// Build from a raw unwind payload
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "Box<dyn Any>".to_string(),
            },
        };
        Self { message }
    }

    /// The panic message, when the payload carried one
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
