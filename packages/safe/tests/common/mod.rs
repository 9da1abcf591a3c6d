//! Error kinds shared by the integration tests

#![allow(dead_code)]

use safe::{Outcome, ResultTuple};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RangeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TypeError(pub String);

pub fn range(message: &str) -> RangeError {
    RangeError(message.to_string())
}

pub fn type_error(message: &str) -> TypeError {
    TypeError(message.to_string())
}

/// Unwrap an outcome that must already be settled
pub fn settled<V>(outcome: Outcome<V>) -> Result<ResultTuple<V>, safe::BoxError> {
    match outcome.try_ready() {
        Ok(result) => result,
        Err(pending) => panic!("expected a settled outcome, got {pending:?}"),
    }
}
