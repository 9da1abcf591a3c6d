//! The `(error, value)` pair every wrapped call settles to

use crate::{BoxError, TupleError};

/// Ordered `(error, value)` pair with exactly one side present
///
/// Presence is tracked structurally, so values such as `0`, `""` or `false`
/// are never mistaken for an absent result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ResultTuple<V, E = BoxError> {
    inner: Result<V, E>,
}

impl<V, E> ResultTuple<V, E> {
    /// Tuple carrying a produced value
    pub fn ok(value: V) -> Self {
        Self { inner: Ok(value) }
    }

    /// Tuple carrying an error
    pub fn err(error: E) -> Self {
        Self { inner: Err(error) }
    }

    /// Assemble a tuple from independent optional slots
    ///
    /// `result` wins over `data` when both are set.
    ///
    /// # Errors
    ///
    /// Returns `TupleError::Empty` when every slot is `None`, and
    /// `TupleError::Conflicting` when an error is given alongside a value.
    pub fn from_parts(
        error: Option<E>,
        data: Option<V>,
        result: Option<V>,
    ) -> Result<Self, TupleError> {
        match (error, result.or(data)) {
            (Some(_), Some(_)) => Err(TupleError::Conflicting),
            (Some(error), None) => Ok(Self::err(error)),
            (None, Some(value)) => Ok(Self::ok(value)),
            (None, None) => Err(TupleError::Empty),
        }
    }

    /// Error side, if present
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        self.inner.as_ref().err()
    }

    /// Value side, if present
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.inner.as_ref().ok()
    }

    /// Whether the value side is present
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.inner.is_ok()
    }

    /// Whether the error side is present
    #[must_use]
    pub fn is_err(&self) -> bool {
        self.inner.is_err()
    }

    /// Split into the `(error, value)` pair
    pub fn into_parts(self) -> (Option<E>, Option<V>) {
        match self.inner {
            Ok(value) => (None, Some(value)),
            Err(error) => (Some(error), None),
        }
    }

    /// Back to a plain `Result`
    ///
    /// # Errors
    ///
    /// Returns the error side when it is present.
    pub fn into_result(self) -> Result<V, E> {
        self.inner
    }
}

impl<V, E> From<Result<V, E>> for ResultTuple<V, E> {
    fn from(inner: Result<V, E>) -> Self {
        Self { inner }
    }
}

impl<V, E> From<ResultTuple<V, E>> for (Option<E>, Option<V>) {
    fn from(tuple: ResultTuple<V, E>) -> Self {
        tuple.into_parts()
    }
}
