//! Rewriting caught errors before they are surfaced

use crate::{BoxError, Panicked, Produce, Produced, ResultTuple};
use std::convert::Infallible;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type TransformFn = Arc<dyn Fn(BoxError) -> Produced<BoxError> + Send + Sync>;

/// Caller-supplied error rewriter, run inside its own protective boundary
///
/// Whatever the transformer does (return a replacement, fail, panic, or
/// settle later either way) the outcome ends up on the error side of a
/// [`ResultTuple`]. Nothing escapes.
#[derive(Clone)]
pub struct ErrorTransform {
    inner: TransformFn,
}

impl ErrorTransform {
    /// Wrap a transformer
    ///
    /// The transformer may return the replacement error directly, a
    /// `Result` of one, or a pending computation (see [`Produce`]).
    pub fn new<F, R>(transformer: F) -> Self
    where
        F: Fn(BoxError) -> R + Send + Sync + 'static,
        R: Produce<Value = BoxError>,
    {
        Self {
            inner: Arc::new(move |error| transformer(error).produce()),
        }
    }

    /// Run the transformer on a caught error
    pub fn apply<V>(&self, error: BoxError) -> Produced<ResultTuple<V>, Infallible>
    where
        V: Send + 'static,
    {
        let produced = match catch_unwind(AssertUnwindSafe(|| (self.inner)(error))) {
            Ok(produced) => produced.catch_unwind(),
            Err(payload) => Produced::ready(Err(Panicked::from_payload(payload).into())),
        };

        produced.then(|settled| {
            let error = match settled {
                Ok(replacement) => {
                    tracing::debug!(error = %replacement, "error transformed");
                    replacement
                }
                Err(failure) => {
                    tracing::debug!(error = %failure, "error transform failed");
                    failure
                }
            };
            Ok(ResultTuple::err(error))
        })
    }
}

impl std::fmt::Debug for ErrorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTransform").finish_non_exhaustive()
    }
}
