//! The wrapping entry point: configure once, call many times

use crate::{
    BoxError, ErrorAllowList, ErrorFilter, ErrorKind, ErrorTransform, Panicked, Produce, Produced,
    ResultTuple, Thenable,
};
use std::future::IntoFuture;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// What a wrapped call returns: a tuple, settled now or later
///
/// The `Err` side only ever carries an error that escaped the allow-list,
/// unchanged.
pub type Outcome<V> = Produced<ResultTuple<V>, BoxError>;

/// Builder for wrapped callables
#[derive(Debug, Clone, Default)]
pub struct SafeWrap {
    allow: ErrorAllowList,
    transform: Option<ErrorTransform>,
    catch_panics: bool,
}

impl SafeWrap {
    /// Absorb every error kind, no rewriting, panics propagate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb errors of type `K`
    #[must_use]
    pub fn absorb<K: std::error::Error + 'static>(self) -> Self {
        self.kind(ErrorKind::of::<K>())
    }

    /// Absorb errors matching `kind`
    #[must_use]
    pub fn kind(mut self, kind: ErrorKind) -> Self {
        self.allow.push(kind);
        self
    }

    /// Replace the whole allow-list
    #[must_use]
    pub fn allow(mut self, allow: impl Into<ErrorAllowList>) -> Self {
        self.allow = allow.into();
        self
    }

    /// Rewrite absorbed errors with `transformer`
    #[must_use]
    pub fn transform<F, R>(self, transformer: F) -> Self
    where
        F: Fn(BoxError) -> R + Send + Sync + 'static,
        R: Produce<Value = BoxError>,
    {
        self.transformer(ErrorTransform::new(transformer))
    }

    /// Rewrite absorbed errors with an already-built transform
    #[must_use]
    pub fn transformer(mut self, transform: ErrorTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Treat panics in the action as [`Panicked`] errors
    #[must_use]
    pub fn catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// Wrap an action returning anything that implements [`Produce`]
    pub fn wrap<F>(self, action: F) -> SafeFn<F> {
        SafeFn {
            action,
            filter: ErrorFilter::new(self.allow, self.transform),
            catch_panics: self.catch_panics,
        }
    }

    /// Wrap an action returning any `IntoFuture` that resolves to a `Result`
    pub fn wrap_async<A, F, I>(self, action: F) -> SafeFn<impl Fn(A) -> Thenable<I::IntoFuture>>
    where
        F: Fn(A) -> I,
        I: IntoFuture,
    {
        self.wrap(move |args: A| Thenable::new(action(args)))
    }
}

/// A callable wrapped so that its failures come back as [`ResultTuple`]s
#[derive(Debug, Clone)]
pub struct SafeFn<F> {
    action: F,
    filter: ErrorFilter,
    catch_panics: bool,
}

impl<F> SafeFn<F> {
    /// Invoke the action with `args`
    ///
    /// Settled actions give a settled outcome (unless an async transform has
    /// to run); pending actions give a pending one.
    pub fn call<A, R>(&self, args: A) -> Outcome<R::Value>
    where
        F: Fn(A) -> R,
        R: Produce,
        R::Value: Send + 'static,
    {
        let produced = if self.catch_panics {
            match catch_unwind(AssertUnwindSafe(|| (self.action)(args).produce())) {
                Ok(produced) => produced.catch_unwind(),
                Err(payload) => {
                    let panicked = Panicked::from_payload(payload);
                    tracing::debug!(error = %panicked, "panic captured");
                    Produced::ready(Err(panicked.into()))
                }
            }
        } else {
            (self.action)(args).produce()
        };

        match produced.try_ready() {
            Ok(Ok(value)) => Produced::ready(Ok(ResultTuple::ok(value))),
            Ok(Err(error)) => self.filter.absorb(error),
            Err(pending) => {
                tracing::trace!("action produced a pending computation");
                let filter = self.filter.clone();
                Produced::pending(async move {
                    match pending.await {
                        Ok(value) => Ok(ResultTuple::ok(value)),
                        Err(error) => filter.absorb(error).await,
                    }
                })
            }
        }
    }

    /// The allow-list and transform applied to caught errors
    #[must_use]
    pub fn filter(&self) -> &ErrorFilter {
        &self.filter
    }

    /// The wrapped action
    pub fn action(&self) -> &F {
        &self.action
    }
}

/// Wrap `action`, absorbing every error kind
pub fn safe<F>(action: F) -> SafeFn<F> {
    SafeWrap::new().wrap(action)
}

/// Wrap `action`, absorbing only the kinds in `allow` (all kinds when empty)
/// and rewriting absorbed errors with `transform` when given
pub fn safe_with<F>(
    action: F,
    allow: impl Into<ErrorAllowList>,
    transform: Option<ErrorTransform>,
) -> SafeFn<F> {
    let mut wrap = SafeWrap::new().allow(allow);
    if let Some(transform) = transform {
        wrap = wrap.transformer(transform);
    }
    wrap.wrap(action)
}
