//! Settled-or-pending results and the capability check that classifies them
//!
//! A callable's return value is observed through [`Produce`]. Plain `Result`s
//! settle immediately. Anything that can become a future is treated as a
//! pending computation, whatever its concrete type.

use crate::{BoxError, Consumed, Panicked};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::{Future, IntoFuture};
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A result that is either already settled or still pending
///
/// Awaiting a settled value resolves on the first poll. Once the output has
/// been handed out, further polls return `Poll::Pending`. A consumed value
/// handed back to a wrapped call through [`Produce`] settles as a
/// [`Consumed`] error instead of waiting forever.
#[must_use]
pub struct Produced<T, E = BoxError> {
    state: State<T, E>,
}

enum State<T, E> {
    Ready(Option<Result<T, E>>),
    Pending(BoxFuture<'static, Result<T, E>>),
}

// No field is ever structurally pinned; the pending future is already boxed.
impl<T, E> Unpin for Produced<T, E> {}

impl<T, E> Produced<T, E> {
    /// Already-settled result
    pub fn ready(result: Result<T, E>) -> Self {
        Self {
            state: State::Ready(Some(result)),
        }
    }

    /// Result of a computation that has not settled yet
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            state: State::Pending(Box::pin(future)),
        }
    }

    /// Whether this represents a computation that still has to be awaited
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Whether the output was already handed out by polling
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        matches!(self.state, State::Ready(None))
    }

    /// Take the settled result, or get the pending computation back untouched
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the computation is pending (or its
    /// output was already consumed by polling).
    pub fn try_ready(self) -> Result<Result<T, E>, Self> {
        match self.state {
            State::Ready(Some(result)) => Ok(result),
            state => Err(Self { state }),
        }
    }

    /// Attach a single continuation that maps the eventual result
    ///
    /// Settled results are mapped immediately; pending ones stay pending.
    pub fn then<U, E2, F>(self, f: F) -> Produced<U, E2>
    where
        F: FnOnce(Result<T, E>) -> Result<U, E2> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        match self.state {
            State::Ready(Some(result)) => Produced::ready(f(result)),
            State::Ready(None) => Produced {
                state: State::Ready(None),
            },
            State::Pending(future) => Produced {
                state: State::Pending(future.map(f).boxed()),
            },
        }
    }
}

impl<T> Produced<T, BoxError>
where
    T: Send + 'static,
{
    /// Turn panics raised while the pending computation is polled into
    /// [`Panicked`] errors
    pub(crate) fn catch_unwind(self) -> Self {
        match self.state {
            State::Pending(future) => Self::pending(AssertUnwindSafe(future).catch_unwind().map(
                |outcome| match outcome {
                    Ok(result) => result,
                    Err(payload) => Err(Panicked::from_payload(payload).into()),
                },
            )),
            state => Self { state },
        }
    }
}

impl<T, E> std::fmt::Debug for Produced<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Ready(Some(_)) => "ready",
            State::Ready(None) => "consumed",
            State::Pending(_) => "pending",
        };
        f.debug_struct("Produced").field("state", &state).finish()
    }
}

impl<T, E> Future for Produced<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match &mut this.state {
            State::Ready(slot) => match slot.take() {
                Some(result) => Poll::Ready(result),
                // Already handed out - never complete twice
                None => Poll::Pending,
            },
            State::Pending(future) => match future.as_mut().poll(cx) {
                Poll::Ready(result) => {
                    this.state = State::Ready(None);
                    Poll::Ready(result)
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

pin_project_lite::pin_project! {
    /// Adapter that lets any `IntoFuture` resolving to a `Result` be observed
    /// as a pending computation
    ///
    /// The error side is boxed into [`BoxError`] on settlement.
    #[must_use = "futures do nothing unless polled"]
    pub struct Thenable<F> {
        #[pin]
        inner: F,
    }
}

impl<F> Thenable<F> {
    /// Adapt anything that can be turned into a future
    pub fn new<I>(source: I) -> Self
    where
        I: IntoFuture<IntoFuture = F>,
    {
        Self {
            inner: source.into_future(),
        }
    }
}

impl<F, T, E> Future for Thenable<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    type Output = Result<T, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project()
            .inner
            .poll(cx)
            .map(|result| result.map_err(Into::into))
    }
}

/// Capability check: can this return value be observed as a settled or
/// pending result?
pub trait Produce {
    /// Value carried on success
    type Value;

    /// Classify the value as settled or pending
    fn produce(self) -> Produced<Self::Value>;
}

impl<T, E> Produce for Result<T, E>
where
    E: Into<BoxError>,
{
    type Value = T;

    fn produce(self) -> Produced<T> {
        Produced::ready(self.map_err(Into::into))
    }
}

/// A bare error is an immediate value, which is what error transforms return
impl Produce for BoxError {
    type Value = BoxError;

    fn produce(self) -> Produced<BoxError> {
        Produced::ready(Ok(self))
    }
}

impl<T> Produce for Produced<T> {
    type Value = T;

    fn produce(self) -> Produced<T> {
        if self.is_consumed() {
            return Produced::ready(Err(Consumed.into()));
        }
        self
    }
}

impl<F, T, E> Produce for Thenable<F>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    E: Into<BoxError>,
{
    type Value = T;

    fn produce(self) -> Produced<T> {
        Produced::pending(self)
    }
}

impl<T, E> Produce for BoxFuture<'static, Result<T, E>>
where
    E: Into<BoxError> + 'static,
    T: 'static,
{
    type Value = T;

    fn produce(self) -> Produced<T> {
        Produced::pending(Thenable::new(self))
    }
}

/// Wrap anything that can become a future so that it is observed as pending
pub fn thenable<I>(source: I) -> Thenable<I::IntoFuture>
where
    I: IntoFuture,
{
    Thenable::new(source)
}
