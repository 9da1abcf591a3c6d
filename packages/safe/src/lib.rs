//! # Safe
//!
//! Wraps any callable, synchronous or asynchronous, so that calling it yields
//! an explicit `(error, value)` pair instead of a bare `Err` or a failed
//! future.
//!
//! - Errors whose concrete type is on the allow-list (or every error, when
//!   the list is empty) are absorbed into the error side of a [`ResultTuple`].
//! - Errors of other kinds escape unchanged through the `Err` side of the
//!   [`Outcome`].
//! - An optional [`ErrorTransform`] rewrites absorbed errors; its own
//!   failures are absorbed as the replacement error.
//!
//! Whether a call settles immediately or later follows the wrapped action:
//! plain `Result`s settle at once, anything observed through [`Thenable`]
//! settles when awaited.

pub mod error;
pub mod filter;
pub mod produced;
pub mod transform;
pub mod tuple;
pub mod wrap;

pub use error::{BoxError, Consumed, Panicked, TupleError};
pub use filter::{ErrorAllowList, ErrorFilter, ErrorKind};
pub use produced::{thenable, Produce, Produced, Thenable};
pub use transform::ErrorTransform;
pub use tuple::ResultTuple;
pub use wrap::{safe, safe_with, Outcome, SafeFn, SafeWrap};
