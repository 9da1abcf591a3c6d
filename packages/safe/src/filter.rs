//! Deciding which caught errors are absorbed and which escape

use crate::{BoxError, ErrorTransform, Produced, ResultTuple};
use std::any::TypeId;
use std::error::Error;
use std::sync::Arc;

type DynError = dyn Error + Send + Sync + 'static;

/// Nominal error-kind discriminator, matched against the concrete type
/// behind a boxed error
#[derive(Clone, Copy)]
pub struct ErrorKind {
    name: &'static str,
    type_id: TypeId,
    matches: fn(&DynError) -> bool,
}

// `Box<K>` converts into a `BoxError` by boxing again, so look one level in.
fn is_kind<K: Error + 'static>(error: &DynError) -> bool {
    error.is::<K>() || error.is::<Box<K>>()
}

impl ErrorKind {
    /// Discriminator for the error type `K`
    #[must_use]
    pub fn of<K: Error + 'static>() -> Self {
        Self {
            name: std::any::type_name::<K>(),
            type_id: TypeId::of::<K>(),
            matches: is_kind::<K>,
        }
    }

    /// Type name of the kind
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `error` is of exactly this kind, either directly or as a
    /// boxed `K`
    #[must_use]
    pub fn matches(&self, error: &DynError) -> bool {
        (self.matches)(error)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ErrorKind {}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

/// Ordered set of error kinds a wrapped call absorbs; empty absorbs all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAllowList {
    kinds: Vec<ErrorKind>,
}

impl ErrorAllowList {
    /// Empty list, matching every error
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the kind `K`
    #[must_use]
    pub fn with<K: Error + 'static>(self) -> Self {
        self.with_kind(ErrorKind::of::<K>())
    }

    /// Append an existing discriminator
    #[must_use]
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.push(kind);
        self
    }

    /// Append an existing discriminator in place
    pub fn push(&mut self, kind: ErrorKind) {
        self.kinds.push(kind);
    }

    /// Whether no kinds are listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Number of listed kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Listed kinds, in order
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorKind> {
        self.kinds.iter()
    }

    /// First listed kind matching `error`
    #[must_use]
    pub fn matching(&self, error: &DynError) -> Option<&ErrorKind> {
        self.kinds.iter().find(|kind| kind.matches(error))
    }

    /// Whether `error` is eligible for absorption
    #[must_use]
    pub fn admits(&self, error: &DynError) -> bool {
        self.is_empty() || self.matching(error).is_some()
    }
}

impl FromIterator<ErrorKind> for ErrorAllowList {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<ErrorKind>> for ErrorAllowList {
    fn from(kinds: Vec<ErrorKind>) -> Self {
        Self { kinds }
    }
}

impl<const N: usize> From<[ErrorKind; N]> for ErrorAllowList {
    fn from(kinds: [ErrorKind; N]) -> Self {
        Self {
            kinds: kinds.into(),
        }
    }
}

impl<'a> IntoIterator for &'a ErrorAllowList {
    type Item = &'a ErrorKind;
    type IntoIter = std::slice::Iter<'a, ErrorKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Absorb-or-escape decision for caught errors, with optional rewriting
#[derive(Debug, Clone, Default)]
pub struct ErrorFilter {
    allow: Arc<ErrorAllowList>,
    transform: Option<ErrorTransform>,
}

impl ErrorFilter {
    /// Filter over `allow`, optionally rewriting absorbed errors
    #[must_use]
    pub fn new(allow: ErrorAllowList, transform: Option<ErrorTransform>) -> Self {
        Self {
            allow: Arc::new(allow),
            transform,
        }
    }

    /// The configured allow-list
    #[must_use]
    pub fn allow_list(&self) -> &ErrorAllowList {
        &self.allow
    }

    /// Fold a caught error into a tuple, or hand it back as `Err` unchanged
    /// when its kind is not allowed
    pub fn absorb<V>(&self, error: BoxError) -> Produced<ResultTuple<V>>
    where
        V: Send + 'static,
    {
        if !self.allow.admits(&*error) {
            tracing::debug!(error = %error, "error escaped allow-list");
            return Produced::ready(Err(error));
        }

        tracing::debug!(
            error = %error,
            kind = self.allow.matching(&*error).map_or("any", ErrorKind::name),
            "error absorbed"
        );

        match &self.transform {
            Some(transform) => transform.apply(error).then(|settled| match settled {
                Ok(tuple) => Ok(tuple),
                Err(never) => match never {},
            }),
            None => Produced::ready(Ok(ResultTuple::err(error))),
        }
    }
}
