//! Decide which failures are worth another attempt.

use std::fmt;
use std::io;

use super::error::InvalidArgument;

/// Errors that can report a coarse kind for classification.
///
/// The kind is the unit a [`Classifier`] matches on, the same way the
/// download engine maps curl and HTTP errors onto a small `ErrorKind` enum.
pub trait FailureKind {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;

    /// Deliberate "stop now" signals (shutdown requested, exit codes).
    /// [`Classifier::any`] leaves these out; list the kind explicitly to
    /// retry it anyway.
    fn is_terminal(&self) -> bool {
        false
    }
}

impl FailureKind for io::Error {
    type Kind = io::ErrorKind;

    fn kind(&self) -> io::ErrorKind {
        io::Error::kind(self)
    }
}

enum Scope {
    Any,
    Kinds(Vec<String>),
    Predicate,
}

/// Predicate over the caller's error type: `true` means "retry this".
///
/// The default is [`Classifier::any`], which retries every error except
/// terminal ones. That is convenient and also a footgun: bugs that surface as
/// errors (bad input, invariant violations) get retried until the budget runs
/// out. Narrow it with [`Classifier::kind`] or [`Classifier::kinds`] when the
/// error type distinguishes transient failures.
///
/// [`Classifier::predicate`] is not validated: a predicate that never returns
/// `true` builds a classifier that rejects everything, so the session runs the
/// work once and hands back the first failure.
pub struct Classifier<E> {
    scope: Scope,
    matches: Box<dyn Fn(&E) -> bool>,
}

impl<E: 'static> Classifier<E> {
    /// Arbitrary predicate, for error types without a [`FailureKind`] impl.
    /// Must accept at least one error to be useful; nothing checks that.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        Self {
            scope: Scope::Predicate,
            matches: Box::new(f),
        }
    }
}

impl<E> Classifier<E> {
    pub fn is_retryable(&self, err: &E) -> bool {
        (self.matches)(err)
    }

    /// Rejects kind sets that cannot match anything.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        match &self.scope {
            Scope::Kinds(kinds) if kinds.is_empty() => Err(InvalidArgument::EmptyClassifier),
            _ => Ok(()),
        }
    }
}

impl<E> Classifier<E>
where
    E: FailureKind + 'static,
{
    /// Every error is retryable except those reporting
    /// [`FailureKind::is_terminal`].
    pub fn any() -> Self {
        Self {
            scope: Scope::Any,
            matches: Box::new(|err: &E| !err.is_terminal()),
        }
    }

    /// Retry only errors of a single kind.
    pub fn kind(kind: E::Kind) -> Self {
        Self::kinds([kind])
    }

    /// Retry errors whose kind is in `kinds`. An empty set is accepted here
    /// and rejected when the policy is built.
    pub fn kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = E::Kind>,
    {
        let kinds: Vec<E::Kind> = kinds.into_iter().collect();
        let labels = kinds.iter().map(|k| format!("{:?}", k)).collect();
        Self {
            scope: Scope::Kinds(labels),
            matches: Box::new(move |err: &E| kinds.contains(&err.kind())),
        }
    }
}

impl<E: FailureKind + 'static> Default for Classifier<E> {
    fn default() -> Self {
        Self::any()
    }
}

impl<E> fmt::Debug for Classifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Any => write!(f, "Classifier(any)"),
            Scope::Kinds(labels) => write!(f, "Classifier({})", labels.join(" | ")),
            Scope::Predicate => write!(f, "Classifier(predicate)"),
        }
    }
}
