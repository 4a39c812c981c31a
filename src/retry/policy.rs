use std::fmt;
use std::time::Duration;

use super::classify::{Classifier, FailureKind};
use super::error::InvalidArgument;
use super::run::Retries;

/// Delay used when the caller does not pick one.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Decision returned by the retry policy for one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Suppress the failure and try again after the given delay.
    RetryAfter(Duration),
    /// Retryable kind, but that was the last permitted attempt.
    Exhausted,
    /// The classifier does not cover this failure.
    NotRetryable,
}

/// Fixed-delay retry policy: attempt budget, delay between attempts, and
/// which failures count as retryable.
///
/// Immutable once built; [`RetryPolicy::new`] is the only place inputs are
/// validated, so a session never discovers bad configuration mid-loop.
pub struct RetryPolicy<E> {
    max_attempts: u32,
    delay: Duration,
    classifier: Classifier<E>,
}

impl<E> RetryPolicy<E> {
    pub fn new(
        max_attempts: u32,
        delay: Duration,
        classifier: Classifier<E>,
    ) -> Result<Self, InvalidArgument> {
        if max_attempts < 1 {
            return Err(InvalidArgument::MaxAttempts { got: max_attempts });
        }
        classifier.validate()?;
        Ok(Self {
            max_attempts,
            delay,
            classifier,
        })
    }

    /// Maximum number of attempts (including the first).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn classifier(&self) -> &Classifier<E> {
        &self.classifier
    }

    pub fn is_retryable(&self, err: &E) -> bool {
        self.classifier.is_retryable(err)
    }

    /// Decide what happens after attempt `index` (0-based) failed with `err`.
    ///
    /// The classifier runs exactly once per call.
    pub fn decide(&self, index: u32, err: &E) -> RetryDecision {
        if !self.classifier.is_retryable(err) {
            return RetryDecision::NotRetryable;
        }
        if index.saturating_add(1) >= self.max_attempts {
            return RetryDecision::Exhausted;
        }
        RetryDecision::RetryAfter(self.delay)
    }

    /// Start a fresh, single-use session driven by this policy.
    pub fn retries(self) -> Retries<E> {
        Retries::new(self)
    }
}

impl<E: FailureKind + 'static> RetryPolicy<E> {
    /// `max_attempts` with the default one-second delay and the permissive
    /// [`Classifier::any`].
    pub fn with_max_attempts(max_attempts: u32) -> Result<Self, InvalidArgument> {
        Self::new(max_attempts, DEFAULT_DELAY, Classifier::any())
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("classifier", &self.classifier)
            .finish()
    }
}

/// Validate the inputs and open a session in one step.
///
/// ```
/// use std::io;
/// use std::time::Duration;
/// use loopretry::retry::{retries, Classifier};
///
/// let mut calls = 0;
/// let mut session =
///     retries::<io::Error>(3, Duration::from_millis(1), Classifier::any()).unwrap();
/// while let Some(attempt) = session.next_attempt() {
///     let outcome = attempt.run(|| {
///         calls += 1;
///         if calls < 2 {
///             Err(io::Error::from(io::ErrorKind::Interrupted))
///         } else {
///             Ok(calls)
///         }
///     });
///     if let Some(value) = outcome.unwrap() {
///         assert_eq!(value, 2);
///     }
/// }
/// assert_eq!(session.attempts(), 2);
/// ```
pub fn retries<E>(
    max_attempts: u32,
    delay: Duration,
    classifier: Classifier<E>,
) -> Result<Retries<E>, InvalidArgument> {
    Ok(RetryPolicy::new(max_attempts, delay, classifier)?.retries())
}
