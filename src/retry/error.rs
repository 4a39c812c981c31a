//! Construction-time errors for the retry controller.

use thiserror::Error;

/// Rejected retry configuration.
///
/// Only ever returned while building a policy or session, never from inside
/// an attempt. Failures of the wrapped work are handed back as the caller's
/// own error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    /// Attempt budget below one.
    #[error("max_attempts must be at least 1 (got {got})")]
    MaxAttempts { got: u32 },
    /// A kind set with nothing in it would never retry anything.
    #[error("retryable classifier must contain at least one failure kind")]
    EmptyClassifier,
    /// Delay that cannot be turned into a `Duration` (negative, NaN, infinite).
    #[error("delay must be a finite, non-negative number of seconds (got {secs})")]
    Delay { secs: f64 },
}
