//! Fixed-delay retry controller.
//!
//! A [`RetryPolicy`] (attempt budget, delay, [`Classifier`]) opens a
//! [`Retries`] session. The session hands out one [`Attempt`] at a time; the
//! caller runs its work inside the attempt and closes it with the result.
//! Retryable failures are swallowed and followed by a blocking delay, while
//! anything else (or a failure on the last attempt) comes back to the caller
//! untouched.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{Classifier, FailureKind};
pub use error::InvalidArgument;
pub use policy::{retries, RetryDecision, RetryPolicy, DEFAULT_DELAY};
pub use run::{Attempt, Retries, SessionState};
