//! Retry loop: a session hands out one attempt slot at a time until the
//! work succeeds or the policy says stop.

use std::fmt;
use std::thread;

use super::policy::{RetryDecision, RetryPolicy};

/// Where a session is in its lifecycle. Indexes are 0-based attempt numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Attempt `i` may be opened.
    Pending(u32),
    /// Attempt `i` is open and its work is running.
    Running(u32),
    /// Terminal: an attempt closed without failure.
    Succeeded,
    /// Attempt `i` failed retryably; the controller is sleeping.
    RetryingAfterDelay(u32),
    /// Terminal: a failure was handed back to the caller (or the work panicked).
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed)
    }
}

/// One retry session: a lazy, bounded, single-use sequence of [`Attempt`]s.
///
/// ```
/// use std::time::Duration;
/// use loopretry::retry::{RetryPolicy, Classifier};
///
/// let busy = Classifier::<&'static str>::predicate(|e| *e == "busy");
/// let policy = RetryPolicy::new(3, Duration::ZERO, busy).unwrap();
/// let mut session = policy.retries();
/// let mut result = None;
/// while let Some(attempt) = session.next_attempt() {
///     let index = attempt.index();
///     result = attempt.close(if index < 1 { Err("busy") } else { Ok("done") }).unwrap();
/// }
/// assert_eq!(result, Some("done"));
/// assert_eq!(session.delays(), 1);
/// ```
pub struct Retries<E> {
    policy: RetryPolicy<E>,
    state: SessionState,
    attempts: u32,
    delays: u32,
}

impl<E> Retries<E> {
    pub(crate) fn new(policy: RetryPolicy<E>) -> Self {
        Self {
            policy,
            state: SessionState::Pending(0),
            attempts: 0,
            delays: 0,
        }
    }

    /// Open the next attempt, or `None` once the session has finished.
    ///
    /// The returned handle borrows the session, so only one attempt can be
    /// open at a time.
    pub fn next_attempt(&mut self) -> Option<Attempt<'_, E>> {
        let SessionState::Pending(index) = self.state else {
            return None;
        };
        self.begin(index);
        Some(Attempt {
            session: self,
            index,
            closed: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once an attempt has closed without failure.
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Succeeded
    }

    /// Attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delays issued so far (one per suppressed failure).
    pub fn delays(&self) -> u32 {
        self.delays
    }

    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    fn begin(&mut self, index: u32) {
        self.state = SessionState::Running(index);
        self.attempts += 1;
        tracing::debug!(
            attempt = index + 1,
            max_attempts = self.policy.max_attempts(),
            "starting attempt"
        );
    }

    fn settle<T>(&mut self, index: u32, outcome: Result<T, E>) -> Result<Option<T>, E> {
        let err = match outcome {
            Ok(value) => {
                self.state = SessionState::Succeeded;
                tracing::debug!(attempt = index + 1, "attempt succeeded");
                return Ok(Some(value));
            }
            Err(err) => err,
        };

        match self.policy.decide(index, &err) {
            RetryDecision::RetryAfter(delay) => {
                self.state = SessionState::RetryingAfterDelay(index);
                tracing::debug!(
                    attempt = index + 1,
                    max_attempts = self.policy.max_attempts(),
                    ?delay,
                    "retryable failure, retrying after delay"
                );
                thread::sleep(delay);
                self.delays += 1;
                self.state = SessionState::Pending(index + 1);
                Ok(None)
            }
            RetryDecision::Exhausted => {
                self.state = SessionState::Failed;
                tracing::warn!(
                    attempts = index + 1,
                    "retry budget exhausted, propagating last failure"
                );
                Err(err)
            }
            RetryDecision::NotRetryable => {
                self.state = SessionState::Failed;
                tracing::debug!(attempt = index + 1, "non-retryable failure, propagating");
                Err(err)
            }
        }
    }
}

impl<E> fmt::Debug for Retries<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retries")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .field("delays", &self.delays)
            .finish()
    }
}

/// A single execution slot within a [`Retries`] session.
///
/// Close it with the outcome of the work via [`Attempt::close`] or
/// [`Attempt::run`]:
///
/// - `Ok(Some(value))`: success, the session is over.
/// - `Ok(None)`: retryable failure, suppressed after the delay; ask the
///   session for the next attempt.
/// - `Err(e)`: terminal failure, `e` is exactly what the work returned.
///
/// Dropping an unclosed handle counts as a clean exit, except during a
/// panic, which ends the session as failed. Panics are never retried.
pub struct Attempt<'s, E> {
    session: &'s mut Retries<E>,
    index: u32,
    closed: bool,
}

impl<E> Attempt<'_, E> {
    /// 0-based attempt number.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether a failure in this slot will be handed back regardless of kind.
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.session.policy.max_attempts()
    }

    pub fn close<T>(mut self, outcome: Result<T, E>) -> Result<Option<T>, E> {
        self.closed = true;
        self.session.settle(self.index, outcome)
    }

    pub fn run<T, F>(self, work: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let outcome = work();
        self.close(outcome)
    }
}

impl<E> Drop for Attempt<'_, E> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if thread::panicking() {
            self.session.state = SessionState::Failed;
            tracing::warn!(attempt = self.index + 1, "attempt panicked, ending retry session");
        } else {
            self.session.state = SessionState::Succeeded;
            tracing::debug!(attempt = self.index + 1, "attempt dropped without outcome");
        }
    }
}

impl<E> RetryPolicy<E> {
    /// Drive a whole session around `work`, which receives the 0-based
    /// attempt index. Returns the first success or the terminal failure,
    /// unchanged.
    pub fn call<T, F>(self, mut work: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut session = self.retries();
        let mut index = 0;
        loop {
            session.begin(index);
            if let Some(value) = session.settle(index, work(index))? {
                return Ok(value);
            }
            index += 1;
        }
    }
}
