//! End-to-end behaviour of retry sessions: attempt counts, delays between
//! attempts, and which failures come back to the caller.

mod common;

use common::failure::{Kind, WorkError};
use loopretry::logging;
use loopretry::retry::{retries, Classifier, InvalidArgument, RetryPolicy, SessionState};
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(10);

#[test]
fn zero_attempts_rejected_before_iteration() {
    let err = retries::<WorkError>(0, DELAY, Classifier::any()).unwrap_err();
    assert_eq!(err, InvalidArgument::MaxAttempts { got: 0 });
}

#[test]
fn empty_kind_set_rejected_before_iteration() {
    let err = retries::<WorkError>(3, DELAY, Classifier::kinds([])).unwrap_err();
    assert_eq!(err, InvalidArgument::EmptyClassifier);
}

#[test]
fn no_failure_runs_once_without_sleeping() {
    logging::init_logging_stderr();
    let delay = Duration::from_secs(1);
    let mut session = retries::<WorkError>(3, delay, Classifier::any()).unwrap();
    let mut iterations = 0;
    let start = Instant::now();
    while let Some(attempt) = session.next_attempt() {
        attempt
            .run(|| {
                iterations += 1;
                Ok(())
            })
            .unwrap();
    }
    assert_eq!(iterations, 1);
    assert!(start.elapsed() < delay);
    assert_eq!(session.state(), SessionState::Succeeded);
    assert_eq!(session.delays(), 0);
}

#[test]
fn eventual_success_sleeps_between_failures() {
    logging::init_logging_stderr();
    let mut session = retries::<WorkError>(3, DELAY, Classifier::any()).unwrap();
    let mut attempts = 0;
    let start = Instant::now();
    while let Some(attempt) = session.next_attempt() {
        attempt
            .run(|| {
                attempts += 1;
                if attempts < 3 {
                    Err(WorkError::new(Kind::Value, "try again"))
                } else {
                    Ok(())
                }
            })
            .unwrap();
    }
    assert_eq!(attempts, 3);
    assert!(start.elapsed() >= DELAY * 2);
    assert_eq!(session.delays(), 2);
    assert!(session.is_completed());
}

#[test]
fn exhaustion_returns_original_failure() {
    logging::init_logging_stderr();
    let mut session = retries::<WorkError>(3, DELAY, Classifier::any()).unwrap();
    let start = Instant::now();
    let mut failure = None;
    while let Some(attempt) = session.next_attempt() {
        let index = attempt.index();
        let err = WorkError::new(Kind::Value, &format!("boom {}", index));
        if let Err(e) = attempt.close::<()>(Err(err)) {
            failure = Some(e);
        }
    }
    assert_eq!(failure, Some(WorkError::new(Kind::Value, "boom 2")));
    assert_eq!(session.attempts(), 3);
    assert_eq!(session.delays(), 2);
    assert!(start.elapsed() >= DELAY * 2);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn single_attempt_fails_without_retry() {
    let mut session = retries::<WorkError>(1, DELAY, Classifier::any()).unwrap();
    let mut attempts = 0;
    let mut failed = false;
    while let Some(attempt) = session.next_attempt() {
        let outcome = attempt.run::<(), _>(|| {
            attempts += 1;
            Err(WorkError::new(Kind::Value, "boom"))
        });
        failed = outcome.is_err();
    }
    assert!(failed);
    assert_eq!(attempts, 1);
    assert_eq!(session.delays(), 0);
}

#[test]
fn unlisted_kind_propagates_on_first_attempt() {
    let mut session = retries::<WorkError>(3, DELAY, Classifier::kind(Kind::Value)).unwrap();
    let start = Instant::now();
    let attempt = session.next_attempt().unwrap();
    let err = attempt
        .run::<(), _>(|| Err(WorkError::new(Kind::Type, "not expected")))
        .unwrap_err();
    assert_eq!(err.kind, Kind::Type);
    assert!(start.elapsed() < DELAY);
    assert_eq!(session.delays(), 0);
    assert!(session.next_attempt().is_none());
}

#[test]
fn termination_signal_not_swallowed_unless_listed() {
    let policy = RetryPolicy::<WorkError>::new(
        3,
        DELAY,
        Classifier::kinds([Kind::Value, Kind::Type, Kind::Custom]),
    )
    .unwrap();
    let mut calls = 0;
    let out: Result<(), WorkError> = policy.call(|_| {
        calls += 1;
        Err(WorkError::new(Kind::Terminate, "do not swallow"))
    });
    assert_eq!(out.unwrap_err().kind, Kind::Terminate);
    assert_eq!(calls, 1);
}

#[test]
fn default_classifier_does_not_retry_termination_signal() {
    let mut session = retries::<WorkError>(3, DELAY, Classifier::default()).unwrap();
    let start = Instant::now();
    let mut calls = 0;
    let mut failure = None;
    while let Some(attempt) = session.next_attempt() {
        let outcome = attempt.run::<(), _>(|| {
            calls += 1;
            Err(WorkError::new(Kind::Terminate, "do not swallow"))
        });
        if let Err(e) = outcome {
            failure = Some(e);
        }
    }
    assert_eq!(calls, 1);
    assert_eq!(session.delays(), 0);
    assert!(start.elapsed() < DELAY);
    assert_eq!(failure.map(|e| e.kind), Some(Kind::Terminate));
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn listed_termination_signal_is_retried() {
    let policy =
        RetryPolicy::<WorkError>::new(5, DELAY, Classifier::kind(Kind::Terminate)).unwrap();
    let start = Instant::now();
    let out = policy.call(|index| {
        if index < 2 {
            Err(WorkError::new(Kind::Terminate, "exit requested"))
        } else {
            Ok(index + 1)
        }
    });
    assert_eq!(out, Ok(3));
    assert!(start.elapsed() >= DELAY * 2);
}

#[test]
fn custom_kind_eventual_success() {
    let mut session = retries::<WorkError>(5, DELAY, Classifier::kind(Kind::Custom)).unwrap();
    let mut attempts = 0;
    let mut result = None;
    while let Some(attempt) = session.next_attempt() {
        result = attempt
            .run(|| {
                attempts += 1;
                if attempts < 3 {
                    Err(WorkError::new(Kind::Custom, "try again"))
                } else {
                    Ok(attempts)
                }
            })
            .unwrap();
    }
    assert_eq!(result, Some(3));
    assert_eq!(session.delays(), 2);
}

#[test]
fn finished_session_yields_nothing_more() {
    let mut session = retries::<WorkError>(3, Duration::ZERO, Classifier::any()).unwrap();
    while let Some(attempt) = session.next_attempt() {
        attempt.run(|| Ok(())).unwrap();
    }
    assert!(session.next_attempt().is_none());
    assert!(session.next_attempt().is_none());
    assert_eq!(session.attempts(), 1);
}
