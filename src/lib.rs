//! Loop-driven retries with a fixed delay.
//!
//! ```
//! use std::io;
//! use std::time::Duration;
//! use loopretry::retry::{retries, Classifier};
//!
//! let mut session = retries(
//!     3,
//!     Duration::from_millis(10),
//!     Classifier::<io::Error>::kind(io::ErrorKind::TimedOut),
//! )
//! .unwrap();
//!
//! let mut tries = 0;
//! let mut body = None;
//! while let Some(attempt) = session.next_attempt() {
//!     body = attempt
//!         .run(|| {
//!             tries += 1;
//!             if tries == 1 {
//!                 Err(io::Error::from(io::ErrorKind::TimedOut))
//!             } else {
//!                 Ok("payload")
//!             }
//!         })
//!         .unwrap();
//! }
//! assert_eq!(body, Some("payload"));
//! assert_eq!(session.delays(), 1);
//! ```

pub mod config;
pub mod logging;
pub mod retry;
