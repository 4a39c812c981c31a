//! Caller-side error type with a few distinct kinds, one of them standing in
//! for a deliberate "terminate now" signal.

use loopretry::retry::FailureKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Value,
    Type,
    Custom,
    Terminate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkError {
    pub kind: Kind,
    pub message: String,
}

impl WorkError {
    pub fn new(kind: Kind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for WorkError {}

impl FailureKind for WorkError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }

    fn is_terminal(&self) -> bool {
        self.kind == Kind::Terminate
    }
}
