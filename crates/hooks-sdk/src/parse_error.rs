// Normalization of caught step faults into a serializable description.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Message used when a panic payload is neither `&str` nor `String`.
const OPAQUE_PANIC_MESSAGE: &str = "step panicked with a non-string payload";

/// How a fault escaped the domain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    /// The action returned `Err`.
    Error,
    /// The action panicked while being polled.
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Error => write!(f, "error"),
            FaultKind::Panic => write!(f, "panic"),
        }
    }
}

/// A fault flattened to plain strings so it can travel inside a step result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedError {
    pub kind: FaultKind,

    /// Display message of the outermost error.
    pub message: String,

    /// Display messages of the source chain, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl fmt::Display for ParsedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Normalize an error returned by a domain action.
pub fn parse_error(error: &anyhow::Error) -> ParsedError {
    ParsedError {
        kind: FaultKind::Error,
        message: error.to_string(),
        causes: error.chain().skip(1).map(|cause| cause.to_string()).collect(),
    }
}

/// Normalize the payload of a caught panic.
pub fn parse_panic(payload: &(dyn Any + Send)) -> ParsedError {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        OPAQUE_PANIC_MESSAGE.to_string()
    };

    ParsedError {
        kind: FaultKind::Panic,
        message,
        causes: Vec::new(),
    }
}
