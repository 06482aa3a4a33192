// Step result returned to the orchestrator.

use crate::parse_error::ParsedError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Domain fields a step returns next to its status block.
pub type StepData = Map<String, Value>;

/// Keys owned by [`StepResult`] itself; domain data may not use them.
pub const RESERVED_KEYS: [&str; 2] = ["status", "error"];

/// Status token the orchestrator uses to decide whether the pipeline goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Ok,
    Ko,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "OK"),
            Outcome::Ko => write!(f, "KO"),
        }
    }
}

impl Outcome {
    /// Returns `true` if the token signals success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }
}

/// The `status` block every step result carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub result: Outcome,
    pub message: String,
}

/// Structured output of a single step invocation.
///
/// Serializes as `{ "status": {..}, <data fields..>, "error"?: {..} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParsedError>,

    #[serde(flatten)]
    data: StepData,
}

impl StepResult {
    /// A successful result carrying the given domain fields.
    pub fn ok(message: impl Into<String>, data: StepData) -> Self {
        Self {
            status: Status {
                result: Outcome::Ok,
                message: message.into(),
            },
            error: None,
            data: strip_reserved(data),
        }
    }

    /// A result reporting a normalized fault.
    pub fn failed(result: Outcome, message: impl Into<String>, error: ParsedError) -> Self {
        Self {
            status: Status {
                result,
                message: message.into(),
            },
            error: Some(error),
            data: StepData::new(),
        }
    }

    /// Domain fields carried next to the status block.
    pub fn data(&self) -> &StepData {
        &self.data
    }

    /// Add a domain field. Reserved keys are refused and `false` is returned.
    pub fn insert_data(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            tracing::warn!("Refusing reserved key '{key}' in step data");
            return false;
        }
        self.data.insert(key, value);
        true
    }

    /// Whether the step actually succeeded.
    ///
    /// Looks at the `error` field as well as the status token, since a step may
    /// report `OK` while still carrying an error.
    pub fn succeeded(&self) -> bool {
        self.status.result.is_ok() && self.error.is_none()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn strip_reserved(mut data: StepData) -> StepData {
    for key in RESERVED_KEYS {
        if data.remove(key).is_some() {
            tracing::warn!("Dropping reserved key '{key}' from step data");
        }
    }
    data
}
