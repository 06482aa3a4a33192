use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error raised when a serialized payload cannot be turned into a [`Payload`].
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Failed to parse payload JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Project context handed to a step by the orchestrator.
///
/// Steps only read what they need; every field the host sent is kept in
/// `fields` so the payload can be forwarded unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Payload {
    /// Create an empty payload (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a payload from its JSON form. Anything but an object is rejected.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a top-level field holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// All fields, as received.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Payload {
    type Error = PayloadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(PayloadError::NotAnObject("null")),
            Value::Bool(_) => Err(PayloadError::NotAnObject("a boolean")),
            Value::Number(_) => Err(PayloadError::NotAnObject("a number")),
            Value::String(_) => Err(PayloadError::NotAnObject("a string")),
            Value::Array(_) => Err(PayloadError::NotAnObject("an array")),
        }
    }
}
