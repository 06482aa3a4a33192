// Name → step mapping the host resolves invocations against.

use crate::payload::Payload;
use crate::step_call::StepCall;
use crate::step_result::StepResult;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("A step named '{0}' is already registered")]
    DuplicateStep(String),

    #[error("Unknown step: {0}")]
    UnknownStep(String),
}

struct Entry {
    name: String,
    step: Arc<dyn StepCall>,
}

/// Steps registered under their names. Lookups ignore ASCII case.
#[derive(Default)]
pub struct StepRegistry {
    steps: BTreeMap<String, Entry>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `step` under `name`. Names must be unique, case-insensitively.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        step: Arc<dyn StepCall>,
    ) -> Result<(), RegistryError> {
        let name = name.into().trim().to_string();
        let key = name.to_ascii_lowercase();
        if self.steps.contains_key(&key) {
            return Err(RegistryError::DuplicateStep(name));
        }
        tracing::debug!("Registered step '{name}'");
        self.steps.insert(key, Entry { name, step });
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn StepCall>> {
        self.steps
            .get(&name.trim().to_ascii_lowercase())
            .map(|entry| Arc::clone(&entry.step))
    }

    /// Resolve `name` and run it against `payload`.
    pub async fn invoke(&self, name: &str, payload: &Payload) -> Result<StepResult, RegistryError> {
        let step = self
            .resolve(name)
            .ok_or_else(|| RegistryError::UnknownStep(name.to_string()))?;
        tracing::debug!("Invoking step '{name}'");
        Ok(step.call(payload).await)
    }

    /// Registered names as given at registration, sorted case-insensitively.
    pub fn names(&self) -> Vec<&str> {
        self.steps.values().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
