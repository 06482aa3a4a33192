// Domain action run by the hello-world steps.

use anyhow::Result;
use async_trait::async_trait;
use hooks_sdk::{Payload, StepData};
use serde_json::Value;

/// The provisioning work behind a step. Whatever it returns is placed next to
/// the step's status block.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision(&self, payload: &Payload) -> Result<StepData>;
}

/// Provisions nothing and answers `{ "hello": "world" }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvisioner;

#[async_trait]
impl Provisioner for NoopProvisioner {
    async fn provision(&self, _payload: &Payload) -> Result<StepData> {
        let mut data = StepData::new();
        data.insert("hello".to_string(), Value::String("world".to_string()));
        Ok(data)
    }
}
