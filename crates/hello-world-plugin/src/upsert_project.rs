// UpsertProjectHelloWorld – the hello-world plugin's `upsertProject` step.
//
// It provisions nothing; it shows the shape of a conforming step.

use async_trait::async_trait;
use hooks_sdk::{run_step, Outcome, Payload, StepCall, StepMessages, StepResult};

use crate::provisioner::{NoopProvisioner, Provisioner};

pub const SUCCESS_MESSAGE: &str = "Hello World !";
pub const FAILURE_MESSAGE: &str = "An error happend while creating Grafana instance";

/// Step run when a project is created or updated.
///
/// The failure branch reports `OK` as well; callers tell the two apart by the
/// presence of `error` (see [`StepResult::succeeded`]).
pub struct UpsertProjectHelloWorld<P = NoopProvisioner> {
    provisioner: P,
    messages: StepMessages,
}

impl UpsertProjectHelloWorld {
    pub fn new() -> Self {
        Self::with_provisioner(NoopProvisioner)
    }
}

impl Default for UpsertProjectHelloWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provisioner> UpsertProjectHelloWorld<P> {
    pub fn with_provisioner(provisioner: P) -> Self {
        Self {
            provisioner,
            messages: StepMessages::new(SUCCESS_MESSAGE, FAILURE_MESSAGE)
                .with_failure_outcome(Outcome::Ok),
        }
    }
}

#[async_trait]
impl<P: Provisioner> StepCall for UpsertProjectHelloWorld<P> {
    async fn call(&self, payload: &Payload) -> StepResult {
        tracing::debug!(fields = payload.fields().len(), "Running upsertProject hello-world step");
        run_step(&self.messages, || self.provisioner.provision(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use hooks_sdk::{parse_error, FaultKind, StepData};
    use serde_json::json;
    use std::sync::Arc;

    struct FailingProvisioner;

    fn grafana_error() -> anyhow::Error {
        anyhow::anyhow!("503 Service Unavailable").context("Failed to create Grafana instance")
    }

    #[async_trait]
    impl Provisioner for FailingProvisioner {
        async fn provision(&self, _payload: &Payload) -> Result<StepData> {
            Err(grafana_error())
        }
    }

    struct PanickingProvisioner;

    #[async_trait]
    impl Provisioner for PanickingProvisioner {
        async fn provision(&self, payload: &Payload) -> Result<StepData> {
            let name = payload.get_str("name").context("project has no name")?;
            panic!("unexpected project {name}");
        }
    }

    #[tokio::test]
    async fn empty_payload_says_hello() {
        let result = UpsertProjectHelloWorld::new().call(&Payload::new()).await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": {"result": "OK", "message": "Hello World !"},
                "hello": "world"
            })
        );
        assert!(result.succeeded());
    }

    #[tokio::test]
    async fn extra_payload_fields_are_accepted() {
        let payload = Payload::try_from(json!({
            "id": "9f1e",
            "name": "candilib",
            "organization": {"name": "mi"},
            "repositories": [{"internalRepoName": "api"}],
            "unknown": true
        }))
        .unwrap();
        let result = UpsertProjectHelloWorld::default().call(&payload).await;
        assert_eq!(result.status.message, SUCCESS_MESSAGE);
        assert_eq!(result.data().len(), 1);
        assert_eq!(result.data()["hello"], json!("world"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let step = UpsertProjectHelloWorld::new();
        let payload = Payload::try_from(json!({"name": "candilib"})).unwrap();
        let first = step.call(&payload).await;
        let second = step.call(&payload).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failure_reports_ok_with_error() {
        let step = UpsertProjectHelloWorld::with_provisioner(FailingProvisioner);
        let result = step.call(&Payload::new()).await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": {
                    "result": "OK",
                    "message": "An error happend while creating Grafana instance"
                },
                "error": serde_json::to_value(parse_error(&grafana_error())).unwrap()
            })
        );
        assert_eq!(result.status.result, Outcome::Ok);
        assert!(!result.succeeded());
        assert!(result.data().is_empty());
    }

    #[tokio::test]
    async fn panic_is_reported_not_raised() {
        let step = UpsertProjectHelloWorld::with_provisioner(PanickingProvisioner);
        let payload = Payload::try_from(json!({"name": "candilib"})).unwrap();
        let result = step.call(&payload).await;
        let error = result.error.expect("panic should be reported");
        assert_eq!(error.kind, FaultKind::Panic);
        assert_eq!(error.message, "unexpected project candilib");
        assert_eq!(result.status.message, FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn error_before_panic_is_an_error() {
        let step = UpsertProjectHelloWorld::with_provisioner(PanickingProvisioner);
        let result = step.call(&Payload::new()).await;
        let error = result.error.unwrap();
        assert_eq!(error.kind, FaultKind::Error);
        assert_eq!(error.message, "project has no name");
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let step: Arc<dyn StepCall> = Arc::new(UpsertProjectHelloWorld::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let step = Arc::clone(&step);
                tokio::spawn(async move {
                    let payload = Payload::try_from(json!({ "id": i })).unwrap();
                    step.call(&payload).await
                })
            })
            .collect();
        let results = futures::future::join_all(handles).await;
        for result in results {
            let result = result.unwrap();
            assert!(result.succeeded());
            assert_eq!(result.data()["hello"], json!("world"));
        }
    }
}
