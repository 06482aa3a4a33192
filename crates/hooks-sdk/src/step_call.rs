use crate::parse_error::{parse_error, parse_panic};
use crate::payload::Payload;
use crate::step_result::{Outcome, StepData, StepResult};
use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// A step the orchestrator can invoke with a project payload.
///
/// The return type is a [`StepResult`], not a `Result`: a step converts every
/// fault of its domain action into a result it hands back. [`run_step`] does
/// that conversion.
#[async_trait]
pub trait StepCall: Send + Sync {
    /// Run the step once. Implementations keep no state between calls.
    async fn call(&self, payload: &Payload) -> StepResult;
}

/// Status messages a step reports on each branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMessages {
    pub success: String,
    pub failure: String,
    /// Status token used on the failure branch. Defaults to [`Outcome::Ko`].
    pub failure_outcome: Outcome,
}

impl StepMessages {
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failure: failure.into(),
            failure_outcome: Outcome::Ko,
        }
    }

    pub fn with_failure_outcome(mut self, outcome: Outcome) -> Self {
        self.failure_outcome = outcome;
        self
    }
}

/// Drive a step's domain action and translate its outcome into a result.
///
/// `Ok(data)` becomes a successful result with `data` next to the status.
/// An `Err`, or a panic while building or polling the action's future,
/// becomes a result carrying the normalized fault in `error`. Nothing escapes
/// this function.
pub async fn run_step<A, F>(messages: &StepMessages, action: A) -> StepResult
where
    A: FnOnce() -> F,
    F: Future<Output = anyhow::Result<StepData>>,
{
    let outcome = match std::panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
        Err(panic) => Err(panic),
    };

    match outcome {
        Ok(Ok(data)) => StepResult::ok(messages.success.clone(), data),
        Ok(Err(e)) => {
            tracing::warn!("Step action failed: {e:#}");
            StepResult::failed(
                messages.failure_outcome,
                messages.failure.clone(),
                parse_error(&e),
            )
        }
        Err(panic) => {
            let error = parse_panic(panic.as_ref());
            tracing::warn!("Step action panicked: {}", error.message);
            StepResult::failed(messages.failure_outcome, messages.failure.clone(), error)
        }
    }
}
