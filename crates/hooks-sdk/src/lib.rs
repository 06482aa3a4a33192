// hooks-sdk: Contract between provisioning steps and the orchestrator that runs them.
// This crate has no dependencies on the plugin or host crates; it defines the
// payload and result shapes, fault normalization, and step registration.

pub mod parse_error;
pub mod payload;
pub mod registry;
pub mod step_call;
pub mod step_result;

// Re-export commonly used items at crate root
pub use parse_error::{parse_error, parse_panic, FaultKind, ParsedError};
pub use payload::{Payload, PayloadError};
pub use registry::{RegistryError, StepRegistry};
pub use step_call::{run_step, StepCall, StepMessages};
pub use step_result::{Outcome, Status, StepData, StepResult, RESERVED_KEYS};
