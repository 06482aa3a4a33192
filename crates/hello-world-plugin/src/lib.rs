// hello-world-plugin: Example provisioning plugin.
// Its single step answers "Hello World !" and shows the shape a step must
// follow to be driven by the hooks host.

pub mod provisioner;
pub mod upsert_project;

use hooks_sdk::{RegistryError, StepRegistry};
use std::sync::Arc;

// Re-exports for convenient access
pub use provisioner::{NoopProvisioner, Provisioner};
pub use upsert_project::UpsertProjectHelloWorld;

pub const PLUGIN_NAME: &str = "hello-world";

/// Name the `upsertProject` step is registered under.
pub const UPSERT_PROJECT_STEP: &str = "upsertProjectHelloWorld";

/// Register every step of this plugin.
pub fn register(registry: &mut StepRegistry) -> Result<(), RegistryError> {
    registry.register(UPSERT_PROJECT_STEP, Arc::new(UpsertProjectHelloWorld::new()))
}
