//! Tokio runtime and mock server shared by the steps of one scenario.

use std::future::Future;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime handle that steps clone out of the scenario state.
#[derive(Clone)]
pub struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    /// Drives `future` to completion on the scenario runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Returns the scenario runtime, starting it and the mock server on first
/// use.
///
/// # Panics
///
/// Panics when the Tokio runtime cannot be created.
pub fn scenario_runtime(
    runtime: &Slot<ScenarioRuntime>,
    server: &Slot<MockServer>,
) -> ScenarioRuntime {
    let shared = runtime.get().unwrap_or_else(|| {
        let created = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        let handle = ScenarioRuntime(Rc::new(created));
        runtime.set(handle.clone());
        handle
    });

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    shared
}
