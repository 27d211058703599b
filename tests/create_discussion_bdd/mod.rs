//! Support modules for the discussion creation BDD tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{CreationState, run_create_discussion, seed};
