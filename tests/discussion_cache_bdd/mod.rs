//! Support modules for the discussion cache BDD tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{CacheState, page_json, seed};
