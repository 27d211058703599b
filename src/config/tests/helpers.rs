//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PagethreadConfig;

/// Configuration source, listed from lowest to highest precedence.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` in the order given, as the loader would.
pub fn merge(layers: &[(Layer, Value)]) -> PagethreadConfig {
    let mut composer = MergeComposer::new();
    for (layer, value) in layers.iter().cloned() {
        match layer {
            Layer::Defaults => composer.push_defaults(value),
            Layer::File => composer.push_file(value, None),
            Layer::Environment => composer.push_environment(value),
            Layer::Cli => composer.push_cli(value),
        }
    }
    PagethreadConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}
