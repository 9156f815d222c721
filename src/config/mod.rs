/// Event catalog loading from catalog.toml
pub mod catalog;

/// Runtime settings from environment variables
pub mod settings;
