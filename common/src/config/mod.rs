//! YAML-backed settings with validation on every load and store.

mod manager;
mod provider;
mod serializer;

pub use manager::ConfigManager;
pub use provider::{ConfigContentProvider, FileContentConfigProvider};
pub use serializer::{ConfigSerializer, YamlConfigSerializer};

/// Checked by `ConfigManager` before a config is handed out or persisted.
/// The error string is shown to the user as is.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
