//! Storage backends for the encrypted store blob.
//!
//! A backend only moves opaque bytes around; encryption happens before
//! `save` and after `load`.  Backends are created from `Settings` by a
//! `BackendFactory` looked up by name in a `Registry`.

pub mod git;
pub mod local;
pub mod s3;

use tracing::debug;

use crate::config::settings::{non_empty, Settings};
use crate::errors::{Result, ScrtError};

/// Somewhere an encrypted store blob can live.
pub trait Backend {
    /// Whether a blob is present at the configured location.
    fn exists(&self) -> Result<bool>;

    /// Read the whole blob.
    fn load(&self) -> Result<Vec<u8>>;

    /// Replace the blob with `data`.
    fn save(&self, data: &[u8]) -> Result<()>;

    /// Human-readable location, used in messages.
    fn location(&self) -> String;
}

/// Describes one configuration option of a storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOption {
    /// Command-line flag, e.g. `--local-path`.
    pub flag: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Knows how to build one kind of `Backend`.
pub trait BackendFactory {
    /// Name used by `--storage` and the `storage` config key.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Options this storage type understands.
    fn options(&self) -> &'static [StorageOption];

    /// Validate the relevant part of `settings` and build the backend.
    fn build(&self, settings: &Settings) -> Result<Box<dyn Backend>>;
}

/// Ordered set of storage types, keyed by name.
pub struct Registry {
    factories: Vec<Box<dyn BackendFactory>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Add a storage type, replacing any previous one with the same name.
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) {
        debug!(name = factory.name(), "registering storage type");
        match self
            .factories
            .iter_mut()
            .find(|f| f.name() == factory.name())
        {
            Some(existing) => *existing = factory,
            None => self.factories.push(factory),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn BackendFactory> {
        self.factories
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    /// Registered storage type names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn BackendFactory> {
        self.factories.iter().map(|f| f.as_ref())
    }

    /// Build the backend selected by `settings.storage`.
    pub fn open(&self, settings: &Settings) -> Result<Box<dyn Backend>> {
        let name = non_empty(&settings.storage)
            .ok_or_else(|| ScrtError::MissingOption("storage type".into()))?;

        let factory = self.get(name).ok_or_else(|| {
            ScrtError::UnknownStorage(format!(
                "{name} (available: {})",
                self.names().join(", ")
            ))
        })?;

        debug!(storage = name, "building backend");
        factory.build(settings)
    }
}

impl Default for Registry {
    /// Registry with the built-in `local`, `s3` and `git` storage types.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(local::LocalFactory));
        registry.register(Box::new(s3::S3Factory));
        registry.register(Box::new(git::GitFactory));
        registry
    }
}

/// Fetch a required option or fail with `MissingOption(label)`.
pub(crate) fn required<'a>(value: &'a Option<String>, label: &str) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| ScrtError::MissingOption(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullFactory(&'static str);

    impl BackendFactory for NullFactory {
        fn name(&self) -> &'static str {
            self.0
        }
        fn display_name(&self) -> &'static str {
            "Null"
        }
        fn description(&self) -> &'static str {
            "discards everything"
        }
        fn options(&self) -> &'static [StorageOption] {
            &[]
        }
        fn build(&self, _settings: &Settings) -> Result<Box<dyn Backend>> {
            Err(ScrtError::Backend("null".into()))
        }
    }

    fn with_storage(name: &str) -> Settings {
        Settings {
            storage: Some(name.into()),
            ..Settings::default()
        }
    }

    #[test]
    fn default_registry_has_builtin_storage_types() {
        let registry = Registry::default();
        assert_eq!(registry.names(), vec!["local", "s3", "git"]);
        assert!(registry.get("local").is_some());
        assert!(registry.get("ftp").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = Registry::new();
        registry.register(Box::new(NullFactory("x")));
        registry.register(Box::new(NullFactory("x")));
        registry.register(Box::new(NullFactory("y")));
        assert_eq!(registry.names(), vec!["x", "y"]);
    }

    #[test]
    fn open_without_storage_is_missing_option() {
        let registry = Registry::default();
        let err = registry.open(&Settings::default()).err().unwrap();
        assert!(matches!(err, ScrtError::MissingOption(_)));
    }

    #[test]
    fn open_unknown_storage_lists_available() {
        let registry = Registry::default();
        let err = registry.open(&with_storage("ftp")).err().unwrap();
        match err {
            ScrtError::UnknownStorage(msg) => {
                assert!(msg.contains("ftp"));
                assert!(msg.contains("local, s3, git"));
            }
            other => panic!("expected UnknownStorage, got {other:?}"),
        }
    }

    #[test]
    fn open_validates_backend_options() {
        let registry = Registry::default();
        let err = registry.open(&with_storage("local")).err().unwrap();
        assert!(matches!(err, ScrtError::MissingOption(_)));
    }
}
