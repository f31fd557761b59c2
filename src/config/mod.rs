//! Configuration loading (`.scrt` YAML file, merged with CLI flags).

pub mod settings;

pub use settings::{GitSettings, LocalSettings, S3Settings, Settings};
