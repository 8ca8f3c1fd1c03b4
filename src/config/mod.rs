//! Configuration module for stargen.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ReportSettings, SchemaSettings, ServerSettings, Settings, SettingsError,
};
