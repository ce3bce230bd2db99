//! Environment lookups: platform directories and path expansion.

pub mod paths;

pub use paths::{config_dir, data_dir, default_settings_path, expand_tilde};
