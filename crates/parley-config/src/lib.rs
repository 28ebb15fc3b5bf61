//! Configuration system for the Parley avatar broker.
//!
//! Provides TOML-based configuration with:
//! - `[server]`: backend URL, request timeout, refresh endpoint
//! - `[cache]`: avatar catalog and session TTLs
//! - `[auth]`: where bearer tokens are persisted
//! - Config file layering (user config dir + project-local override)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_lenient, load_config_with_options,
    save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
