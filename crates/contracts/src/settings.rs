//! MapperSettings - Config Loader output
//!
//! The single required setting names the transform definition file; the
//! rest tunes the stream driver.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Mapper run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Path to the transform definition file (TOML or JSON) declaring the
    /// override provider's capabilities
    pub transform_path: PathBuf,

    /// Channel capacity between the reader and the dispatch loop
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    100
}
