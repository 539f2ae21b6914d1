//! Build configuration.
//!
//! A `skein.toml` mirrors the CLI surface: entry path plus output
//! directory and filename. CLI flags override file values; everything
//! has a default except the entry.
//!
//! ```toml
//! entry = "src/main.js"
//!
//! [output]
//! dir = "dist"
//! filename = "bundle.js"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BundleError, Result};

/// Top-level build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Entry module path.
    pub entry: Option<PathBuf>,
    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the bundle is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created if absent.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Output file name.
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            filename: default_filename(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_filename() -> String {
    "bundle.js".to_string()
}

impl BundleConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| BundleError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
