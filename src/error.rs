//! Error types for the bundler.
//!
//! Every build-time failure is fatal to the whole run: the bundle is
//! either complete or absent, never partial. Each variant carries the
//! module responsible so diagnostics point at the right file.

use std::path::PathBuf;
use thiserror::Error;

/// All the ways a bundle build can fail.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Source is not syntactically valid JavaScript.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The syntax tree contains a construct the lowering step cannot
    /// express in loader-call form (re-exports, destructuring exports).
    #[error("cannot lower {construct} in {}", path.display())]
    Transform { path: PathBuf, construct: String },

    /// An import specifier does not resolve to a file on disk.
    #[error(
        "cannot resolve '{specifier}' imported from {} (tried {})",
        importer.display(),
        candidate.display()
    )]
    UnresolvedModule {
        specifier: String,
        importer: PathBuf,
        candidate: PathBuf,
    },

    /// Reading a module source or writing the bundle failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build config file is present but malformed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BundleError>;
