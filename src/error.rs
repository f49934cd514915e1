// src/error.rs

//! Error types for strata operations

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the resolver and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// A dependency pattern could not be parsed
    #[error("invalid package pattern '{0}'")]
    InvalidPattern(String),

    /// A `name-version` string could not be split or parsed
    #[error("invalid pkgver '{0}'")]
    InvalidPkgver(String),

    /// Recursion went past the depth limit
    #[error("dependency graph too deep (max {limit}) at '{pkgname}'")]
    DepthExceeded { limit: usize, pkgname: String },

    /// A package name recurred on the active resolution path
    #[error("dependency cycle detected: {chain}")]
    DependencyCycle { chain: String },

    /// Internal signal: the entry is already present in the target set.
    /// Swallowed by the resolver driver, never returned to callers.
    #[error("'{0}' already present")]
    AlreadyPresent(String),

    /// Installed-database lookup failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Repository index could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository index could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Corrupt container or unexpected state
    #[error("internal error: {0}")]
    Internal(String),
}
