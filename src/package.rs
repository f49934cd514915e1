// src/package.rs

//! Package record and lifecycle state types
//!
//! A [`PackageRecord`] is the typed form of a package entry as it appears
//! in a repository index or the installed database. The resolver annotates
//! records it queues with an [`ActionTag`] and the pre-transaction
//! [`PkgState`] of the package name on disk.

use crate::error::{Error, Result};
use crate::version::PkgPattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// On-disk lifecycle state of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PkgState {
    NotInstalled,
    Unpacked,
    Installed,
    ConfigFiles,
    HalfRemoved,
}

impl PkgState {
    /// Database/text representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PkgState::NotInstalled => "not-installed",
            PkgState::Unpacked => "unpacked",
            PkgState::Installed => "installed",
            PkgState::ConfigFiles => "config-files",
            PkgState::HalfRemoved => "half-removed",
        }
    }

    /// Parse the database/text representation
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "not-installed" => Ok(PkgState::NotInstalled),
            "unpacked" => Ok(PkgState::Unpacked),
            "installed" => Ok(PkgState::Installed),
            "config-files" => Ok(PkgState::ConfigFiles),
            "half-removed" => Ok(PkgState::HalfRemoved),
            other => Err(Error::Internal(format!("unknown package state '{}'", other))),
        }
    }
}

impl fmt::Display for PkgState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a record joined the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionTag {
    Install,
    Update,
    Configure,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::Install => "install",
            ActionTag::Update => "update",
            ActionTag::Configure => "configure",
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package entry from a repository index or the installed database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name
    pub pkgname: String,
    /// Fully-qualified `name-version` string
    pub pkgver: String,
    /// Origin repository locator, absent for installed records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Declared runtime dependency patterns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_depends: Vec<String>,
    /// Virtual pkgvers this package provides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    /// Target architecture, `None`/"noarch" compatible with everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    /// On-disk state of this package name before the transaction
    #[serde(default)]
    pub state: PkgState,
    /// Action the transaction will perform, set by the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<ActionTag>,
    /// True for records pulled in as dependencies rather than requested
    #[serde(default)]
    pub automatic_install: bool,
}

impl Default for PkgState {
    fn default() -> Self {
        PkgState::NotInstalled
    }
}

impl PackageRecord {
    /// Create a record with the given identity and no dependencies
    pub fn new(pkgname: &str, pkgver: &str) -> Self {
        Self {
            pkgname: pkgname.to_string(),
            pkgver: pkgver.to_string(),
            repository: None,
            run_depends: Vec::new(),
            provides: Vec::new(),
            architecture: None,
            state: PkgState::NotInstalled,
            transaction: None,
            automatic_install: false,
        }
    }

    /// Check whether this record provides a virtual package satisfying
    /// the pattern
    ///
    /// Malformed provides entries never match.
    pub fn provides_virtual(&self, pattern: &PkgPattern) -> bool {
        self.provides
            .iter()
            .any(|pkgver| matches!(pattern.matches(pkgver), Ok(true)))
    }
}
