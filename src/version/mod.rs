// src/version/mod.rs

//! Version handling and constraint satisfaction for package dependencies
//!
//! This module provides version parsing and comparison for binary package
//! versions of the form `version[_revision]`, plus the constraint operators
//! used by dependency patterns.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

mod pattern;

pub use pattern::{split_pkgver, PkgPattern};

/// A parsed package version with version and revision components
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PkgVersion {
    pub version: String,
    pub revision: Option<u32>,
}

impl PkgVersion {
    /// Parse a package version string
    ///
    /// Format: version[_revision]
    /// Examples:
    /// - "1.2.3" → version="1.2.3", revision=None
    /// - "1.2.3_2" → version="1.2.3", revision=Some(2)
    pub fn parse(s: &str) -> Result<Self> {
        let (version, revision) = if let Some(pos) = s.rfind('_') {
            let (v, r) = s.split_at(pos);
            let revision = r[1..]
                .parse::<u32>()
                .map_err(|_| Error::InvalidPkgver(s.to_string()))?;
            (v.to_string(), Some(revision))
        } else {
            (s.to_string(), None)
        };

        if version.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::InvalidPkgver(s.to_string()));
        }

        Ok(Self { version, revision })
    }

    /// Convert to a semver::Version for comparison
    ///
    /// Package versions are frequently not semver-compliant, so we
    /// normalize: if the version parses as semver, use it directly;
    /// otherwise extract major.minor.patch from the dotted components.
    fn to_semver(&self) -> Option<Version> {
        if let Ok(v) = Version::parse(&self.version) {
            return Some(v);
        }

        let parts: Vec<&str> = self.version.split('.').collect();
        let major = parts.first().and_then(|s| s.parse::<u64>().ok())?;
        let minor = parts.get(1).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
        let patch = parts.get(2).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);

        Some(Version::new(major, minor, patch))
    }

    /// Compare two package versions
    pub fn compare(&self, other: &PkgVersion) -> Ordering {
        match (self.to_semver(), other.to_semver()) {
            (Some(v1), Some(v2)) => match v1.cmp(&v2) {
                Ordering::Equal => {}
                ord => return ord,
            },
            _ => {
                // Fall back to string comparison if normalization fails
                match self.version.cmp(&other.version) {
                    Ordering::Equal => {}
                    ord => return ord,
                }
            }
        }

        // A missing revision sorts below any explicit revision
        self.revision.unwrap_or(0).cmp(&other.revision.unwrap_or(0))
    }
}

impl fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)?;
        if let Some(revision) = self.revision {
            write!(f, "_{}", revision)?;
        }
        Ok(())
    }
}

impl Ord for PkgVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for PkgVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Version constraint operators used by dependency patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Any version is acceptable (bare-name pattern)
    Any,
    /// Exact version match
    Exact(PkgVersion),
    /// Greater than
    GreaterThan(PkgVersion),
    /// Greater than or equal
    GreaterOrEqual(PkgVersion),
    /// Less than
    LessThan(PkgVersion),
    /// Less than or equal
    LessOrEqual(PkgVersion),
}

impl VersionConstraint {
    /// Parse a version constraint string
    ///
    /// Examples:
    /// - ">=1.2.3" → GreaterOrEqual(1.2.3)
    /// - "<2.0" → LessThan(2.0)
    /// - "=1.5.0_1" → Exact(1.5.0_1)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() {
            return Ok(VersionConstraint::Any);
        }

        if let Some(rest) = s.strip_prefix(">=") {
            let version = PkgVersion::parse(rest.trim())?;
            Ok(VersionConstraint::GreaterOrEqual(version))
        } else if let Some(rest) = s.strip_prefix("<=") {
            let version = PkgVersion::parse(rest.trim())?;
            Ok(VersionConstraint::LessOrEqual(version))
        } else if let Some(rest) = s.strip_prefix('>') {
            let version = PkgVersion::parse(rest.trim())?;
            Ok(VersionConstraint::GreaterThan(version))
        } else if let Some(rest) = s.strip_prefix('<') {
            let version = PkgVersion::parse(rest.trim())?;
            Ok(VersionConstraint::LessThan(version))
        } else if let Some(rest) = s.strip_prefix('=') {
            let version = PkgVersion::parse(rest.trim())?;
            Ok(VersionConstraint::Exact(version))
        } else {
            // No operator means exact match
            let version = PkgVersion::parse(s)?;
            Ok(VersionConstraint::Exact(version))
        }
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &PkgVersion) -> bool {
        match self {
            VersionConstraint::Any => true,
            VersionConstraint::Exact(v) => version == v,
            VersionConstraint::GreaterThan(v) => version > v,
            VersionConstraint::GreaterOrEqual(v) => version >= v,
            VersionConstraint::LessThan(v) => version < v,
            VersionConstraint::LessOrEqual(v) => version <= v,
        }
    }

    /// The version this constraint compares against, if any
    pub fn version(&self) -> Option<&PkgVersion> {
        match self {
            VersionConstraint::Any => None,
            VersionConstraint::Exact(v)
            | VersionConstraint::GreaterThan(v)
            | VersionConstraint::GreaterOrEqual(v)
            | VersionConstraint::LessThan(v)
            | VersionConstraint::LessOrEqual(v) => Some(v),
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => Ok(()),
            VersionConstraint::Exact(v) => write!(f, "={}", v),
            VersionConstraint::GreaterThan(v) => write!(f, ">{}", v),
            VersionConstraint::GreaterOrEqual(v) => write!(f, ">={}", v),
            VersionConstraint::LessThan(v) => write!(f, "<{}", v),
            VersionConstraint::LessOrEqual(v) => write!(f, "<={}", v),
        }
    }
}
