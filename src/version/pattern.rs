// src/version/pattern.rs

//! Dependency pattern parsing and matching
//!
//! A pattern names a required package, optionally constrained to a version
//! range: `name>=1.2`, `name<3.0_1`, or a bare `name`.

use super::{PkgVersion, VersionConstraint};
use crate::error::{Error, Result};
use std::fmt;

/// Split a fully-qualified `name-version` string into its components
///
/// The split point is the last `-` whose suffix starts with a digit, so
/// multi-word names survive: `libx11-devel-1.8_2` → ("libx11-devel",
/// "1.8_2").
pub fn split_pkgver(pkgver: &str) -> Option<(&str, &str)> {
    let (name, version) = pkgver.rsplit_once('-')?;
    if name.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((name, version))
}

/// A dependency pattern: package name plus version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkgPattern {
    name: String,
    constraint: VersionConstraint,
}

impl PkgPattern {
    /// Parse a dependency pattern
    ///
    /// Examples:
    /// - "libc>=2.30" → name="libc", GreaterOrEqual(2.30)
    /// - "shells" → name="shells", Any
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidPattern(s.to_string()));
        }

        let (name, constraint) = match s.find(['>', '<', '=']) {
            Some(pos) => {
                let (name, rest) = s.split_at(pos);
                (name, VersionConstraint::parse(rest)?)
            }
            None => (s, VersionConstraint::Any),
        };

        if name.is_empty() {
            return Err(Error::InvalidPattern(s.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            constraint,
        })
    }

    /// The package name this pattern requires
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint version, absent for bare-name patterns
    pub fn version(&self) -> Option<&PkgVersion> {
        self.constraint.version()
    }

    /// The version constraint
    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }

    /// Check whether a fully-qualified `name-version` string satisfies
    /// this pattern
    ///
    /// Fails with `InvalidPkgver` when the pkgver string cannot be split
    /// or its version component cannot be parsed.
    pub fn matches(&self, pkgver: &str) -> Result<bool> {
        let (name, version) =
            split_pkgver(pkgver).ok_or_else(|| Error::InvalidPkgver(pkgver.to_string()))?;

        if name != self.name {
            return Ok(false);
        }

        let version = PkgVersion::parse(version)?;
        Ok(self.constraint.satisfies(&version))
    }
}

impl fmt::Display for PkgPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.constraint)
    }
}
