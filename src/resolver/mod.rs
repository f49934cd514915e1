// src/resolver/mod.rs

//! Dependency resolution
//!
//! The resolver walks a repository record's runtime dependencies depth
//! first and decides, for every pattern, whether it is already satisfied
//! (installed or queued), satisfiable from the repository pool, or
//! missing. Satisfiable candidates are queued in the transaction set with
//! an action tag; everything else lands in the missing set.
//!
//! The engine reads its two data sources through narrow capabilities so
//! the installed database and the repository pool stay swappable in tests.

mod deps;

pub use deps::DepResolver;

use crate::error::Result;
use crate::package::PackageRecord;
use crate::version::PkgPattern;

/// Read access to the installed-package database
///
/// Lookups return `Ok(None)` for a clean miss; errors are reserved for
/// genuine lookup failures.
pub trait InstalledSource {
    /// Look up an installed package. With `by_pkgver` the key is a
    /// fully-qualified `name-version` string and must match exactly;
    /// otherwise the key is a package name.
    fn find(&self, key: &str, by_pkgver: bool) -> Result<Option<PackageRecord>>;

    /// Look up the installed package providing a virtual package. Key
    /// semantics as in [`InstalledSource::find`], applied to the provided
    /// virtual pkgvers.
    fn find_virtual(&self, key: &str, by_pkgver: bool) -> Result<Option<PackageRecord>>;
}

/// Read access to the repository pool
pub trait RepoSource {
    /// Find a real package satisfying the pattern. With `best`, prefer
    /// the highest version across repositories; otherwise return the
    /// first match in priority order.
    fn find_package(&self, pattern: &PkgPattern, best: bool) -> Result<Option<PackageRecord>>;

    /// Find a package providing a virtual package satisfying the
    /// pattern. First match in priority order wins.
    fn find_virtual(&self, pattern: &PkgPattern, best: bool) -> Result<Option<PackageRecord>>;
}
