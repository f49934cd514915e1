// src/lib.rs

//! Strata package manager core
//!
//! Dependency-resolution engine for a binary package manager: given a
//! repository package record, compute the transitive set of packages that
//! must be installed, updated, or configured so that every declared runtime
//! dependency is satisfied.
//!
//! # Architecture
//!
//! - Typed records: packages travel as [`PackageRecord`] values, not loose
//!   dictionaries
//! - Capability seams: the resolver reads the installed database and the
//!   repository pool through narrow traits
//! - Transaction set: resolved packages accumulate in insertion order,
//!   unresolvable patterns in a deduplicated missing set
//! - SQLite-backed installed database, in-memory repository pool

pub mod db;
mod error;
pub mod package;
pub mod repository;
pub mod resolver;
pub mod transaction;
pub mod version;

pub use error::{Error, Result};
pub use package::{ActionTag, PackageRecord, PkgState};
pub use repository::{RepoPool, Repository, SelectionOptions};
pub use resolver::{DepResolver, InstalledSource, RepoSource};
pub use transaction::TransactionSet;
pub use version::{PkgPattern, PkgVersion, VersionConstraint};
