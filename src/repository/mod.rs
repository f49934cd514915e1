// src/repository/mod.rs

//! Repository pool and candidate selection
//!
//! This module handles selecting the best candidate when multiple matches
//! exist across different repositories or versions. Selection criteria, in
//! order: repository priority (higher is better), version (newer is
//! better), first match as the stable tie-breaker. Virtual-package
//! providers are first-match in priority order.

mod index;

pub use index::RepositoryIndex;

use crate::error::Result;
use crate::package::PackageRecord;
use crate::resolver::RepoSource;
use crate::version::{split_pkgver, PkgPattern, PkgVersion};
use std::env;
use tracing::debug;

/// Options for candidate selection
#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Specific repository to search (if None, search all enabled)
    pub repository: Option<String>,
    /// Specific architecture to filter (if None, use system architecture)
    pub architecture: Option<String>,
}

/// A single package repository
#[derive(Debug, Clone)]
pub struct Repository {
    pub name: String,
    /// Higher priority repositories win ties
    pub priority: i64,
    pub enabled: bool,
    packages: Vec<PackageRecord>,
}

impl Repository {
    /// Create an empty repository
    pub fn new(name: &str, priority: i64) -> Self {
        Self {
            name: name.to_string(),
            priority,
            enabled: true,
            packages: Vec::new(),
        }
    }

    /// Add a package record, stamping its origin if unset
    pub fn add_package(&mut self, mut record: PackageRecord) {
        if record.repository.is_none() {
            record.repository = Some(self.name.clone());
        }
        self.packages.push(record);
    }

    /// Package records in this repository
    pub fn packages(&self) -> &[PackageRecord] {
        &self.packages
    }
}

/// An ordered pool of repositories
#[derive(Debug, Default)]
pub struct RepoPool {
    repositories: Vec<Repository>,
    options: SelectionOptions,
}

impl RepoPool {
    /// Create an empty pool with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pool with selection options
    pub fn with_options(options: SelectionOptions) -> Self {
        Self {
            repositories: Vec::new(),
            options,
        }
    }

    /// Register a repository; the pool keeps repositories ordered by
    /// descending priority, registration order breaking ties
    pub fn add_repository(&mut self, repository: Repository) {
        self.repositories.push(repository);
        self.repositories.sort_by_key(|repo| std::cmp::Reverse(repo.priority));
    }

    /// Detect the architecture candidates must be compatible with
    fn system_architecture(&self) -> String {
        self.options
            .architecture
            .clone()
            .unwrap_or_else(|| env::consts::ARCH.to_string())
    }

    /// Check if a package architecture is compatible with the system
    pub fn is_architecture_compatible(pkg_arch: Option<&str>, system_arch: &str) -> bool {
        match pkg_arch {
            None => true,
            Some("noarch") => true,
            Some(arch) => arch == system_arch,
        }
    }

    fn repo_selected(&self, repository: &Repository) -> bool {
        if !repository.enabled {
            return false;
        }
        match &self.options.repository {
            Some(name) => &repository.name == name,
            None => true,
        }
    }
}

/// Order candidate pkgvers, newest first on equal priority
fn version_of(pkgver: &str) -> Option<PkgVersion> {
    let (_, version) = split_pkgver(pkgver)?;
    PkgVersion::parse(version).ok()
}

impl RepoSource for RepoPool {
    fn find_package(&self, pattern: &PkgPattern, best: bool) -> Result<Option<PackageRecord>> {
        let system_arch = self.system_architecture();
        let mut candidates: Vec<(i64, &PackageRecord)> = Vec::new();

        for repository in &self.repositories {
            if !self.repo_selected(repository) {
                continue;
            }
            for record in &repository.packages {
                if !Self::is_architecture_compatible(record.architecture.as_deref(), &system_arch)
                {
                    continue;
                }
                if !matches!(pattern.matches(&record.pkgver), Ok(true)) {
                    continue;
                }
                if !best {
                    return Ok(Some(record.clone()));
                }
                candidates.push((repository.priority, record));
            }
        }

        if candidates.is_empty() {
            return Ok(None);
        }

        // Priority first, then version; the sort is stable so the first
        // match wins remaining ties.
        candidates.sort_by(|a, b| {
            b.0.cmp(&a.0).then_with(|| {
                match (version_of(&a.1.pkgver), version_of(&b.1.pkgver)) {
                    (Some(va), Some(vb)) => vb.cmp(&va),
                    _ => b.1.pkgver.cmp(&a.1.pkgver),
                }
            })
        });

        let selected = candidates[0].1;
        debug!(
            "selected candidate {} for '{}' (repository {})",
            selected.pkgver,
            pattern,
            selected.repository.as_deref().unwrap_or("-")
        );
        Ok(Some(selected.clone()))
    }

    fn find_virtual(&self, pattern: &PkgPattern, _best: bool) -> Result<Option<PackageRecord>> {
        let system_arch = self.system_architecture();

        // First provider in priority order wins; there is no conflict
        // detection between alternative providers.
        for repository in &self.repositories {
            if !self.repo_selected(repository) {
                continue;
            }
            for record in &repository.packages {
                if !Self::is_architecture_compatible(record.architecture.as_deref(), &system_arch)
                {
                    continue;
                }
                if record.provides_virtual(pattern) {
                    debug!(
                        "selected virtual provider {} for '{}'",
                        record.pkgver, pattern
                    );
                    return Ok(Some(record.clone()));
                }
            }
        }

        Ok(None)
    }
}
