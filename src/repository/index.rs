// src/repository/index.rs

//! Repository index data structures
//!
//! A repository publishes its contents as a JSON index of package
//! records. The index is the persistence-layer view; [`super::RepoPool`]
//! consumes the in-memory [`super::Repository`] built from it.

use super::Repository;
use crate::error::Result;
use crate::package::PackageRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Repository index format (simple JSON)
#[derive(Debug, Serialize, Deserialize)]
pub struct RepositoryIndex {
    pub name: String,
    #[serde(default)]
    pub priority: i64,
    pub packages: Vec<PackageRecord>,
}

impl RepositoryIndex {
    /// Load an index from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let index: RepositoryIndex = serde_json::from_str(&data)?;
        debug!(
            "loaded repository index '{}' ({} packages)",
            index.name,
            index.packages.len()
        );
        Ok(index)
    }

    /// Build the in-memory repository this index describes
    pub fn into_repository(self) -> Repository {
        let mut repository = Repository::new(&self.name, self.priority);
        for record in self.packages {
            repository.add_package(record);
        }
        repository
    }
}
