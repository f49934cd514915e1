// src/transaction/mod.rs

//! Pending transaction state
//!
//! A [`TransactionSet`] collects the output of dependency resolution: the
//! ordered set of package records queued for action and the deduplicated
//! set of patterns no candidate could satisfy. The caller owns the set and
//! hands it to the resolver mutably for the duration of one call; a
//! downstream topological sort consumes `unsorted_deps` and relies on its
//! insertion order as a stable tie-breaker.

use crate::error::{Error, Result};
use crate::package::{ActionTag, PackageRecord, PkgState};
use crate::version::PkgPattern;
use std::cmp::Ordering;
use tracing::debug;

/// Accumulated transaction state across one or more resolver calls
#[derive(Debug, Default)]
pub struct TransactionSet {
    /// Records queued for action, depth-first pre-order, unique by pkgname
    unsorted_deps: Vec<PackageRecord>,
    /// Patterns with no satisfying candidate, unique by pattern name
    missing_deps: Vec<PkgPattern>,
}

impl TransactionSet {
    /// Create an empty transaction set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records queued for action, in resolution order
    pub fn unsorted_deps(&self) -> &[PackageRecord] {
        &self.unsorted_deps
    }

    /// Patterns for which no candidate was found
    pub fn missing_deps(&self) -> &[PkgPattern] {
        &self.missing_deps
    }

    /// Queue a repository candidate as part of the transaction
    ///
    /// Annotates the record with the action to perform, the
    /// pre-transaction on-disk state of its package name, and the
    /// automatic-install flag, then appends it. A record whose pkgname is
    /// already queued is refused with the internal `AlreadyPresent`
    /// signal; the first queued record wins.
    pub fn queue(
        &mut self,
        mut record: PackageRecord,
        action: ActionTag,
        installed_state: PkgState,
    ) -> Result<()> {
        if self
            .unsorted_deps
            .iter()
            .any(|queued| queued.pkgname == record.pkgname)
        {
            return Err(Error::AlreadyPresent(record.pkgname));
        }

        record.transaction = Some(action);
        record.state = installed_state;
        record.automatic_install = true;

        debug!(
            "{}: added into the transaction ({})",
            record.pkgver,
            record.repository.as_deref().unwrap_or("-")
        );
        self.unsorted_deps.push(record);
        Ok(())
    }

    /// Find a queued record whose pkgver satisfies the pattern
    pub fn find_queued(&self, pattern: &PkgPattern) -> Option<&PackageRecord> {
        self.unsorted_deps
            .iter()
            .find(|record| matches!(pattern.matches(&record.pkgver), Ok(true)))
    }

    /// Find a queued record providing a virtual package satisfying the
    /// pattern
    pub fn find_queued_virtual(&self, pattern: &PkgPattern) -> Option<&PackageRecord> {
        self.unsorted_deps
            .iter()
            .find(|record| record.provides_virtual(pattern))
    }

    /// Record a pattern as missing, newest version wins
    ///
    /// If a same-name entry already exists: an equal or greater version
    /// keeps the existing entry and signals `AlreadyPresent`; a lesser
    /// version is replaced by the new pattern. Patterns without a version
    /// constraint order below any versioned pattern.
    pub fn add_missing(&mut self, pattern: PkgPattern) -> Result<()> {
        let mut replace = None;

        for (idx, existing) in self.missing_deps.iter().enumerate() {
            if existing.name() != pattern.name() {
                continue;
            }

            match cmp_constraint_versions(existing, &pattern) {
                Ordering::Equal | Ordering::Greater => {
                    return Err(Error::AlreadyPresent(pattern.to_string()));
                }
                Ordering::Less => {
                    debug!(
                        "missing dep '{}' superseded by newer '{}'",
                        existing, pattern
                    );
                    replace = Some(idx);
                    break;
                }
            }
        }

        if let Some(idx) = replace {
            self.missing_deps.remove(idx);
        }
        self.missing_deps.push(pattern);
        Ok(())
    }
}

/// Order two patterns by constraint version; absent versions sort lowest
fn cmp_constraint_versions(a: &PkgPattern, b: &PkgPattern) -> Ordering {
    match (a.version(), b.version()) {
        (Some(va), Some(vb)) => va.cmp(vb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
