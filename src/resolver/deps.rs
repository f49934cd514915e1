// src/resolver/deps.rs

//! Recursive runtime-dependency traversal
//!
//! For every pattern in a record's `run_depends` the driver runs four
//! passes in order: installed check, already-queued check, repository
//! pool lookup, post-lookup installed check. Each pass either completes
//! the decision (skip, record missing, queue and recurse) or falls
//! through to the next. Traversal is depth first and bounded.

use crate::error::{Error, Result};
use crate::package::{ActionTag, PackageRecord, PkgState};
use crate::transaction::TransactionSet;
use crate::version::{split_pkgver, PkgPattern};
use tracing::debug;

use super::{InstalledSource, RepoSource};

/// Maximum recursion depth for the dependency walk
const MAX_DEPTH: usize = 512;

/// Depth and cycle guard for the active recursion path
#[derive(Debug, Default)]
struct TraversalGuard {
    depth: usize,
    active: Vec<String>,
}

impl TraversalGuard {
    fn enter(&mut self, pkgname: &str) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::DepthExceeded {
                limit: MAX_DEPTH,
                pkgname: pkgname.to_string(),
            });
        }
        if self.active.iter().any(|name| name == pkgname) {
            let mut chain = self.active.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(pkgname);
            return Err(Error::DependencyCycle { chain });
        }
        self.depth += 1;
        self.active.push(pkgname.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
        self.active.pop();
    }
}

/// Dependency resolution engine
///
/// Borrows its two read-only data sources; the transaction set is owned
/// by the caller and borrowed mutably for the duration of one
/// [`DepResolver::resolve`] call.
pub struct DepResolver<'a> {
    installed: &'a dyn InstalledSource,
    pool: &'a dyn RepoSource,
}

impl<'a> DepResolver<'a> {
    /// Create a resolver over an installed database and a repository pool
    pub fn new(installed: &'a dyn InstalledSource, pool: &'a dyn RepoSource) -> Self {
        Self { installed, pool }
    }

    /// Resolve the transitive runtime dependencies of a repository record
    ///
    /// On success every pattern reachable from `record.run_depends` is
    /// either satisfied by an installed or queued package, queued in the
    /// transaction set with an action tag, or present in the missing
    /// set. On failure the transaction set is indeterminate and must be
    /// discarded by the caller.
    pub fn resolve(&self, trans: &mut TransactionSet, record: &PackageRecord) -> Result<()> {
        if record.run_depends.is_empty() {
            return Ok(());
        }

        debug!("finding required dependencies for '{}'", record.pkgver);
        let mut guard = TraversalGuard::default();
        self.find_run_deps(trans, &record.run_depends, &record.pkgver, &mut guard)
    }

    fn find_run_deps(
        &self,
        trans: &mut TransactionSet,
        rdeps: &[String],
        curpkg: &str,
        guard: &mut TraversalGuard,
    ) -> Result<()> {
        let curname = split_pkgver(curpkg).map_or(curpkg, |(name, _)| name);
        guard.enter(curname)?;
        let result = self.walk_deps(trans, rdeps, curpkg, guard);
        guard.leave();
        result
    }

    fn walk_deps(
        &self,
        trans: &mut TransactionSet,
        rdeps: &[String],
        curpkg: &str,
        guard: &mut TraversalGuard,
    ) -> Result<()> {
        for reqpkg in rdeps {
            let pattern = PkgPattern::parse(reqpkg)?;
            debug!("{} requires dependency '{}'", curpkg, reqpkg);

            // Pass 1: check if the required dependency is already
            // installed and fully matched.
            let mut action = ActionTag::Install;
            let mut state = PkgState::NotInstalled;

            let mut installed = self.installed.find(pattern.name(), false)?;
            if installed.is_none() {
                installed = self.installed.find_virtual(pattern.name(), false)?;
            }

            if let Some(instpkg) = installed {
                state = instpkg.state;

                if instpkg.provides_virtual(&pattern) {
                    debug!("'{}' [virtual] satisfied by '{}'", reqpkg, instpkg.pkgver);
                    continue;
                }

                if pattern.matches(&instpkg.pkgver)? {
                    if state == PkgState::Unpacked {
                        // Matches the pattern but was only unpacked; the
                        // intended action is carried into pass 4.
                        debug!(
                            "'{}' matched by unpacked '{}', must be configured",
                            reqpkg, instpkg.pkgver
                        );
                        action = ActionTag::Configure;
                    } else {
                        debug!("'{}' satisfied by installed '{}'", reqpkg, instpkg.pkgver);
                        continue;
                    }
                }
                // Installed but the version does not match the pattern:
                // fall through and look for a candidate.
            }

            // Pass 2: check if the dependency was already queued in the
            // transaction, virtual providers first.
            if let Some(queued) = trans.find_queued_virtual(&pattern) {
                debug!("'{}' queued in transaction ({})", reqpkg, queued.pkgver);
                continue;
            }
            if let Some(queued) = trans.find_queued(&pattern) {
                debug!("'{}' queued in transaction ({})", reqpkg, queued.pkgver);
                continue;
            }

            // Pass 3: find the dependency in the repository pool. With no
            // candidate anywhere the pattern goes into the missing set.
            let candidate = match self.pool.find_virtual(&pattern, true)? {
                Some(candidate) => candidate,
                None => match self.pool.find_package(&pattern, true)? {
                    Some(candidate) => candidate,
                    None => {
                        match trans.add_missing(pattern) {
                            Ok(()) => {
                                debug!("'{}' added into the missing deps set", reqpkg);
                            }
                            Err(Error::AlreadyPresent(_)) => {
                                debug!("'{}' missing dep already recorded", reqpkg);
                            }
                            Err(err) => return Err(err),
                        }
                        continue;
                    }
                },
            };

            // Pass 4: check if the candidate is already installed under
            // another identity (virtual packages, older versions).
            let mut found = self.installed.find(&candidate.pkgver, true)?;
            if found.is_none() {
                found = self.installed.find_virtual(&candidate.pkgver, true)?;
            }

            match found {
                None => {
                    action = ActionTag::Install;
                    debug!("'{}' satisfied by '{}', installing", reqpkg, candidate.pkgver);
                }
                Some(instpkg) => {
                    state = instpkg.state;
                    match instpkg.state {
                        PkgState::Installed => {
                            action = ActionTag::Update;
                            debug!("'{}' satisfied by '{}', updating", reqpkg, candidate.pkgver);
                        }
                        PkgState::Unpacked => {
                            action = ActionTag::Install;
                            debug!("'{}' satisfied by '{}', installing", reqpkg, candidate.pkgver);
                        }
                        _ => {}
                    }
                }
            }

            let pkgver = candidate.pkgver.clone();
            let next_rdeps = candidate.run_depends.clone();

            match trans.queue(candidate, action, state) {
                Ok(()) => {}
                // A record with this pkgname is already queued; the
                // first match wins.
                Err(Error::AlreadyPresent(_)) => continue,
                Err(err) => return Err(err),
            }

            if next_rdeps.is_empty() {
                continue;
            }

            debug!("{}: finding dependencies", pkgver);
            self.find_run_deps(trans, &next_rdeps, &pkgver, guard)?;
        }

        Ok(())
    }
}
