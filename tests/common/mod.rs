// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use rusqlite::Connection;
use strata::db;
use strata::db::models::{InstalledPackage, ProvideEntry};
use strata::version::split_pkgver;
use strata::{PackageRecord, PkgState, RepoPool, Repository};
use tempfile::TempDir;

/// Create an empty installed-package database in a temp directory.
///
/// Returns (TempDir, Connection) - keep the TempDir alive to prevent
/// cleanup.
pub fn setup_installed_db() -> (TempDir, Connection) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("installed.db");

    let conn = db::open(&path).unwrap();
    db::migrate(&conn).unwrap();
    (temp_dir, conn)
}

/// Insert an installed package with optional virtual provides.
pub fn install(
    conn: &Connection,
    name: &str,
    version: &str,
    state: PkgState,
    provides: &[(&str, &str)],
) {
    let mut pkg = InstalledPackage::new(name, version, state);
    let package_id = pkg.insert(conn).unwrap();

    for (virtual_name, virtual_version) in provides {
        ProvideEntry::new(package_id, virtual_name, virtual_version)
            .insert(conn)
            .unwrap();
    }
}

/// Build a repository package record from a pkgver and dependency
/// patterns.
pub fn repo_pkg(pkgver: &str, rdeps: &[&str]) -> PackageRecord {
    let (name, _) = split_pkgver(pkgver).unwrap();
    let mut record = PackageRecord::new(name, pkgver);
    record.run_depends = rdeps.iter().map(|s| s.to_string()).collect();
    record
}

/// Build a single-repository pool from package records.
pub fn pool_with(packages: Vec<PackageRecord>) -> RepoPool {
    let mut repository = Repository::new("main", 0);
    for record in packages {
        repository.add_package(record);
    }

    let mut pool = RepoPool::new();
    pool.add_repository(repository);
    pool
}
