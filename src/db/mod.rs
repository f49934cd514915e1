// src/db/mod.rs

//! Installed-package database
//!
//! SQLite-backed record of what is on disk: one row per installed package
//! plus the virtual packages each one provides. [`InstalledDb`] adapts a
//! connection to the [`InstalledSource`] capability the resolver reads.

pub mod models;

use crate::error::Result;
use crate::package::PackageRecord;
use crate::resolver::InstalledSource;
use crate::version::split_pkgver;
use models::{InstalledPackage, ProvideEntry};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Open (or create) the database at the given path
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current: i32 = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current >= SCHEMA_VERSION {
        debug!("schema is up to date (version {})", current);
        return Ok(());
    }

    for version in (current + 1)..=SCHEMA_VERSION {
        info!("applying schema migration to version {}", version);
        match version {
            1 => migrate_v1(conn)?,
            other => panic!("unknown migration version: {}", other),
        }
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    }

    Ok(())
}

/// Initial schema - Version 1
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Installed packages, one row per package name
        CREATE TABLE packages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            version TEXT NOT NULL,
            state TEXT NOT NULL CHECK(state IN (
                'not-installed', 'unpacked', 'installed',
                'config-files', 'half-removed'
            )),
            automatic INTEGER NOT NULL DEFAULT 0,
            installed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        -- Virtual packages provided by installed packages
        CREATE TABLE provides (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_id INTEGER NOT NULL REFERENCES packages(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            version TEXT NOT NULL,
            UNIQUE(package_id, name)
        );

        CREATE INDEX idx_provides_name ON provides(name);
        ",
    )?;
    Ok(())
}

/// Read adapter from a database connection to the resolver's
/// installed-source capability
pub struct InstalledDb<'a> {
    conn: &'a Connection,
}

impl<'a> InstalledDb<'a> {
    /// Create a new adapter borrowing the connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn to_record(&self, pkg: InstalledPackage) -> Result<PackageRecord> {
        let provides = ProvideEntry::find_by_package(self.conn, pkg.id_or_internal()?)?;

        let mut record = PackageRecord::new(&pkg.name, &pkg.pkgver());
        record.state = pkg.state;
        record.automatic_install = pkg.automatic;
        record.provides = provides.iter().map(|entry| entry.pkgver()).collect();
        Ok(record)
    }
}

impl InstalledSource for InstalledDb<'_> {
    fn find(&self, key: &str, by_pkgver: bool) -> Result<Option<PackageRecord>> {
        let name = if by_pkgver {
            match split_pkgver(key) {
                Some((name, _)) => name,
                None => return Ok(None),
            }
        } else {
            key
        };

        let Some(pkg) = InstalledPackage::find_by_name(self.conn, name)? else {
            return Ok(None);
        };
        if by_pkgver && pkg.pkgver() != key {
            return Ok(None);
        }

        self.to_record(pkg).map(Some)
    }

    fn find_virtual(&self, key: &str, by_pkgver: bool) -> Result<Option<PackageRecord>> {
        let provide = if by_pkgver {
            match split_pkgver(key) {
                Some((name, version)) => {
                    ProvideEntry::find_by_name_version(self.conn, name, version)?
                }
                None => return Ok(None),
            }
        } else {
            ProvideEntry::find_by_name(self.conn, key)?
        };

        let Some(provide) = provide else {
            return Ok(None);
        };

        let Some(pkg) = InstalledPackage::find_by_id(self.conn, provide.package_id)? else {
            return Ok(None);
        };

        self.to_record(pkg).map(Some)
    }
}
