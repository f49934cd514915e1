// src/db/models/provide.rs

//! ProvideEntry model - virtual packages offered by installed packages
//!
//! Each row aliases an installed package under a virtual name so
//! dependencies on the virtual name resolve without knowing the real
//! provider.

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A virtual package provided by an installed package
#[derive(Debug, Clone)]
pub struct ProvideEntry {
    pub id: Option<i64>,
    pub package_id: i64,
    /// Virtual package name
    pub name: String,
    /// Virtual package version
    pub version: String,
}

impl ProvideEntry {
    /// Create a new provide entry
    pub fn new(package_id: i64, name: &str, version: &str) -> Self {
        Self {
            id: None,
            package_id,
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// The fully-qualified virtual `name-version` string
    pub fn pkgver(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Insert this provide into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO provides (package_id, name, version)
             VALUES (?1, ?2, ?3)",
            params![self.package_id, &self.name, &self.version],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find the first provider of a virtual name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, package_id, name, version
             FROM provides WHERE name = ?1 LIMIT 1",
        )?;

        let provide = stmt.query_row([name], Self::from_row).optional()?;
        Ok(provide)
    }

    /// Find the provider of an exact virtual `name-version`
    pub fn find_by_name_version(
        conn: &Connection,
        name: &str,
        version: &str,
    ) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, package_id, name, version
             FROM provides WHERE name = ?1 AND version = ?2 LIMIT 1",
        )?;

        let provide = stmt
            .query_row(params![name, version], Self::from_row)
            .optional()?;
        Ok(provide)
    }

    /// All provides of an installed package
    pub fn find_by_package(conn: &Connection, package_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, package_id, name, version
             FROM provides WHERE package_id = ?1",
        )?;

        let provides = stmt
            .query_map([package_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(provides)
    }

    /// Delete all provides of an installed package
    pub fn delete_by_package(conn: &Connection, package_id: i64) -> Result<()> {
        conn.execute("DELETE FROM provides WHERE package_id = ?1", [package_id])?;
        Ok(())
    }

    /// Convert a database row to a ProvideEntry
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            package_id: row.get(1)?,
            name: row.get(2)?,
            version: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::InstalledPackage;
    use crate::package::PkgState;

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::migrate(&conn).unwrap();

        let mut pkg = InstalledPackage::new("dash", "0.5", PkgState::Installed);
        let id = pkg.insert(&conn).unwrap();
        (conn, id)
    }

    #[test]
    fn test_insert_and_find() {
        let (conn, package_id) = setup();

        ProvideEntry::new(package_id, "virtual-sh", "1.0")
            .insert(&conn)
            .unwrap();

        let found = ProvideEntry::find_by_name(&conn, "virtual-sh").unwrap().unwrap();
        assert_eq!(found.package_id, package_id);
        assert_eq!(found.pkgver(), "virtual-sh-1.0");

        assert!(ProvideEntry::find_by_name(&conn, "virtual-csh").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_version() {
        let (conn, package_id) = setup();

        ProvideEntry::new(package_id, "virtual-sh", "1.0")
            .insert(&conn)
            .unwrap();

        assert!(ProvideEntry::find_by_name_version(&conn, "virtual-sh", "1.0")
            .unwrap()
            .is_some());
        assert!(ProvideEntry::find_by_name_version(&conn, "virtual-sh", "2.0")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_by_package() {
        let (conn, package_id) = setup();

        ProvideEntry::new(package_id, "virtual-sh", "1.0")
            .insert(&conn)
            .unwrap();
        ProvideEntry::new(package_id, "virtual-ash", "1.0")
            .insert(&conn)
            .unwrap();

        let provides = ProvideEntry::find_by_package(&conn, package_id).unwrap();
        assert_eq!(provides.len(), 2);
    }

    #[test]
    fn test_delete_cascades_with_package() {
        let (conn, package_id) = setup();

        ProvideEntry::new(package_id, "virtual-sh", "1.0")
            .insert(&conn)
            .unwrap();
        InstalledPackage::delete(&conn, package_id).unwrap();

        assert!(ProvideEntry::find_by_name(&conn, "virtual-sh").unwrap().is_none());
    }
}
