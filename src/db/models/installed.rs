// src/db/models/installed.rs

//! InstalledPackage model - one row per package name on disk

use crate::error::{Error, Result};
use crate::package::PkgState;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// An installed package
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub id: Option<i64>,
    pub name: String,
    /// Version component only; see [`InstalledPackage::pkgver`]
    pub version: String,
    pub state: PkgState,
    /// True when pulled in as a dependency rather than requested
    pub automatic: bool,
}

impl InstalledPackage {
    /// Create a new installed package row
    pub fn new(name: &str, version: &str, state: PkgState) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            version: version.to_string(),
            state,
            automatic: false,
        }
    }

    /// The fully-qualified `name-version` string
    pub fn pkgver(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub(crate) fn id_or_internal(&self) -> Result<i64> {
        self.id
            .ok_or_else(|| Error::Internal("installed package without ID".to_string()))
    }

    /// Insert this package into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO packages (name, version, state, automatic)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &self.name,
                &self.version,
                self.state.as_str(),
                self.automatic as i32
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find an installed package by name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, version, state, automatic
             FROM packages WHERE name = ?1",
        )?;

        let pkg = stmt.query_row([name], Self::from_row).optional()?;
        Ok(pkg)
    }

    /// Find an installed package by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, version, state, automatic
             FROM packages WHERE id = ?1",
        )?;

        let pkg = stmt.query_row([id], Self::from_row).optional()?;
        Ok(pkg)
    }

    /// List all installed packages ordered by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, version, state, automatic
             FROM packages ORDER BY name",
        )?;

        let packages = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(packages)
    }

    /// Update the lifecycle state of this package
    pub fn set_state(&mut self, conn: &Connection, state: PkgState) -> Result<()> {
        let id = self.id_or_internal()?;
        conn.execute(
            "UPDATE packages SET state = ?1 WHERE id = ?2",
            params![state.as_str(), id],
        )?;
        self.state = state;
        Ok(())
    }

    /// Delete a package row (provides cascade)
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM packages WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Convert a database row to an InstalledPackage
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let state_str: String = row.get(3)?;
        let state = PkgState::parse(&state_str).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown package state '{}'", state_str).into(),
            )
        })?;
        let automatic_int: i32 = row.get(4)?;

        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            version: row.get(2)?,
            state,
            automatic: automatic_int != 0,
        })
    }
}
