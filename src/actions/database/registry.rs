// src/actions/database/registry.rs

//! Dialect lookup for database actions.
//!
//! Pure table, no side effects. An unknown identifier yields `None`; callers
//! turn that into a job-level error when the job is planned, before any
//! action of the job runs.

use std::fmt;

/// Database engine families with a bundled driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    MsSql,
    Sqlite,
}

const MAPPING: &[(&str, Dialect)] = &[
    ("postgresql", Dialect::Postgres),
    ("postgres", Dialect::Postgres),
    ("mysql", Dialect::MySql),
    ("mssql", Dialect::MsSql),
    ("sqlserver", Dialect::MsSql),
    ("sqlite", Dialect::Sqlite),
];

/// Resolve a dialect identifier, ignoring case and surrounding whitespace.
pub fn resolve(identifier: &str) -> Option<Dialect> {
    let wanted = identifier.trim().to_lowercase();
    MAPPING
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, dialect)| *dialect)
}

/// All identifiers `resolve` accepts.
pub fn known_identifiers() -> impl Iterator<Item = &'static str> {
    MAPPING.iter().map(|(name, _)| *name)
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::MsSql => "mssql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
