//! Per-vendor SQL for the bookkeeping table
//!
//! The bookkeeping table has a single column, `version`, holding the
//! primary key of every applied migration. Identifier quoting and
//! placeholder syntax differ by backend; everything else is shared.

use std::fmt;

/// Database backends the store knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Sqlite,
    Postgres,
    MySql,
}

impl Vendor {
    /// Name used in log fields and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Sqlite => "sqlite",
            Vendor::Postgres => "postgres",
            Vendor::MySql => "mysql",
        }
    }

    /// Quote an identifier already validated as `[A-Za-z_][A-Za-z0-9_]*`
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            Vendor::Sqlite | Vendor::Postgres => format!("\"{}\"", ident),
            Vendor::MySql => format!("`{}`", ident),
        }
    }

    /// Positional placeholder for the first bound parameter
    pub fn placeholder(&self) -> &'static str {
        match self {
            Vendor::Sqlite => "?1",
            Vendor::Postgres => "$1",
            Vendor::MySql => "?",
        }
    }

    fn version_column_type(&self) -> &'static str {
        match self {
            Vendor::Sqlite => "TEXT",
            Vendor::Postgres => "VARCHAR",
            // MySQL needs a bounded length for a primary key
            Vendor::MySql => "VARCHAR(255)",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four statements an adapter runs against the bookkeeping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookkeepingSql {
    pub create_table: String,
    pub select_versions: String,
    pub insert_version: String,
    pub delete_version: String,
}

impl BookkeepingSql {
    /// Build the statements for `table` on `vendor`.
    ///
    /// `table` must already have passed `AdapterConfig::validate`.
    pub fn new(vendor: Vendor, table: &str) -> Self {
        let table = vendor.quote_ident(table);
        let column = vendor.quote_ident("version");
        let placeholder = vendor.placeholder();

        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {} ({} {} NOT NULL PRIMARY KEY)",
                table,
                column,
                vendor.version_column_type()
            ),
            select_versions: format!("SELECT {} FROM {} ORDER BY {} ASC", column, table, column),
            insert_version: format!("INSERT INTO {} ({}) VALUES ({})", table, column, placeholder),
            delete_version: format!("DELETE FROM {} WHERE {} = {}", table, column, placeholder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_statements() {
        let sql = BookkeepingSql::new(Vendor::Sqlite, "dbmigrations");
        assert_eq!(
            sql.create_table,
            "CREATE TABLE IF NOT EXISTS \"dbmigrations\" (\"version\" TEXT NOT NULL PRIMARY KEY)"
        );
        assert_eq!(
            sql.select_versions,
            "SELECT \"version\" FROM \"dbmigrations\" ORDER BY \"version\" ASC"
        );
        assert_eq!(
            sql.insert_version,
            "INSERT INTO \"dbmigrations\" (\"version\") VALUES (?1)"
        );
    }

    #[test]
    fn test_postgres_statements() {
        let sql = BookkeepingSql::new(Vendor::Postgres, "schema_log");
        assert_eq!(
            sql.insert_version,
            "INSERT INTO \"schema_log\" (\"version\") VALUES ($1)"
        );
        assert_eq!(
            sql.delete_version,
            "DELETE FROM \"schema_log\" WHERE \"version\" = $1"
        );
    }

    #[test]
    fn test_mysql_statements() {
        let sql = BookkeepingSql::new(Vendor::MySql, "dbmigrations");
        assert_eq!(
            sql.create_table,
            "CREATE TABLE IF NOT EXISTS `dbmigrations` (`version` VARCHAR(255) NOT NULL PRIMARY KEY)"
        );
        assert_eq!(
            sql.delete_version,
            "DELETE FROM `dbmigrations` WHERE `version` = ?"
        );
    }
}
