//! Declarative table schema and idempotent table creation.

use std::fmt;

use sqlx::{FromRow, PgConnection};
use tracing::{debug, info};

use crate::errors::SeedError;

/// SQL column types used by the seeded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Varchar(u32),
    Numeric { precision: u32, scale: u32 },
    Date,
}

impl ColumnType {
    /// Name reported in `information_schema.columns.data_type`.
    fn catalog_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Varchar(_) => "character varying",
            ColumnType::Numeric { .. } => "numeric",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Varchar(len) => write!(f, "VARCHAR({len})"),
            ColumnType::Numeric { precision, scale } => write!(f, "NUMERIC({precision},{scale})"),
            ColumnType::Date => write!(f, "DATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: ColumnType,
    pub primary_key: bool,
    pub nullable: bool,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: ColumnType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            nullable: false,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    fn definition(&self) -> String {
        let mut def = format!("{} {}", quote_ident(self.name), self.sql_type);
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            def.push_str(" NOT NULL");
        }
        def
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

/// The `customers` table declaration.
pub fn customers_table() -> Table {
    Table::new(
        "customers",
        vec![
            Column::new("id", ColumnType::Integer).primary_key(),
            Column::new("name", ColumnType::Varchar(100)),
            Column::new(
                "revenue",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
            Column::new("signup_date", ColumnType::Date),
        ],
    )
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Same columns under another table name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: self.columns.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Quoted table name, safe to splice into SQL.
    pub fn quoted_name(&self) -> String {
        quote_ident(&self.name)
    }

    pub fn create_if_absent_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(Column::definition).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.quoted_name(),
            columns.join(", ")
        )
    }

    /// Compares the declaration against catalog rows, returning the first difference.
    fn find_mismatch(&self, existing: &[CatalogColumn]) -> Option<String> {
        for column in &self.columns {
            let Some(found) = existing.iter().find(|c| c.column_name == column.name) else {
                return Some(format!("missing column {}", column.name));
            };

            let expected = column.sql_type;
            let type_matches = found.data_type == expected.catalog_name()
                && match expected {
                    ColumnType::Varchar(len) => {
                        found.character_maximum_length == Some(len as i32)
                    }
                    ColumnType::Numeric { precision, scale } => {
                        found.numeric_precision == Some(precision as i32)
                            && found.numeric_scale == Some(scale as i32)
                    }
                    ColumnType::Integer | ColumnType::Date => true,
                };
            if !type_matches {
                return Some(format!(
                    "column {} has type {}, expected {}",
                    column.name,
                    found.describe(),
                    expected
                ));
            }

            let nullable = found.is_nullable == "YES";
            if nullable && !column.nullable {
                return Some(format!("column {} allows NULL", column.name));
            }
        }

        existing
            .iter()
            .find(|c| c.is_nullable == "NO" && !self.columns.iter().any(|d| d.name == c.column_name))
            .map(|c| format!("unexpected required column {}", c.column_name))
    }
}

/// Row of `information_schema.columns` for one column.
#[derive(Debug, Clone, FromRow)]
struct CatalogColumn {
    column_name: String,
    data_type: String,
    character_maximum_length: Option<i32>,
    numeric_precision: Option<i32>,
    numeric_scale: Option<i32>,
    is_nullable: String,
}

impl CatalogColumn {
    fn describe(&self) -> String {
        match (
            self.character_maximum_length,
            self.numeric_precision,
            self.numeric_scale,
        ) {
            (Some(len), _, _) => format!("{}({len})", self.data_type),
            (None, Some(p), Some(s)) if self.data_type == "numeric" => {
                format!("{}({p},{s})", self.data_type)
            }
            _ => self.data_type.clone(),
        }
    }
}

/// Creates `table` if it does not exist, then checks that whatever now holds
/// the name is a table of the declared shape. Existing rows are untouched.
pub async fn ensure_table(conn: &mut PgConnection, table: &Table) -> Result<(), SeedError> {
    let ddl = table.create_if_absent_sql();
    debug!("Executing: {ddl}");
    sqlx::query(&ddl)
        .execute(&mut *conn)
        .await
        .map_err(SeedError::Schema)?;

    let table_type: Option<String> = sqlx::query_scalar(
        r#"
        SELECT table_type::text
        FROM information_schema.tables
        WHERE table_schema = current_schema() AND table_name = $1
        "#,
    )
    .bind(table.name())
    .fetch_optional(&mut *conn)
    .await
    .map_err(SeedError::Schema)?;

    let mismatch = |detail: String| SeedError::SchemaMismatch {
        table: table.name().to_string(),
        detail,
    };

    match table_type.as_deref() {
        Some("BASE TABLE") => {}
        Some(other) => return Err(mismatch(format!("existing object is a {other}"))),
        None => return Err(mismatch("not visible in the current schema".to_string())),
    }

    let existing: Vec<CatalogColumn> = sqlx::query_as(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               character_maximum_length::int4 AS character_maximum_length,
               numeric_precision::int4 AS numeric_precision,
               numeric_scale::int4 AS numeric_scale,
               is_nullable::text AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1
        ORDER BY ordinal_position
        "#,
    )
    .bind(table.name())
    .fetch_all(&mut *conn)
    .await
    .map_err(SeedError::Schema)?;

    if let Some(detail) = table.find_mismatch(&existing) {
        return Err(mismatch(detail));
    }

    info!("Table {} is present", table.name());
    Ok(())
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(
        name: &str,
        data_type: &str,
        len: Option<i32>,
        numeric: Option<(i32, i32)>,
        nullable: bool,
    ) -> CatalogColumn {
        CatalogColumn {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            character_maximum_length: len,
            numeric_precision: numeric.map(|(p, _)| p),
            numeric_scale: numeric.map(|(_, s)| s),
            is_nullable: if nullable { "YES" } else { "NO" }.to_string(),
        }
    }

    fn customers_catalog() -> Vec<CatalogColumn> {
        vec![
            catalog("id", "integer", None, Some((32, 0)), false),
            catalog("name", "character varying", Some(100), None, false),
            catalog("revenue", "numeric", None, Some((10, 2)), false),
            catalog("signup_date", "date", None, None, false),
        ]
    }

    #[test]
    fn test_create_sql() {
        assert_eq!(
            customers_table().create_if_absent_sql(),
            "CREATE TABLE IF NOT EXISTS \"customers\" (\
             \"id\" INTEGER PRIMARY KEY, \
             \"name\" VARCHAR(100) NOT NULL, \
             \"revenue\" NUMERIC(10,2) NOT NULL, \
             \"signup_date\" DATE NOT NULL)"
        );
    }

    #[test]
    fn test_with_name_keeps_columns() {
        let table = customers_table().with_name("customers_copy");
        assert_eq!(table.name(), "customers_copy");
        assert_eq!(table.columns(), customers_table().columns());
    }

    #[test]
    fn test_quoting_escapes_embedded_quotes() {
        let table = customers_table().with_name("odd\"name");
        assert_eq!(table.quoted_name(), "\"odd\"\"name\"");
    }

    #[test]
    fn test_matching_catalog_has_no_mismatch() {
        assert_eq!(customers_table().find_mismatch(&customers_catalog()), None);
    }

    #[test]
    fn test_missing_column() {
        let mut existing = customers_catalog();
        existing.retain(|c| c.column_name != "revenue");
        assert_eq!(
            customers_table().find_mismatch(&existing).as_deref(),
            Some("missing column revenue")
        );
    }

    #[test]
    fn test_wrong_numeric_scale() {
        let mut existing = customers_catalog();
        existing[2] = catalog("revenue", "numeric", None, Some((12, 4)), false);
        assert_eq!(
            customers_table().find_mismatch(&existing).as_deref(),
            Some("column revenue has type numeric(12,4), expected NUMERIC(10,2)")
        );
    }

    #[test]
    fn test_float_revenue_rejected() {
        let mut existing = customers_catalog();
        existing[2] = catalog("revenue", "double precision", None, Some((53, 0)), false);
        assert!(customers_table().find_mismatch(&existing).is_some());
    }

    #[test]
    fn test_nullable_column_rejected() {
        let mut existing = customers_catalog();
        existing[1] = catalog("name", "character varying", Some(100), None, true);
        assert_eq!(
            customers_table().find_mismatch(&existing).as_deref(),
            Some("column name allows NULL")
        );
    }

    #[test]
    fn test_extra_optional_column_tolerated() {
        let mut existing = customers_catalog();
        existing.push(catalog("notes", "text", None, None, true));
        assert_eq!(customers_table().find_mismatch(&existing), None);

        existing.push(catalog("tier", "text", None, None, false));
        assert_eq!(
            customers_table().find_mismatch(&existing).as_deref(),
            Some("unexpected required column tier")
        );
    }
}
