//! Schema-management surface of the driver.
//!
//! The search store is schema-less and has no query language the driver
//! could rewrite, so every schema or query-shaping operation fails with
//! [`DriverError::UnsupportedOperation`]. The identifier helpers are identity
//! functions.

use super::{DRIVER_NAME, SearchDriver};
use crate::driver::error::DriverError;
use serde_json::{Map, Value};

const SCHEMA_LESS: &str = "the search store is schema-less";
const NO_QUERY_LANGUAGE: &str = "the driver has no query language to rewrite";

/// Column description handed to schema operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Declared column type, if any.
    pub column_type: Option<String>,
    /// Declared length, if any.
    pub length: Option<String>,
    /// Declared default, if any.
    pub default: Option<String>,
    /// Unique constraint flag.
    pub is_unique: bool,
}

/// Schema builder for this driver. It has no values: one is never produced.
#[derive(Debug)]
pub enum SchemaBuilder {}

/// Feature flags reported by the driver. All are off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "flat capability flags mirror the driver contract"
)]
pub struct DriverCapabilities {
    /// Tree-structured tables.
    pub tree_tables: bool,
    /// `RETURNING`/`OUTPUT` clauses.
    pub returning_sql: bool,
    /// Server-side UUID generation.
    pub uuid_generation: bool,
    /// Full-text column types.
    pub full_text_column_type: bool,
}

fn unsupported<T>(operation: &'static str, reason: &'static str) -> Result<T, DriverError> {
    Err(DriverError::UnsupportedOperation {
        driver: DRIVER_NAME,
        operation,
        reason,
    })
}

impl SearchDriver {
    /// Feature flags. Every flag is `false`.
    #[must_use]
    pub const fn capabilities(&self) -> DriverCapabilities {
        DriverCapabilities {
            tree_tables: false,
            returning_sql: false,
            uuid_generation: false,
            full_text_column_type: false,
        }
    }

    /// Always fails: there is no schema to build.
    pub fn create_schema_builder(&self) -> Result<SchemaBuilder, DriverError> {
        unsupported("create_schema_builder", SCHEMA_LESS)
    }

    /// Always fails: queries are not rewritten.
    pub fn escape_query_with_parameters(
        &self,
        _query: &str,
        _parameters: &Map<String, Value>,
    ) -> Result<(String, Vec<Value>), DriverError> {
        unsupported("escape_query_with_parameters", NO_QUERY_LANGUAGE)
    }

    /// Always fails: there are no column types.
    pub fn normalize_type(&self, _column: &ColumnSpec) -> Result<String, DriverError> {
        unsupported("normalize_type", SCHEMA_LESS)
    }

    /// Always fails: there are no column defaults.
    pub fn normalize_default(&self, _column: &ColumnSpec) -> Result<String, DriverError> {
        unsupported("normalize_default", SCHEMA_LESS)
    }

    /// Always fails: there are no unique constraints.
    pub fn normalize_is_unique(&self, _column: &ColumnSpec) -> Result<bool, DriverError> {
        unsupported("normalize_is_unique", SCHEMA_LESS)
    }

    /// Always fails: there are no column lengths.
    pub fn get_column_length(&self, _column: &ColumnSpec) -> Result<String, DriverError> {
        unsupported("get_column_length", SCHEMA_LESS)
    }

    /// Always fails: there are no column types.
    pub fn create_full_type(&self, _column: &ColumnSpec) -> Result<String, DriverError> {
        unsupported("create_full_type", SCHEMA_LESS)
    }

    /// Always fails: there are no columns to diff.
    pub fn find_changed_columns(
        &self,
        _table_columns: &[ColumnSpec],
        _declared_columns: &[ColumnSpec],
    ) -> Result<Vec<ColumnSpec>, DriverError> {
        unsupported("find_changed_columns", SCHEMA_LESS)
    }

    /// Returns the column name unchanged.
    #[must_use]
    pub fn escape<'a>(&self, column_name: &'a str) -> &'a str {
        column_name
    }

    /// Returns the table name unchanged; schema and database are ignored.
    #[must_use]
    pub fn build_table_name<'a>(
        &self,
        table_name: &'a str,
        _schema: Option<&str>,
        _database: Option<&str>,
    ) -> &'a str {
        table_name
    }

    /// Returns an empty placeholder: the driver has no bind parameters.
    #[must_use]
    pub fn create_parameter(&self, _parameter_name: &str, _index: usize) -> String {
        String::new()
    }
}
