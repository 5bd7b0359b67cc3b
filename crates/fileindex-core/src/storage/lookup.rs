use std::fmt;

use rusqlite::types::Value;

use super::query::{QueryBuilder, QueryRequest};
use super::sqlite::Database;
use crate::error::{Error, Result};
use crate::model::FileRecord;

/// A column that supports exact-match lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupColumn {
    Id,
    Modified,
    Name,
    Path,
    Sha256,
    Size,
    Volume,
}

impl LookupColumn {
    pub const ALL: [LookupColumn; 7] = [
        LookupColumn::Id,
        LookupColumn::Modified,
        LookupColumn::Name,
        LookupColumn::Path,
        LookupColumn::Sha256,
        LookupColumn::Size,
        LookupColumn::Volume,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            LookupColumn::Id => "id",
            LookupColumn::Modified => "modified",
            LookupColumn::Name => "name",
            LookupColumn::Path => "path",
            LookupColumn::Sha256 => "sha256",
            LookupColumn::Size => "size",
            LookupColumn::Volume => "volume",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.column_name() == name)
    }

    fn clause(self) -> &'static str {
        match self {
            LookupColumn::Id => "id = ?",
            LookupColumn::Modified => "modified = ?",
            LookupColumn::Name => "name = ?",
            LookupColumn::Path => "path = ?",
            LookupColumn::Sha256 => "sha256 = ?",
            LookupColumn::Size => "size = ?",
            LookupColumn::Volume => "volume = ?",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            LookupColumn::Id | LookupColumn::Modified | LookupColumn::Size
        )
    }

    /// Parse a raw request value into the column's storage type.
    pub fn parse_value(self, raw: &str) -> Result<LookupValue> {
        if self.is_integer() {
            raw.trim().parse::<i64>().map(LookupValue::Integer).map_err(|_| {
                Error::InvalidRequest(format!(
                    "{} lookup expects an integer, got {:?}",
                    self.column_name(),
                    raw
                ))
            })
        } else {
            Ok(LookupValue::Text(raw.to_string()))
        }
    }
}

impl fmt::Display for LookupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupValue {
    Integer(i64),
    Text(String),
}

impl From<LookupValue> for Value {
    fn from(value: LookupValue) -> Self {
        match value {
            LookupValue::Integer(i) => Value::Integer(i),
            LookupValue::Text(s) => Value::Text(s),
        }
    }
}

impl From<i64> for LookupValue {
    fn from(value: i64) -> Self {
        LookupValue::Integer(value)
    }
}

impl From<&str> for LookupValue {
    fn from(value: &str) -> Self {
        LookupValue::Text(value.to_string())
    }
}

impl Database {
    /// Records where `column` equals `value` exactly, with the request's
    /// name search ANDed on.
    pub fn lookup(
        &self,
        column: LookupColumn,
        value: &LookupValue,
        request: &QueryRequest,
    ) -> Result<Vec<FileRecord>> {
        check_type(column, value)?;
        let query = QueryBuilder::files()
            .with_predicate(column.clause(), value.clone())
            .page_query(request)?;
        Ok(self.query_file_records(&query)?)
    }

    /// Number of records where `column` equals `value`. Search terms do not
    /// apply to this count.
    pub fn lookup_count(&self, column: LookupColumn, value: &LookupValue) -> Result<i64> {
        check_type(column, value)?;
        let query = QueryBuilder::files()
            .with_predicate(column.clause(), value.clone())
            .count_query("");
        Ok(self.query_count(&query)?)
    }

    /// Same predicate and search as [`Database::lookup`], without paging.
    pub fn lookup_filtered_count(
        &self,
        column: LookupColumn,
        value: &LookupValue,
        request: &QueryRequest,
    ) -> Result<i64> {
        check_type(column, value)?;
        let query = QueryBuilder::files()
            .with_predicate(column.clause(), value.clone())
            .count_query(&request.search);
        Ok(self.query_count(&query)?)
    }
}

fn check_type(column: LookupColumn, value: &LookupValue) -> Result<()> {
    match (column.is_integer(), value) {
        (true, LookupValue::Integer(_)) | (false, LookupValue::Text(_)) => Ok(()),
        _ => Err(Error::InvalidRequest(format!(
            "value type does not match column {}",
            column
        ))),
    }
}
