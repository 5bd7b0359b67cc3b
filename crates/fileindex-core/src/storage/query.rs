use rusqlite::types::Value;

use crate::error::{Error, Result};

pub const TABLE: &str = "fileindex";

/// Projection order for every file-row query. Row decoding is positional.
pub const FILE_COLUMNS: [&str; 7] = ["id", "volume", "path", "name", "modified", "size", "sha256"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the literal `desc` sorts descending.
    pub fn parse(token: &str) -> Self {
        if token == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Pagination, ordering and search for one paged call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub start: i64,
    pub limit: i64,
    /// 1-based ordinal into the query's projection.
    pub order_column: usize,
    pub order_direction: SortDirection,
    /// Substring filter on `name`. Empty means no filter.
    pub search: String,
}

impl QueryRequest {
    pub fn new(
        start: i64,
        limit: i64,
        order_column: i64,
        order_direction: &str,
        search: impl Into<String>,
    ) -> Result<Self> {
        if start < 0 {
            return Err(Error::InvalidRequest(format!(
                "start must be >= 0, got {}",
                start
            )));
        }
        if limit <= 0 {
            return Err(Error::InvalidRequest(format!(
                "limit must be > 0, got {}",
                limit
            )));
        }
        if !(1..=FILE_COLUMNS.len() as i64).contains(&order_column) {
            return Err(Error::InvalidRequest(format!(
                "order column must be in 1..={}, got {}",
                FILE_COLUMNS.len(),
                order_column
            )));
        }

        Ok(Self {
            start,
            limit,
            order_column: order_column as usize,
            order_direction: SortDirection::parse(order_direction),
            search: search.into(),
        })
    }

    /// First `limit` rows ordered by `id` ascending, no search.
    pub fn first(limit: i64) -> Result<Self> {
        Self::new(0, limit, 1, "asc", "")
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Grouping applied by the hash-partition report views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashGroup {
    /// Hashes held by exactly one record.
    Unique,
    /// Hashes held by two or more records.
    Duplicates,
}

impl HashGroup {
    fn having(self) -> &'static str {
        match self {
            HashGroup::Unique => "HAVING COUNT(*) = 1",
            HashGroup::Duplicates => "HAVING COUNT(*) > 1",
        }
    }
}

/// SQL text plus the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone)]
struct Predicate {
    clause: &'static str,
    value: Value,
}

/// Assembles the paged query and the matching count query for one base
/// selection. The caller supplies the filter as an opaque clause with a
/// single placeholder; the search term is always ANDed on as a `name`
/// substring match.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    projection: &'static str,
    width: usize,
    predicate: Option<Predicate>,
    group: Option<HashGroup>,
}

impl QueryBuilder {
    pub fn new(projection: &'static str, width: usize) -> Self {
        Self {
            projection,
            width,
            predicate: None,
            group: None,
        }
    }

    /// All seven file columns in the fixed order.
    pub fn files() -> Self {
        Self::new("id, volume, path, name, modified, size, sha256", FILE_COLUMNS.len())
    }

    /// `clause` must contain exactly one `?`, e.g. `"sha256 = ?"`.
    pub fn with_predicate(mut self, clause: &'static str, value: impl Into<Value>) -> Self {
        self.predicate = Some(Predicate {
            clause,
            value: value.into(),
        });
        self
    }

    pub fn grouped(mut self, group: HashGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn page_query(&self, request: &QueryRequest) -> Result<BuiltQuery> {
        if request.order_column == 0 || request.order_column > self.width {
            return Err(Error::InvalidRequest(format!(
                "order column must be in 1..={} for this view, got {}",
                self.width, request.order_column
            )));
        }

        let mut params = Vec::new();
        let mut sql = format!("SELECT {} FROM {}", self.projection, TABLE);
        sql.push_str(&self.where_clause(&request.search, &mut params));
        if let Some(group) = self.group {
            sql.push_str(" GROUP BY sha256 ");
            sql.push_str(group.having());
        }
        sql.push_str(&format!(
            " ORDER BY {} {} LIMIT ? OFFSET ?",
            request.order_column,
            request.order_direction.as_sql()
        ));
        params.push(Value::Integer(request.limit));
        params.push(Value::Integer(request.start));

        Ok(BuiltQuery { sql, params })
    }

    /// Count of rows the paged query would return without LIMIT/OFFSET.
    /// Pass an empty `search` for an unfiltered count.
    pub fn count_query(&self, search: &str) -> BuiltQuery {
        let mut params = Vec::new();
        let where_clause = self.where_clause(search, &mut params);
        let sql = match self.group {
            Some(group) => format!(
                "SELECT COUNT(*) FROM (SELECT sha256 FROM {}{} GROUP BY sha256 {})",
                TABLE,
                where_clause,
                group.having()
            ),
            None => format!("SELECT COUNT(*) FROM {}{}", TABLE, where_clause),
        };
        BuiltQuery { sql, params }
    }

    fn where_clause(&self, search: &str, params: &mut Vec<Value>) -> String {
        let mut conditions: Vec<&str> = Vec::new();
        if let Some(predicate) = &self.predicate {
            conditions.push(predicate.clause);
            params.push(predicate.value.clone());
        }
        if !search.is_empty() {
            conditions.push("name LIKE ? ESCAPE '\\'");
            params.push(Value::Text(format!("%{}%", escape_like(search))));
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }
}

/// Escape LIKE wildcards so the term matches as a literal substring.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
