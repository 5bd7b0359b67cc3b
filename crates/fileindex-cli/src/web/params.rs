use fileindex_core::{Error, QueryRequest};
use serde::{Deserialize, Serialize};

const DEFAULT_LENGTH: i64 = 10;

/// Query-string parameters sent by a DataTables server-side table. Numeric
/// fields arrive as text so a bad value becomes a JSON 400, not an
/// extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DataTableParams {
    pub draw: Option<String>,
    pub start: Option<String>,
    pub length: Option<String>,
    #[serde(rename = "order[0][column]")]
    pub order_column: Option<String>,
    #[serde(rename = "order[0][dir]")]
    pub order_dir: Option<String>,
    #[serde(rename = "search[value]")]
    pub search: Option<String>,
}

impl DataTableParams {
    /// Echoed back unchanged so the table can match responses to requests.
    pub fn draw(&self) -> Result<i64, Error> {
        parse_int("draw", self.draw.as_deref(), 0)
    }
}

impl TryFrom<&DataTableParams> for QueryRequest {
    type Error = Error;

    fn try_from(params: &DataTableParams) -> Result<Self, Self::Error> {
        let start = parse_int("start", params.start.as_deref(), 0)?;
        let length = parse_int("length", params.length.as_deref(), DEFAULT_LENGTH)?;
        // DataTables columns are 0-based.
        let column = parse_int("order[0][column]", params.order_column.as_deref(), 0)?;
        QueryRequest::new(
            start,
            length,
            column.saturating_add(1),
            params.order_dir.as_deref().unwrap_or("asc"),
            params.search.clone().unwrap_or_default(),
        )
    }
}

fn parse_int(field: &str, raw: Option<&str>, default: i64) -> Result<i64, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("{} must be an integer, got {:?}", field, value))),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTablesResponse<T> {
    pub draw: i64,
    pub data: Vec<T>,
    pub records_filtered: i64,
    pub records_total: i64,
}
