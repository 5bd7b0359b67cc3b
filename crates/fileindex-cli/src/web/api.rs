use axum::{
    extract::{Path, Query, State},
    Json,
};
use fileindex_core::{
    Database, DuplicateSha256, FileRecord, LookupColumn, QueryRequest, ReportView,
};
use serde::Serialize;

use super::error::ApiError;
use super::params::{DataTableParams, DataTablesResponse};
use super::server::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

pub async fn index() -> &'static str {
    "index"
}

/// Recomputes the everything total and stores it in the count cache.
pub async fn count(State(state): State<AppState>) -> ApiResult<CountResponse> {
    let count = state
        .with_db(|db, counts| counts.refresh(db, ReportView::Everything))
        .await?;
    Ok(Json(CountResponse { count }))
}

pub async fn everything(
    State(state): State<AppState>,
    Query(params): Query<DataTableParams>,
) -> ApiResult<DataTablesResponse<FileRecord>> {
    report(state, &params, ReportView::Everything, Database::everything).await
}

pub async fn unique_sha256(
    State(state): State<AppState>,
    Query(params): Query<DataTableParams>,
) -> ApiResult<DataTablesResponse<FileRecord>> {
    report(state, &params, ReportView::UniqueSha256, Database::unique_sha256).await
}

pub async fn duplicates_sha256(
    State(state): State<AppState>,
    Query(params): Query<DataTableParams>,
) -> ApiResult<DataTablesResponse<DuplicateSha256>> {
    report(state, &params, ReportView::DuplicatesSha256, Database::duplicates_sha256).await
}

/// `recordsTotal` comes from the count cache; `recordsFiltered` is computed
/// per request.
async fn report<T>(
    state: AppState,
    params: &DataTableParams,
    view: ReportView,
    page: fn(&Database, &QueryRequest) -> fileindex_core::Result<Vec<T>>,
) -> ApiResult<DataTablesResponse<T>>
where
    T: Send + 'static,
{
    let draw = params.draw()?;
    let request = QueryRequest::try_from(params)?;
    let response = state
        .with_db(move |db, counts| {
            let data = page(db, &request)?;
            let records_filtered = db.report_filtered_count(view, &request)?;
            let records_total = counts.total_count(db, view)?;
            Ok(DataTablesResponse {
                draw,
                data,
                records_filtered,
                records_total,
            })
        })
        .await?;
    Ok(Json(response))
}

/// Exact match on one column. The match count fills both `recordsFiltered`
/// and `recordsTotal`.
pub async fn lookup(
    State(state): State<AppState>,
    Path((column, value)): Path<(String, String)>,
    Query(params): Query<DataTableParams>,
) -> ApiResult<DataTablesResponse<FileRecord>> {
    let column = LookupColumn::from_name(&column)
        .ok_or_else(|| ApiError::not_found(format!("unknown column {}", column)))?;
    lookup_rows(state, column, &value, &params).await
}

/// Files directly under the scan root have an empty `path`, which a
/// `{value}` segment cannot match.
pub async fn lookup_root_path(
    State(state): State<AppState>,
    Query(params): Query<DataTableParams>,
) -> ApiResult<DataTablesResponse<FileRecord>> {
    lookup_rows(state, LookupColumn::Path, "", &params).await
}

async fn lookup_rows(
    state: AppState,
    column: LookupColumn,
    raw_value: &str,
    params: &DataTableParams,
) -> ApiResult<DataTablesResponse<FileRecord>> {
    let value = column.parse_value(raw_value)?;
    let draw = params.draw()?;
    let request = QueryRequest::try_from(params)?;

    let response = state
        .with_db(move |db, _| {
            let data = db.lookup(column, &value, &request)?;
            let count = db.lookup_count(column, &value)?;
            Ok(DataTablesResponse {
                draw,
                data,
                records_filtered: count,
                records_total: count,
            })
        })
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use fileindex_core::FileMetadata;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn meta(path: &str, name: &str, size: i64, sha256: &str) -> FileMetadata {
        FileMetadata {
            path: path.to_string(),
            name: name.to_string(),
            volume: "vol1".to_string(),
            size,
            sha256: sha256.to_string(),
            modified: 1_700_000_000,
        }
    }

    fn seeded_state() -> (TempDir, PathBuf, AppState) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");
        let db = Database::open(&path).unwrap();
        db.insert_file_metadata(
            &[
                meta("/docs", "a.txt", 10, "h1"),
                meta("/docs", "b.txt", 10, "h1"),
                meta("", "c.jpg", 30, "h2"),
            ],
            0,
            |_| {},
        )
        .unwrap();
        drop(db);
        let state = AppState::new(path.clone());
        (dir, path, state)
    }

    fn table_params(pairs: &[(&str, &str)]) -> Query<DataTableParams> {
        let mut params = DataTableParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "draw" => params.draw = value,
                "start" => params.start = value,
                "length" => params.length = value,
                "column" => params.order_column = value,
                "dir" => params.order_dir = value,
                "search" => params.search = value,
                other => panic!("unknown key {}", other),
            }
        }
        Query(params)
    }

    #[tokio::test]
    async fn test_everything_response_shape() {
        let (_dir, _path, state) = seeded_state();
        let Json(resp) = everything(State(state), table_params(&[("draw", "7"), ("search", "txt")]))
            .await
            .unwrap();
        assert_eq!(resp.draw, 7);
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.records_filtered, 2);
        assert_eq!(resp.records_total, 3);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("recordsFiltered").is_some());
        assert!(json.get("recordsTotal").is_some());
        assert_eq!(json["data"][0]["sha256"], "h1");
    }

    #[tokio::test]
    async fn test_duplicates_and_unique() {
        let (_dir, _path, state) = seeded_state();
        let Json(dups) = duplicates_sha256(State(state.clone()), table_params(&[]))
            .await
            .unwrap();
        assert_eq!(dups.data, vec![DuplicateSha256 { count: 2, sha256: "h1".into() }]);
        assert_eq!(dups.records_total, 1);

        let Json(unique) = unique_sha256(State(state), table_params(&[])).await.unwrap();
        assert_eq!(unique.data.len(), 1);
        assert_eq!(unique.data[0].name, "c.jpg");
    }

    #[tokio::test]
    async fn test_total_is_cached_until_count_refresh() {
        let (_dir, path, state) = seeded_state();
        let Json(before) = everything(State(state.clone()), table_params(&[])).await.unwrap();
        assert_eq!(before.records_total, 3);

        Database::open(&path)
            .unwrap()
            .insert_file_metadata(&[meta("", "d.txt", 1, "h3")], 0, |_| {})
            .unwrap();

        let Json(stale) = everything(State(state.clone()), table_params(&[])).await.unwrap();
        assert_eq!(stale.records_total, 3);
        assert_eq!(stale.records_filtered, 4);

        let Json(count_resp) = count(State(state.clone())).await.unwrap();
        assert_eq!(count_resp.count, 4);
        let Json(fresh) = everything(State(state), table_params(&[])).await.unwrap();
        assert_eq!(fresh.records_total, 4);
    }

    #[tokio::test]
    async fn test_lookup_counts_ignore_search() {
        let (_dir, _path, state) = seeded_state();
        let Json(resp) = lookup(
            State(state),
            Path(("sha256".to_string(), "h1".to_string())),
            table_params(&[("search", "a.")]),
        )
        .await
        .unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].name, "a.txt");
        assert_eq!(resp.records_filtered, 2);
        assert_eq!(resp.records_total, 2);
    }

    #[tokio::test]
    async fn test_lookup_by_integer_column() {
        let (_dir, _path, state) = seeded_state();
        let Json(resp) = lookup(
            State(state.clone()),
            Path(("size".to_string(), "10".to_string())),
            table_params(&[("column", "3"), ("dir", "desc")]),
        )
        .await
        .unwrap();
        let names: Vec<&str> = resp.data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);

        let err = lookup(
            State(state),
            Path(("size".to_string(), "ten".to_string())),
            table_params(&[]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_root_path_lookup() {
        let (_dir, _path, state) = seeded_state();
        let Json(resp) = lookup_root_path(State(state), table_params(&[])).await.unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].name, "c.jpg");
        assert_eq!(resp.data[0].path, "");
        assert_eq!(resp.records_total, 1);
    }

    #[tokio::test]
    async fn test_bad_order_column_is_client_error() {
        let (_dir, _path, state) = seeded_state();
        let err = everything(State(state.clone()), table_params(&[("column", "7")]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        // Aggregate rows only have two columns.
        let err = duplicates_sha256(State(state), table_params(&[("column", "2")]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_database_is_server_error() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().join("absent.db"));
        let err = everything(State(state), table_params(&[])).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!dir.path().join("absent.db").exists());
    }
}
