use fileindex_core::storage::{
    CountCache, Database, LookupColumn, LookupValue, QueryRequest, ReportView,
};
use fileindex_core::{FileMetadata, FileRecord};
use tempfile::tempdir;

fn meta(path: &str, name: &str, volume: &str, size: i64, sha256: &str, modified: i64) -> FileMetadata {
    FileMetadata {
        path: path.to_string(),
        name: name.to_string(),
        volume: volume.to_string(),
        size,
        sha256: sha256.to_string(),
        modified,
    }
}

fn seeded(records: &[FileMetadata]) -> Database {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_metadata(records, 0, |_| {}).unwrap();
    db
}

/// A, B share h1; C holds h2.
fn abc() -> Database {
    seeded(&[
        meta("/docs", "A", "vol1", 10, "h1", 100),
        meta("/docs", "B", "vol1", 10, "h1", 200),
        meta("", "C", "vol2", 30, "h2", 300),
    ])
}

/// Twelve records: four hashes held twice each, four held once.
fn mixed() -> Database {
    let mut records = Vec::new();
    for i in 0..12_i64 {
        let hash = if i < 8 {
            format!("h{}", i % 4)
        } else {
            format!("u{}", i)
        };
        let ext = if i % 2 == 0 { "jpg" } else { "txt" };
        let volume = if i < 6 { "main" } else { "backup" };
        records.push(meta(
            &format!("/dir{}", i % 3),
            &format!("file{:02}.{}", i, ext),
            volume,
            (i % 4) * 1000 + 1,
            &hash,
            1_600_000_000 + i * 7 % 5,
        ));
    }
    seeded(&records)
}

fn req(start: i64, limit: i64, column: i64, dir: &str, search: &str) -> QueryRequest {
    QueryRequest::new(start, limit, column, dir, search).unwrap()
}

#[test]
fn test_duplicate_and_unique_scenario() {
    let db = abc();
    let request = QueryRequest::first(10).unwrap();

    let dups = db.duplicates_sha256(&request).unwrap();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].count, 2);
    assert_eq!(dups[0].sha256, "h1");

    let unique = db.unique_sha256(&request).unwrap();
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].name, "C");
    assert_eq!(unique[0].sha256, "h2");

    let cache = CountCache::new();
    assert_eq!(cache.total_count(&db, ReportView::Everything).unwrap(), 3);
}

#[test]
fn test_everything_decodes_all_columns() {
    let db = abc();
    let rows = db.everything(&QueryRequest::first(10).unwrap()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[2],
        FileRecord {
            id: 3,
            path: String::new(),
            name: "C".into(),
            volume: "vol2".into(),
            size: 30,
            sha256: "h2".into(),
            modified: 300,
        }
    );
}

#[test]
fn test_page_length_bounded_by_limit() {
    let db = mixed();
    for limit in [1, 3, 5, 50] {
        for start in [0, 4, 11, 20] {
            let r = req(start, limit, 1, "asc", "");
            assert!(db.everything(&r).unwrap().len() <= limit as usize);
            assert!(db.unique_sha256(&r).unwrap().len() <= limit as usize);
            assert!(db.duplicates_sha256(&req(start, limit, 2, "asc", "")).unwrap().len() <= limit as usize);
        }
    }
    assert_eq!(db.everything(&req(10, 5, 1, "asc", "")).unwrap().len(), 2);
    assert!(db.everything(&req(20, 5, 1, "asc", "")).unwrap().is_empty());
}

#[test]
fn test_filtered_equals_total_without_search() {
    let db = mixed();
    for view in ReportView::ALL {
        let r = req(0, 5, 1, "asc", "");
        assert_eq!(
            db.report_filtered_count(view, &r).unwrap(),
            db.report_total_count(view).unwrap(),
            "view {}",
            view.name()
        );
    }
}

#[test]
fn test_search_filters_on_name() {
    let db = mixed();
    let r = req(0, 100, 1, "asc", "jpg");
    let rows = db.everything(&r).unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|row| row.name.contains("jpg")));
    assert_eq!(db.report_filtered_count(ReportView::Everything, &r).unwrap(), 6);
    assert_eq!(db.report_total_count(ReportView::Everything).unwrap(), 12);
}

#[test]
fn test_search_wildcards_are_literal() {
    let db = seeded(&[
        meta("", "50%_off.txt", "v", 1, "a", 0),
        meta("", "5000off.txt", "v", 1, "b", 0),
    ]);
    let rows = db.everything(&req(0, 10, 1, "asc", "0%_")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "50%_off.txt");
}

#[test]
fn test_grouped_views_search_restricts_before_grouping() {
    // h1 is duplicated overall but only one member matches "A".
    let db = abc();
    let r = req(0, 10, 1, "asc", "A");
    assert!(db.duplicates_sha256(&r).unwrap().is_empty());
    let unique = db.unique_sha256(&r).unwrap();
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].name, "A");
    assert_eq!(db.report_filtered_count(ReportView::UniqueSha256, &r).unwrap(), 1);
    assert_eq!(db.report_filtered_count(ReportView::DuplicatesSha256, &r).unwrap(), 0);
}

#[test]
fn test_count_cache_is_stale_until_refresh() {
    let db = abc();
    let cache = CountCache::new();
    assert_eq!(cache.cached(ReportView::Everything), None);

    assert_eq!(cache.total_count(&db, ReportView::Everything).unwrap(), 3);
    assert_eq!(cache.total_count(&db, ReportView::DuplicatesSha256).unwrap(), 1);

    db.insert_file_metadata(&[meta("", "D", "vol1", 1, "h3", 1), meta("", "E", "vol1", 1, "h3", 1)], 0, |_| {})
        .unwrap();

    assert_eq!(cache.total_count(&db, ReportView::Everything).unwrap(), 3);
    assert_eq!(cache.total_count(&db, ReportView::DuplicatesSha256).unwrap(), 1);
    assert_eq!(db.report_total_count(ReportView::Everything).unwrap(), 5);

    assert_eq!(cache.refresh(&db, ReportView::Everything).unwrap(), 5);
    assert_eq!(cache.total_count(&db, ReportView::Everything).unwrap(), 5);
    // Refreshing one view leaves the others untouched.
    assert_eq!(cache.cached(ReportView::DuplicatesSha256), Some(1));
}

#[test]
fn test_unique_and_duplicate_partition_hashes() {
    let db = mixed();
    let cache = CountCache::new();
    let distinct: i64 = db
        .connection()
        .query_row("SELECT COUNT(DISTINCT sha256) FROM fileindex", [], |row| row.get(0))
        .unwrap();
    let unique = cache.total_count(&db, ReportView::UniqueSha256).unwrap();
    let dups = cache.total_count(&db, ReportView::DuplicatesSha256).unwrap();
    assert_eq!((unique, dups), (4, 4));
    assert_eq!(unique + dups, distinct);

    let all = QueryRequest::first(100).unwrap();
    let unique_hashes: Vec<String> = db.unique_sha256(&all).unwrap().into_iter().map(|r| r.sha256).collect();
    let dup_hashes: Vec<String> = db
        .duplicates_sha256(&req(0, 100, 2, "asc", ""))
        .unwrap()
        .into_iter()
        .map(|d| d.sha256)
        .collect();
    for record in db.everything(&all).unwrap() {
        let in_unique = unique_hashes.contains(&record.sha256);
        let in_dups = dup_hashes.contains(&record.sha256);
        assert!(in_unique != in_dups, "hash {} in both or neither", record.sha256);
    }
}

#[test]
fn test_desc_order_is_non_increasing() {
    let db = mixed();
    // size is column 6, name is column 4
    let rows = db.everything(&req(0, 100, 6, "desc", "")).unwrap();
    assert!(rows.windows(2).all(|w| w[0].size >= w[1].size));
    let rows = db.everything(&req(0, 100, 4, "desc", "")).unwrap();
    assert!(rows.windows(2).all(|w| w[0].name >= w[1].name));

    let dups = db.duplicates_sha256(&req(0, 100, 2, "desc", "")).unwrap();
    assert!(dups.windows(2).all(|w| w[0].sha256 >= w[1].sha256));
}

#[test]
fn test_unknown_direction_behaves_as_asc() {
    let db = mixed();
    let asc: Vec<i64> = db.everything(&req(0, 100, 1, "asc", "")).unwrap().iter().map(|r| r.id).collect();
    let other: Vec<i64> = db.everything(&req(0, 100, 1, "sideways", "")).unwrap().iter().map(|r| r.id).collect();
    assert_eq!(asc, other);
    assert!(asc.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_lookup_exact_match_every_column() {
    let db = mixed();
    let all = db.everything(&QueryRequest::first(100).unwrap()).unwrap();
    let sample = &all[4];
    let request = QueryRequest::first(100).unwrap();

    for column in LookupColumn::ALL {
        let value = match column {
            LookupColumn::Id => LookupValue::Integer(sample.id),
            LookupColumn::Modified => LookupValue::Integer(sample.modified),
            LookupColumn::Size => LookupValue::Integer(sample.size),
            LookupColumn::Name => LookupValue::Text(sample.name.clone()),
            LookupColumn::Path => LookupValue::Text(sample.path.clone()),
            LookupColumn::Sha256 => LookupValue::Text(sample.sha256.clone()),
            LookupColumn::Volume => LookupValue::Text(sample.volume.clone()),
        };
        let rows = db.lookup(column, &value, &request).unwrap();
        assert!(!rows.is_empty(), "no rows for {}", column);
        let expected = all.iter().filter(|r| field(r, column) == value).count() as i64;
        assert_eq!(rows.len() as i64, expected, "column {}", column);
        assert!(rows.iter().all(|r| field(r, column) == value));
        assert_eq!(db.lookup_count(column, &value).unwrap(), expected);
    }
}

fn field(record: &FileRecord, column: LookupColumn) -> LookupValue {
    match column {
        LookupColumn::Id => LookupValue::Integer(record.id),
        LookupColumn::Modified => LookupValue::Integer(record.modified),
        LookupColumn::Size => LookupValue::Integer(record.size),
        LookupColumn::Name => LookupValue::Text(record.name.clone()),
        LookupColumn::Path => LookupValue::Text(record.path.clone()),
        LookupColumn::Sha256 => LookupValue::Text(record.sha256.clone()),
        LookupColumn::Volume => LookupValue::Text(record.volume.clone()),
    }
}

#[test]
fn test_lookup_by_name_count() {
    let db = abc();
    let value = LookupColumn::Name.parse_value("C").unwrap();
    assert_eq!(db.lookup_count(LookupColumn::Name, &value).unwrap(), 1);
    // Exact equality, not substring.
    let partial = LookupColumn::Name.parse_value("file").unwrap();
    assert_eq!(db.lookup_count(LookupColumn::Name, &partial).unwrap(), 0);
}

#[test]
fn test_lookup_search_narrows_rows_not_count() {
    let db = mixed();
    let value = LookupValue::Text("main".into());
    let rows = db.lookup(LookupColumn::Volume, &value, &req(0, 100, 1, "asc", "jpg")).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.volume == "main" && r.name.contains("jpg")));
    assert_eq!(db.lookup_count(LookupColumn::Volume, &value).unwrap(), 6);
    assert_eq!(
        db.lookup_filtered_count(LookupColumn::Volume, &value, &req(0, 100, 1, "asc", "jpg"))
            .unwrap(),
        3
    );
}

#[test]
fn test_lookup_value_type_mismatch() {
    let db = abc();
    let err = db
        .lookup(LookupColumn::Size, &LookupValue::Text("10".into()), &QueryRequest::first(5).unwrap())
        .unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_order_column_out_of_range_is_request_error() {
    for column in [0, 8] {
        let err = QueryRequest::new(0, 10, column, "asc", "").unwrap_err();
        assert!(err.is_invalid_request());
    }
    // Aggregate rows have two columns.
    let db = abc();
    let err = db.duplicates_sha256(&req(0, 10, 3, "asc", "")).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_missing_database_file_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.db");
    assert!(Database::open_existing(&missing).is_err());
    assert!(!missing.exists());
}

#[test]
fn test_missing_table_is_storage_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE other (x INTEGER);")
        .unwrap();

    let db = Database::open_existing(&path).unwrap();
    let err = db.everything(&QueryRequest::first(5).unwrap()).unwrap_err();
    assert!(matches!(err, fileindex_core::Error::Database(_)));
}

#[test]
fn test_decode_failure_is_storage_failure() {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO fileindex (path, name, volume, sha256, size, modified) \
             VALUES ('', 'x', 'v', 'h', 'not a number', 0)",
            [],
        )
        .unwrap();
    let err = db.everything(&QueryRequest::first(5).unwrap()).unwrap_err();
    assert!(matches!(err, fileindex_core::Error::Database(_)));
}
