use serde::{Deserialize, Serialize};

/// One scanned file as written by the scanner and read by the loader.
/// This is the shape of each JSON line; it has no storage identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub path: String,
    pub name: String,
    pub volume: String,
    pub size: i64,
    pub sha256: String,
    pub modified: i64,
}

/// A row of the `fileindex` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub path: String,
    pub name: String,
    pub volume: String,
    pub size: i64,
    pub sha256: String,
    pub modified: i64,
}

/// A content hash shared by two or more records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSha256 {
    pub count: i64,
    pub sha256: String,
}
