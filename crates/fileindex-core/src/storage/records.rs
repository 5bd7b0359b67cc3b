use rusqlite::{params, params_from_iter, Result, Row};
use tracing::debug;

use super::query::BuiltQuery;
use super::sqlite::Database;
use crate::model::{DuplicateSha256, FileMetadata, FileRecord};

/// Decode a row projected as `(id, volume, path, name, modified, size, sha256)`.
pub(crate) fn file_record_from_row(row: &Row) -> Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        volume: row.get(1)?,
        path: row.get(2)?,
        name: row.get(3)?,
        modified: row.get(4)?,
        size: row.get(5)?,
        sha256: row.get(6)?,
    })
}

pub(crate) fn duplicate_from_row(row: &Row) -> Result<DuplicateSha256> {
    Ok(DuplicateSha256 {
        count: row.get(0)?,
        sha256: row.get(1)?,
    })
}

impl Database {
    /// Insert records inside a single transaction. `on_progress` receives the
    /// running row count every `progress_every` rows and once at the end.
    pub fn insert_file_metadata<F>(
        &self,
        records: &[FileMetadata],
        progress_every: usize,
        mut on_progress: F,
    ) -> Result<usize>
    where
        F: FnMut(usize),
    {
        let tx = self.connection().unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO fileindex (path, name, volume, size, sha256, modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                count += stmt.execute(params![
                    record.path,
                    record.name,
                    record.volume,
                    record.size,
                    record.sha256,
                    record.modified,
                ])?;
                if progress_every > 0 && count % progress_every == 0 {
                    on_progress(count);
                }
            }
        }
        tx.commit()?;
        on_progress(count);
        debug!("Inserted {} file records", count);
        Ok(count)
    }

    pub(crate) fn query_file_records(&self, query: &BuiltQuery) -> Result<Vec<FileRecord>> {
        let mut stmt = self.connection().prepare(&query.sql)?;
        let records = stmt
            .query_map(params_from_iter(query.params.iter()), file_record_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    pub(crate) fn query_duplicates(&self, query: &BuiltQuery) -> Result<Vec<DuplicateSha256>> {
        let mut stmt = self.connection().prepare(&query.sql)?;
        let rows = stmt
            .query_map(params_from_iter(query.params.iter()), duplicate_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub(crate) fn query_count(&self, query: &BuiltQuery) -> Result<i64> {
        self.connection()
            .query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                row.get(0)
            })
    }
}
