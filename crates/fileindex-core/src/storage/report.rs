use super::query::{HashGroup, QueryBuilder, QueryRequest};
use super::sqlite::Database;
use crate::error::Result;
use crate::model::{DuplicateSha256, FileRecord};

/// The three table-wide report views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportView {
    Everything,
    UniqueSha256,
    DuplicatesSha256,
}

impl ReportView {
    pub const ALL: [ReportView; 3] = [
        ReportView::Everything,
        ReportView::UniqueSha256,
        ReportView::DuplicatesSha256,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportView::Everything => "everything",
            ReportView::UniqueSha256 => "unique/sha256",
            ReportView::DuplicatesSha256 => "duplicates/sha256",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ReportView::Everything => 0,
            ReportView::UniqueSha256 => 1,
            ReportView::DuplicatesSha256 => 2,
        }
    }

    fn builder(self) -> QueryBuilder {
        match self {
            ReportView::Everything => QueryBuilder::files(),
            ReportView::UniqueSha256 => QueryBuilder::files().grouped(HashGroup::Unique),
            // Each row is a hash aggregate, not a file.
            ReportView::DuplicatesSha256 => {
                QueryBuilder::new("COUNT(*) AS count, sha256", 2).grouped(HashGroup::Duplicates)
            }
        }
    }
}

impl Database {
    pub fn everything(&self, request: &QueryRequest) -> Result<Vec<FileRecord>> {
        let query = ReportView::Everything.builder().page_query(request)?;
        Ok(self.query_file_records(&query)?)
    }

    /// Records whose hash no other record shares. With a search term the
    /// grouping runs over the name-matched rows only.
    pub fn unique_sha256(&self, request: &QueryRequest) -> Result<Vec<FileRecord>> {
        let query = ReportView::UniqueSha256.builder().page_query(request)?;
        Ok(self.query_file_records(&query)?)
    }

    /// `(count, sha256)` for every hash held by two or more records. With a
    /// search term the grouping runs over the name-matched rows only.
    pub fn duplicates_sha256(&self, request: &QueryRequest) -> Result<Vec<DuplicateSha256>> {
        let query = ReportView::DuplicatesSha256.builder().page_query(request)?;
        Ok(self.query_duplicates(&query)?)
    }

    /// Rows matching the same filter as the paged query, ignoring paging.
    pub fn report_filtered_count(&self, view: ReportView, request: &QueryRequest) -> Result<i64> {
        let query = view.builder().count_query(&request.search);
        Ok(self.query_count(&query)?)
    }

    /// Unfiltered row count for `view`, always read from storage. See
    /// [`CountCache`](super::CountCache) for the cached grand total.
    pub fn report_total_count(&self, view: ReportView) -> Result<i64> {
        let query = view.builder().count_query("");
        Ok(self.query_count(&query)?)
    }
}
