use std::sync::{PoisonError, RwLock};

use super::report::ReportView;
use super::sqlite::Database;
use crate::error::Result;

/// Grand total per report view.
///
/// Each entry is computed on first request and then kept for as long as the
/// cache lives, which for the HTTP service is the whole process. Loads done
/// while the service runs are not seen until [`CountCache::refresh`] is
/// called. Two requests populating the same entry at once both run the
/// count query; they store the same value.
#[derive(Debug, Default)]
pub struct CountCache {
    totals: RwLock<[Option<i64>; 3]>,
}

impl CountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, view: ReportView) -> Option<i64> {
        let totals = self.totals.read().unwrap_or_else(PoisonError::into_inner);
        totals[view.index()]
    }

    pub fn total_count(&self, db: &Database, view: ReportView) -> Result<i64> {
        if let Some(total) = self.cached(view) {
            return Ok(total);
        }
        self.refresh(db, view)
    }

    /// Recompute the total for `view` from storage and store it.
    pub fn refresh(&self, db: &Database, view: ReportView) -> Result<i64> {
        let total = db.report_total_count(view)?;
        let mut totals = self.totals.write().unwrap_or_else(PoisonError::into_inner);
        totals[view.index()] = Some(total);
        Ok(total)
    }
}
