pub mod count_cache;
pub mod lookup;
pub mod query;
pub mod records;
pub mod report;
pub mod sqlite;

pub use count_cache::CountCache;
pub use lookup::{LookupColumn, LookupValue};
pub use query::{BuiltQuery, HashGroup, QueryBuilder, QueryRequest, SortDirection};
pub use report::ReportView;
pub use sqlite::Database;
