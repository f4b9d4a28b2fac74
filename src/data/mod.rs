//! Data layer: core types, loading, querying and aggregation.
//!
//! Architecture:
//! ```text
//!   final.csv / data/final.csv / built-in sample
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  DataSource: parse + coerce once → Arc<Table>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  query    │  FilterSpec: filter → sort → limit → fresh Table
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │ summary   │   │  export   │  describe / metrics, CSV download
//!   └──────────┘   └──────────┘
//! ```

pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod query;
pub mod summary;

pub use error::{DataLoadError, SummaryError};
pub use loader::{DataOrigin, DataSource, LoadedTable};
pub use model::{CompanyRecord, FilterSpec, NumericColumn, SortBy, SortKey, Table};
pub use summary::{DashboardMetrics, SummaryStats};
