//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod history_repo;
pub mod scan_repo;
pub mod style_repo;
pub mod usage_repo;

pub use history_repo::HistoryRepo;
pub use scan_repo::ScanRepo;
pub use style_repo::StyleRepo;
pub use usage_repo::UsageRepo;
