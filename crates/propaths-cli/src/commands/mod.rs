//! Command implementations.

pub mod export;
pub mod maintenance;
pub mod merge;
pub mod report;
pub mod sync;
pub mod validate;

pub use self::export::execute_export;
pub use self::maintenance::{execute_job, Job};
pub use self::merge::execute_merge;
pub use self::report::execute_report;
pub use self::sync::execute_sync;
pub use self::validate::execute_validate;
