//! Application use cases. Orchestrate domain logic via ports.

pub mod download_service;
pub mod export_service;
pub mod filter_service;
pub mod status_service;

pub use download_service::DownloadService;
pub use export_service::ExportService;
pub use filter_service::{FilterOptions, FilterService, FilterStats};
pub use status_service::StatusService;
