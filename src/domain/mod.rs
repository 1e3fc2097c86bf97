//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod allowlist;
pub mod entities;
pub mod errors;

pub use allowlist::{Allowlist, email_domain};
pub use entities::{ExportParams, ExportRequest, ExportStatus, MeetingRecord, MessageRecord};
pub use errors::DomainError;
