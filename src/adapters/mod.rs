//! Infrastructure adapters. Implement outbound ports and the parsing stages.
//!
//! Audit API, mbox/calendar parsing, CSV output, filesystem, external tools.
//! Map infrastructure errors to DomainError.

pub mod audit;
pub mod csv;
pub mod mbox;
pub mod persistence;
pub mod tools;
pub mod ui;
