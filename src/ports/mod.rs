//! Port traits. API boundaries for the hexagon.
//!
//! Outbound: called by the application into infrastructure. The filter
//! pipeline itself is pure local computation and needs no port.

pub mod outbound;

pub use outbound::{AuditGateway, Decryptor};
