//! Filesystem persistence: allowlist loading and request/status JSON stores.

pub mod allowlist;
pub mod request_store;

pub use allowlist::load_allowlist;
pub use request_store::RequestStore;
