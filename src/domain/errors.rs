//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Only `Resource` is fatal to
//! a filter run; calendar decode failures and malformed messages are not
//! errors at all and degrade to empty/absent field values upstream.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Input, allowlist, or output file cannot be opened/read/created.
    #[error("resource error: {0}")]
    Resource(String),

    #[error("audit gateway error: {0}")]
    Audit(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("configuration error: {0}")]
    Config(String),
}
