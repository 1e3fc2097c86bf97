//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, ExportParams, ExportRequest, ExportStatus};
use std::path::Path;

/// Administrative audit API gateway. Request exports, poll status, fetch
/// archives.
#[async_trait::async_trait]
pub trait AuditGateway: Send + Sync {
    /// Authenticate as the admin user. Must succeed before any other call.
    async fn login(&self, admin: &str, password: &str) -> Result<(), DomainError>;

    /// Upload the base64-encoded public key used to encrypt export archives.
    async fn upload_public_key(&self, domain: &str, key_base64: &str) -> Result<(), DomainError>;

    /// Ask the service to prepare a mailbox export for one user. Returns the
    /// opaque request identifier.
    async fn request_export(
        &self,
        domain: &str,
        user: &str,
        params: &ExportParams,
    ) -> Result<ExportRequest, DomainError>;

    /// Query the state of a single export request.
    async fn export_status(
        &self,
        domain: &str,
        user: &str,
        request_id: &str,
    ) -> Result<ExportStatus, DomainError>;

    /// List every export request known to the service for the domain.
    async fn list_exports(&self, domain: &str) -> Result<Vec<ExportStatus>, DomainError>;

    /// Download one archive file to `dest`. Returns the number of bytes
    /// written.
    async fn fetch_archive(&self, url: &str, dest: &Path) -> Result<u64, DomainError>;
}

/// External decryption tool. Turns a downloaded archive into a plaintext
/// mailbox file.
#[async_trait::async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(&self, input: &Path, output: &Path) -> Result<(), DomainError>;
}
