//! Export use case: ask the audit API to prepare mailbox exports for a set
//! of users, and record the request IDs for the status poller.

use crate::adapters::persistence::RequestStore;
use crate::domain::{DomainError, ExportParams, ExportRequest};
use crate::ports::AuditGateway;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ExportService {
    gateway: Arc<dyn AuditGateway>,
    store: RequestStore,
}

impl ExportService {
    pub fn new(gateway: Arc<dyn AuditGateway>, store: RequestStore) -> Self {
        Self { gateway, store }
    }

    /// Request one export per user and persist the granted request IDs.
    ///
    /// `public_key_base64` is uploaded first when present, so the service
    /// encrypts the archives against it. A rejected request for one user is
    /// logged and skipped; the remaining users are still requested.
    pub async fn request_backups(
        &self,
        domain: &str,
        users: &[String],
        params: &ExportParams,
        public_key_base64: Option<&str>,
    ) -> Result<Vec<ExportRequest>, DomainError> {
        if let Some(key) = public_key_base64 {
            self.gateway.upload_public_key(domain, key).await?;
        }

        let mut requests = Vec::new();
        for user in users {
            info!(user = %user, "requesting mailbox export");
            match self.gateway.request_export(domain, user, params).await {
                Ok(request) => {
                    info!(user = %user, request_id = %request.request_id, "export granted");
                    requests.push(request);
                }
                Err(e) => warn!(user = %user, error = %e, "export request failed; skipping user"),
            }
        }

        self.store.save_requests(&requests).await?;
        info!(
            domain,
            requested = requests.len(),
            skipped = users.len() - requests.len(),
            "export requests recorded"
        );
        Ok(requests)
    }
}
