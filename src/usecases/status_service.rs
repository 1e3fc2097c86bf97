//! Status use case: poll the audit API for export completion and record the
//! download URLs.

use crate::adapters::persistence::RequestStore;
use crate::domain::{DomainError, ExportStatus};
use crate::ports::AuditGateway;
use std::sync::Arc;
use tracing::info;

pub struct StatusService {
    gateway: Arc<dyn AuditGateway>,
    store: RequestStore,
}

impl StatusService {
    pub fn new(gateway: Arc<dyn AuditGateway>, store: RequestStore) -> Self {
        Self { gateway, store }
    }

    /// Query the state of every recorded export request and persist the
    /// results for the downloader.
    pub async fn poll_requests(&self, domain: &str) -> Result<Vec<ExportStatus>, DomainError> {
        let requests = self.store.load_requests().await?;
        let mut statuses = Vec::with_capacity(requests.len());
        for request in &requests {
            let status = self
                .gateway
                .export_status(domain, &request.user, &request.request_id)
                .await?;
            info!(
                user = %request.user,
                request_id = %request.request_id,
                status = %status.status,
                urls = status.file_urls.len(),
                "export status"
            );
            statuses.push(status);
        }
        self.store.save_statuses(&statuses).await?;
        Ok(statuses)
    }

    /// List every export request the service knows for the domain, recorded
    /// requests or not, and persist the results.
    pub async fn list_all(&self, domain: &str) -> Result<Vec<ExportStatus>, DomainError> {
        let statuses = self.gateway.list_exports(domain).await?;
        for status in &statuses {
            info!(
                user = %status.user,
                request_id = %status.request_id,
                status = %status.status,
                "export status"
            );
        }
        self.store.save_statuses(&statuses).await?;
        Ok(statuses)
    }
}
