//! Download use case: fetch completed export archives and optionally decrypt
//! them into local mailbox files, which is what the filter pipeline consumes.

use crate::adapters::persistence::RequestStore;
use crate::domain::DomainError;
use crate::ports::{AuditGateway, Decryptor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DownloadService {
    gateway: Arc<dyn AuditGateway>,
    /// When None, archives are left encrypted on disk.
    decryptor: Option<Arc<dyn Decryptor>>,
    store: RequestStore,
    output_dir: PathBuf,
}

impl DownloadService {
    pub fn new(
        gateway: Arc<dyn AuditGateway>,
        decryptor: Option<Arc<dyn Decryptor>>,
        store: RequestStore,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            gateway,
            decryptor,
            store,
            output_dir,
        }
    }

    /// Download every COMPLETED archive recorded by the status poller.
    ///
    /// Archives land at `{user}_{request_id}[_{n}].pgp`; with a decryptor
    /// configured, the matching `.mbox` is produced beside each and returned
    /// instead. Requests that are not completed yet are skipped silently.
    pub async fn fetch_completed(&self) -> Result<Vec<PathBuf>, DomainError> {
        let statuses = self.store.load_statuses().await?;
        let mut mailboxes = Vec::new();

        for status in &statuses {
            if !status.is_completed() || status.file_urls.is_empty() {
                debug!(
                    user = %status.user,
                    request_id = %status.request_id,
                    status = %status.status,
                    "not ready; skipping"
                );
                continue;
            }
            let user = local_part(&status.user);
            for (index, url) in status.file_urls.iter().enumerate() {
                let stem = if index == 0 {
                    format!("{user}_{}", status.request_id)
                } else {
                    format!("{user}_{}_{index}", status.request_id)
                };
                let encrypted = self.output_dir.join(format!("{stem}.pgp"));
                info!(user, url = %url, dest = %encrypted.display(), "downloading archive");
                self.gateway.fetch_archive(url, &encrypted).await?;

                if let Some(decryptor) = &self.decryptor {
                    let mbox = self.output_dir.join(format!("{stem}.mbox"));
                    decryptor.decrypt(&encrypted, &mbox).await?;
                    mailboxes.push(mbox);
                } else {
                    mailboxes.push(encrypted);
                }
            }
        }

        info!(count = mailboxes.len(), "downloads complete");
        Ok(mailboxes)
    }
}

/// The account name before the `@` of a user email address.
fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
