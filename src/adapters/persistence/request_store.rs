//! JSON persistence for export requests and their reported statuses.
//!
//! Two small documents: `requests.json` (written by the export command, read
//! by the status command) and `backup_status.json` (written by the status
//! command, read by the download command).

use crate::domain::{DomainError, ExportRequest, ExportStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct RequestStore {
    requests_path: PathBuf,
    status_path: PathBuf,
}

impl RequestStore {
    pub fn new(requests_path: impl AsRef<Path>, status_path: impl AsRef<Path>) -> Self {
        Self {
            requests_path: requests_path.as_ref().to_path_buf(),
            status_path: status_path.as_ref().to_path_buf(),
        }
    }

    pub async fn load_requests(&self) -> Result<Vec<ExportRequest>, DomainError> {
        read_json(&self.requests_path).await
    }

    pub async fn save_requests(&self, requests: &[ExportRequest]) -> Result<(), DomainError> {
        write_json(&self.requests_path, requests).await
    }

    pub async fn load_statuses(&self) -> Result<Vec<ExportStatus>, DomainError> {
        read_json(&self.status_path).await
    }

    pub async fn save_statuses(&self, statuses: &[ExportStatus]) -> Result<(), DomainError> {
        write_json(&self.status_path, statuses).await
    }
}

/// Missing file reads as an empty list; corrupt JSON is an error.
async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DomainError> {
    match fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text)
            .map_err(|e| DomainError::Resource(format!("parse {}: {e}", path.display()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(DomainError::Resource(format!(
            "read {}: {e}",
            path.display()
        ))),
    }
}

/// Atomic save using the write-replace pattern: temp file, sync_all, rename.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DomainError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DomainError::Resource(e.to_string()))?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| DomainError::Resource(format!("create temp file: {e}")))?;
    file.write_all(json.as_bytes())
        .await
        .map_err(|e| DomainError::Resource(format!("write temp file: {e}")))?;
    file.sync_all()
        .await
        .map_err(|e| DomainError::Resource(format!("sync temp file: {e}")))?;
    drop(file);

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| DomainError::Resource(format!("atomic rename failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requests_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RequestStore::new(dir.path().join("requests.json"), dir.path().join("s.json"));

        let requests = vec![
            ExportRequest {
                user: "roger".into(),
                request_id: "1001".into(),
            },
            ExportRequest {
                user: "jane".into(),
                request_id: "1002".into(),
            },
        ];
        store.save_requests(&requests).await.unwrap();
        assert_eq!(store.load_requests().await.unwrap(), requests);
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RequestStore::new(dir.path().join("none.json"), dir.path().join("none2.json"));
        assert!(store.load_requests().await.unwrap().is_empty());
        assert!(store.load_statuses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statuses_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RequestStore::new(dir.path().join("r.json"), dir.path().join("status.json"));

        let statuses = vec![ExportStatus {
            user: "roger".into(),
            request_id: "1001".into(),
            request_date: Some("2024-01-15".into()),
            status: "COMPLETED".into(),
            file_urls: vec!["https://example.com/0".into()],
        }];
        store.save_statuses(&statuses).await.unwrap();
        assert_eq!(store.load_statuses().await.unwrap(), statuses);
    }
}
