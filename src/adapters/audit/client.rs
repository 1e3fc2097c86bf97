//! Implements AuditGateway against the Google Apps mail audit API.
//!
//! Thin request/response plumbing: ClientLogin for the auth token, Atom
//! entries of `apps:property` elements both ways. No retry/backoff.

use crate::adapters::audit::atom;
use crate::domain::{DomainError, ExportParams, ExportRequest, ExportStatus};
use crate::ports::AuditGateway;
use indicatif::ProgressBar;
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

const ACCOUNT_TYPE: &str = "HOSTED";
const SERVICE: &str = "apps";

/// HTTP adapter for the audit API. Holds the auth token after login.
pub struct AuditHttpClient {
    http: reqwest::Client,
    base_url: String,
    login_url: String,
    token: RwLock<Option<String>>,
}

impl AuditHttpClient {
    pub fn new(base_url: String, login_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            login_url,
            token: RwLock::new(None),
        }
    }

    async fn auth_header(&self) -> Result<String, DomainError> {
        let token = self.token.read().await;
        let token = token
            .as_deref()
            .ok_or_else(|| DomainError::Auth("login must be called first".into()))?;
        Ok(format!("GoogleLogin auth=\"{token}\""))
    }

    async fn get(&self, path: &str) -> Result<String, DomainError> {
        let auth = self.auth_header().await?;
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("Content-Type", "application/atom+xml")
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| DomainError::Audit(format!("request failed: {e}")))?;
        Self::success_body(response).await
    }

    async fn post(&self, path: &str, body: String) -> Result<String, DomainError> {
        let auth = self.auth_header().await?;
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header("Content-Type", "application/atom+xml")
            .header("Authorization", auth)
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::Audit(format!("request failed: {e}")))?;
        Self::success_body(response).await
    }

    async fn success_body(response: reqwest::Response) -> Result<String, DomainError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DomainError::Audit(format!(
                "API error {status}: {}",
                text.chars().take(200).collect::<String>()
            )));
        }
        Ok(text)
    }
}

/// `/a/feeds/compliance/audit/mail/export/{domain}[/{user}[/{request_id}]]`
fn export_path(domain: &str, user: Option<&str>, request_id: Option<&str>) -> String {
    let mut path = format!("/a/feeds/compliance/audit/mail/export/{domain}");
    if let Some(user) = user {
        path.push('/');
        path.push_str(user);
    }
    if let Some(request_id) = request_id {
        path.push('/');
        path.push_str(request_id);
    }
    path
}

/// Render an Atom entry of `apps:property` name/value pairs.
fn atom_entry(properties: &[(&str, &str)]) -> String {
    let mut entry = String::from(
        "<atom:entry xmlns:atom='http://www.w3.org/2005/Atom' \
         xmlns:apps='http://schemas.google.com/apps/2006'>",
    );
    for (name, value) in properties {
        entry.push_str(&format!(
            "<apps:property name='{name}' value=\"{}\"/>",
            escape(value)
        ));
    }
    entry.push_str("</atom:entry>");
    entry
}

/// Build an ExportStatus from a response's property map. `fileUrl0..N` are
/// collected in index order until the first gap.
fn status_from_props(user: &str, props: &HashMap<String, String>) -> ExportStatus {
    let mut file_urls = Vec::new();
    let mut index = 0;
    while let Some(url) = props.get(&format!("fileUrl{index}")) {
        file_urls.push(url.clone());
        index += 1;
    }
    ExportStatus {
        user: user.to_string(),
        request_id: props.get("requestId").cloned().unwrap_or_default(),
        request_date: props.get("requestDate").cloned(),
        status: props.get("status").cloned().unwrap_or_default(),
        file_urls,
    }
}

/// The API expects export window bounds as `YYYY-MM-DD HH:MM`; bare dates get
/// a midnight time, absent bounds stay empty.
fn window_bound(date: Option<&str>) -> String {
    date.map(|d| format!("{d} 00:00")).unwrap_or_default()
}

#[async_trait::async_trait]
impl AuditGateway for AuditHttpClient {
    async fn login(&self, admin: &str, password: &str) -> Result<(), DomainError> {
        let source = format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let params = [
            ("accountType", ACCOUNT_TYPE),
            ("Email", admin),
            ("Passwd", password),
            ("service", SERVICE),
            ("source", &source),
        ];
        let response = self
            .http
            .post(&self.login_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("login request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(DomainError::Auth(format!(
                "login rejected with status {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;
        let token = body
            .lines()
            .find_map(|line| line.strip_prefix("Auth="))
            .ok_or_else(|| DomainError::Auth("no Auth token in login response".into()))?;
        *self.token.write().await = Some(token.to_string());
        info!(admin, "authenticated against audit API");
        Ok(())
    }

    async fn upload_public_key(&self, domain: &str, key_base64: &str) -> Result<(), DomainError> {
        let body = atom_entry(&[("publicKey", key_base64)]);
        self.post(
            &format!("/a/feeds/compliance/audit/publickey/{domain}"),
            body,
        )
        .await?;
        info!(domain, "uploaded public key");
        Ok(())
    }

    async fn request_export(
        &self,
        domain: &str,
        user: &str,
        params: &ExportParams,
    ) -> Result<ExportRequest, DomainError> {
        let begin = window_bound(params.begin_date.as_deref());
        let end = window_bound(params.end_date.as_deref());
        let package = if params.headers_only {
            "HEADER_ONLY"
        } else {
            "FULL_MESSAGE"
        };
        let body = atom_entry(&[
            ("beginDate", begin.as_str()),
            ("endDate", end.as_str()),
            ("includeDeleted", "true"),
            ("searchQuery", ""),
            ("packageContent", package),
        ]);

        let xml = self
            .post(&export_path(domain, Some(user), None), body)
            .await?;
        let props = atom::properties(&xml);
        let request_id = props
            .get("requestId")
            .cloned()
            .ok_or_else(|| DomainError::Audit("export response carries no requestId".into()))?;
        debug!(user, request_id = %request_id, "export requested");
        Ok(ExportRequest {
            user: user.to_string(),
            request_id,
        })
    }

    async fn export_status(
        &self,
        domain: &str,
        user: &str,
        request_id: &str,
    ) -> Result<ExportStatus, DomainError> {
        let xml = self
            .get(&export_path(domain, Some(user), Some(request_id)))
            .await?;
        Ok(status_from_props(user, &atom::properties(&xml)))
    }

    async fn list_exports(&self, domain: &str) -> Result<Vec<ExportStatus>, DomainError> {
        let xml = self.get(&export_path(domain, None, None)).await?;
        Ok(atom::entries(&xml)
            .into_iter()
            .map(|props| {
                let user = props.get("userEmailAddress").cloned().unwrap_or_default();
                status_from_props(&user, &props)
            })
            .collect())
    }

    async fn fetch_archive(&self, url: &str, dest: &Path) -> Result<u64, DomainError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Audit(format!("download request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(DomainError::Audit(format!(
                "download failed with status {}",
                response.status()
            )));
        }

        let progress = match response.content_length() {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| DomainError::Resource(format!("create {}: {e}", dest.display())))?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DomainError::Audit(format!("download interrupted: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| DomainError::Resource(format!("write {}: {e}", dest.display())))?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        file.flush()
            .await
            .map_err(|e| DomainError::Resource(e.to_string()))?;
        progress.finish_and_clear();
        info!(url, dest = %dest.display(), bytes = written, "downloaded archive");
        Ok(written)
    }
}
