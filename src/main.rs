//! Wiring & DI. Entry point: parse the CLI, bootstrap adapters, inject into
//! services, run the chosen command.
//!
//! No business logic here; each subcommand maps onto one use case.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use clap::Parser;
use dotenv::dotenv;
use gmail_extract::adapters::audit::AuditHttpClient;
use gmail_extract::adapters::persistence::{RequestStore, load_allowlist};
use gmail_extract::adapters::tools::GpgDecryptor;
use gmail_extract::adapters::ui::{self, prompt};
use gmail_extract::cli::{Cli, Command};
use gmail_extract::domain::{DomainError, ExportParams};
use gmail_extract::ports::{AuditGateway, Decryptor};
use gmail_extract::shared::config::AppConfig;
use gmail_extract::usecases::{
    DownloadService, ExportService, FilterOptions, FilterService, StatusService,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    if let Ok(path) = &env_loaded {
        info!(path = %path.display(), "loaded .env");
    }

    ui::init_ui();

    let cli = Cli::parse();
    let cfg = AppConfig::load().unwrap_or_default();

    match cli.command {
        Command::Export {
            domain,
            users,
            admin,
            public_key,
            start_date,
            end_date,
            headers_only,
        } => {
            let domain = resolve(domain, cfg.domain.clone(), "Domain:")?;
            let admin = resolve(admin, cfg.admin.clone(), "Admin user account:")?;
            let password = admin_password(&cfg)?;
            let users = read_users(&users)?;
            let public_key = public_key.map(|path| read_key_base64(&path)).transpose()?;

            let gateway = connect(&cfg);
            gateway.login(&admin, &password).await?;
            let service = ExportService::new(gateway, request_store(&cfg));
            let params = ExportParams {
                begin_date: start_date,
                end_date,
                headers_only,
            };
            service
                .request_backups(&domain, &users, &params, public_key.as_deref())
                .await?;
        }

        Command::Status { domain, admin, all } => {
            let domain = resolve(domain, cfg.domain.clone(), "Domain:")?;
            let admin = resolve(admin, cfg.admin.clone(), "Admin user account:")?;
            let password = admin_password(&cfg)?;

            let gateway = connect(&cfg);
            gateway.login(&admin, &password).await?;
            let service = StatusService::new(gateway, request_store(&cfg));
            if all {
                service.list_all(&domain).await?;
            } else {
                service.poll_requests(&domain).await?;
            }
        }

        Command::Download {
            decrypt,
            output_dir,
        } => {
            let decryptor: Option<Arc<dyn Decryptor>> = if decrypt {
                let passphrase = match cfg.gpg_passphrase() {
                    Some(passphrase) => Some(passphrase),
                    None => {
                        let entered = prompt::secret("Private key passphrase:")?;
                        (!entered.is_empty()).then_some(entered)
                    }
                };
                Some(Arc::new(GpgDecryptor::new(passphrase)))
            } else {
                None
            };
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(cfg.download_dir_or_default()));
            let service =
                DownloadService::new(connect(&cfg), decryptor, request_store(&cfg), output_dir);
            service.fetch_completed().await?;
        }

        Command::Filter {
            mbox,
            accounts,
            max_messages,
            headers,
            mail_out,
            meeting_out,
        } => {
            let accounts =
                accounts.unwrap_or_else(|| PathBuf::from(cfg.accounts_file_or_default()));
            let allowlist = load_allowlist(&accounts)?;

            let mut options = FilterOptions::new(mbox);
            options.mail_out = mail_out;
            options.meeting_out = meeting_out;
            options.emit_headers = headers;
            if let Some(max) = max_messages {
                options.max_messages = max;
            }
            FilterService::new(allowlist).run(&options)?;
        }
    }

    Ok(())
}

fn connect(cfg: &AppConfig) -> Arc<dyn AuditGateway> {
    Arc::new(AuditHttpClient::new(
        cfg.base_url_or_default(),
        cfg.login_url_or_default(),
    ))
}

fn request_store(cfg: &AppConfig) -> RequestStore {
    RequestStore::new(cfg.requests_file_or_default(), cfg.status_file_or_default())
}

/// Flag value, then config value, then interactive prompt.
fn resolve(flag: Option<String>, cfg: Option<String>, label: &str) -> Result<String, DomainError> {
    match flag.or(cfg) {
        Some(value) => Ok(value),
        None => prompt::required_text(label),
    }
}

fn admin_password(cfg: &AppConfig) -> Result<String, DomainError> {
    match cfg.admin_password() {
        Some(password) => Ok(password),
        None => prompt::secret("Admin password:"),
    }
}

/// One user per line, trimmed, blanks skipped.
fn read_users(path: &Path) -> Result<Vec<String>, DomainError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Resource(format!("read users file {}: {e}", path.display())))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn read_key_base64(path: &Path) -> Result<String, DomainError> {
    let contents = std::fs::read(path)
        .map_err(|e| DomainError::Resource(format!("read public key {}: {e}", path.display())))?;
    Ok(BASE64.encode(contents))
}
