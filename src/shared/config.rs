//! Application configuration. API endpoints, credentials, default paths.

use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://apps-apis.google.com";
const DEFAULT_LOGIN_URL: &str = "https://www.google.com/accounts/ClientLogin";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Audit API base URL. Read from GMAIL_EXTRACT_BASE_URL.
    pub base_url: Option<String>,
    /// ClientLogin endpoint. Read from GMAIL_EXTRACT_LOGIN_URL.
    pub login_url: Option<String>,
    /// Google Apps domain. Read from GMAIL_EXTRACT_DOMAIN.
    pub domain: Option<String>,
    /// Admin account name. Read from GMAIL_EXTRACT_ADMIN.
    pub admin: Option<String>,
    /// Admin password. Read from GMAIL_EXTRACT_ADMIN_PASSWORD; prompted for
    /// interactively when unset.
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Account domain allowlist path. Read from GMAIL_EXTRACT_ACCOUNTS_FILE.
    #[serde(default)]
    pub accounts_file: Option<String>,
    /// Export request store path. Read from GMAIL_EXTRACT_REQUESTS_FILE.
    #[serde(default)]
    pub requests_file: Option<String>,
    /// Export status store path. Read from GMAIL_EXTRACT_STATUS_FILE.
    #[serde(default)]
    pub status_file: Option<String>,
    /// Directory for downloaded archives. Read from GMAIL_EXTRACT_DOWNLOAD_DIR.
    #[serde(default)]
    pub download_dir: Option<String>,
    /// Private key passphrase for gpg. Read from GMAIL_EXTRACT_GPG_PASSPHRASE;
    /// prompted for interactively when decryption is requested and unset.
    #[serde(default)]
    pub gpg_passphrase: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut builder = config::Config::builder();
        builder = builder.add_source(config::Environment::with_prefix("GMAIL_EXTRACT"));
        if let Ok(path) = std::env::var("GMAIL_EXTRACT_CONFIG") {
            builder = builder.add_source(config::File::with_name(&path));
        }
        builder.build()?.try_deserialize()
    }

    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn login_url_or_default(&self) -> String {
        self.login_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string())
    }

    pub fn accounts_file_or_default(&self) -> String {
        self.accounts_file
            .clone()
            .unwrap_or_else(|| "accounts.txt".to_string())
    }

    pub fn requests_file_or_default(&self) -> String {
        self.requests_file
            .clone()
            .unwrap_or_else(|| "requests.json".to_string())
    }

    pub fn status_file_or_default(&self) -> String {
        self.status_file
            .clone()
            .unwrap_or_else(|| "backup_status.json".to_string())
    }

    pub fn download_dir_or_default(&self) -> String {
        self.download_dir.clone().unwrap_or_else(|| ".".to_string())
    }

    /// Admin password from config or GMAIL_EXTRACT_ADMIN_PASSWORD env.
    pub fn admin_password(&self) -> Option<String> {
        self.admin_password
            .clone()
            .or_else(|| std::env::var("GMAIL_EXTRACT_ADMIN_PASSWORD").ok())
    }

    /// Gpg passphrase from config or GMAIL_EXTRACT_GPG_PASSPHRASE env.
    pub fn gpg_passphrase(&self) -> Option<String> {
        self.gpg_passphrase
            .clone()
            .or_else(|| std::env::var("GMAIL_EXTRACT_GPG_PASSPHRASE").ok())
    }
}
