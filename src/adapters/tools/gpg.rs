//! Gpg decryption adapter. Implements Decryptor by invoking the external
//! `gpg` binary.
//!
//! Key management stays with gpg: the private key must already be installed
//! in the invoking user's keyring.

use crate::domain::DomainError;
use crate::ports::Decryptor;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

pub struct GpgDecryptor {
    passphrase: Option<String>,
}

impl GpgDecryptor {
    /// `passphrase`: supplied to gpg in batch mode; when None, gpg falls back
    /// to its own agent/pinentry.
    pub fn new(passphrase: Option<String>) -> Self {
        Self { passphrase }
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--batch".into(), "--yes".into()];
        if let Some(passphrase) = &self.passphrase {
            args.push("--passphrase".into());
            args.push(passphrase.trim().into());
        }
        args.push("-o".into());
        args.push(output.as_os_str().to_os_string());
        args.push("-d".into());
        args.push(input.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl Decryptor for GpgDecryptor {
    async fn decrypt(&self, input: &Path, output: &Path) -> Result<(), DomainError> {
        let status = Command::new("gpg")
            .args(self.build_args(input, output))
            .status()
            .await
            .map_err(|e| DomainError::Decrypt(format!("failed to run gpg: {e}")))?;
        if !status.success() {
            return Err(DomainError::Decrypt(format!(
                "gpg exited with {status} for {}",
                input.display()
            )));
        }
        info!(input = %input.display(), output = %output.display(), "decrypted archive");
        Ok(())
    }
}
