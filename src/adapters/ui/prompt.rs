//! Interactive prompts for values not supplied via flags, config, or env.
//!
//! The admin password and the gpg passphrase are only ever taken this way or
//! from the environment, never as a CLI flag.

use crate::domain::DomainError;
use inquire::{Password, PasswordDisplayMode, Text};

/// Prompt for a required plain-text value (domain, admin account, ...).
pub fn required_text(label: &str) -> Result<String, DomainError> {
    let value = Text::new(label)
        .prompt()
        .map_err(|e| DomainError::Config(format!("prompt failed: {e}")))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::Config(format!("{label} must not be empty")));
    }
    Ok(value)
}

/// Prompt for a secret without echo or confirmation.
pub fn secret(label: &str) -> Result<String, DomainError> {
    Password::new(label)
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()
        .map_err(|e| DomainError::Config(format!("prompt failed: {e}")))
}
