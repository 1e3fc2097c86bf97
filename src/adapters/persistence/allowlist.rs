//! Allowlist file loader.
//!
//! One domain per line, surrounding whitespace trimmed, blank lines skipped,
//! duplicates collapsed. No comment syntax, no normalization.

use crate::domain::{Allowlist, DomainError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

pub fn load_allowlist(path: &Path) -> Result<Allowlist, DomainError> {
    let file = File::open(path)
        .map_err(|e| DomainError::Resource(format!("open allowlist {}: {e}", path.display())))?;

    let mut domains = std::collections::HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line
            .map_err(|e| DomainError::Resource(format!("read allowlist {}: {e}", path.display())))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            domains.insert(trimmed.to_string());
        }
    }

    let allowlist = Allowlist::new(domains);
    info!(path = %path.display(), domains = allowlist.len(), "loaded account domains");
    Ok(allowlist)
}
