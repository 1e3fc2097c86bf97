//! Command-line interface. One subcommand per pipeline stage.
//!
//! Credentials are deliberately absent here: the admin password and gpg
//! passphrase come from the environment or an interactive prompt.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gmail-extract")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request mailbox exports for a set of users.
    Export {
        /// Google Apps domain.
        #[arg(long)]
        domain: Option<String>,
        /// File listing the users to back up, one per line.
        #[arg(long)]
        users: PathBuf,
        /// Admin user account.
        #[arg(long)]
        admin: Option<String>,
        /// Public key file; uploaded so archives are encrypted against it.
        #[arg(long)]
        public_key: Option<PathBuf>,
        /// Start date of the export window (YYYY-MM-DD).
        #[arg(long)]
        start_date: Option<String>,
        /// End date of the export window (YYYY-MM-DD).
        #[arg(long)]
        end_date: Option<String>,
        /// Export message headers only.
        #[arg(long)]
        headers_only: bool,
    },

    /// Poll export requests for completion and record download URLs.
    Status {
        /// Google Apps domain.
        #[arg(long)]
        domain: Option<String>,
        /// Admin user account.
        #[arg(long)]
        admin: Option<String>,
        /// List every export request of the domain, not just recorded ones.
        #[arg(long)]
        all: bool,
    },

    /// Download completed export archives.
    Download {
        /// Decrypt downloaded archives with gpg.
        #[arg(long)]
        decrypt: bool,
        /// Directory for downloaded files.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Filter a decrypted mbox archive into CSV summaries.
    Filter {
        /// Decrypted mbox file.
        #[arg(long)]
        mbox: PathBuf,
        /// Account domain allowlist file (default: accounts.txt).
        #[arg(long)]
        accounts: Option<PathBuf>,
        /// Maximum number of messages to process (default: unbounded).
        #[arg(long)]
        max_messages: Option<usize>,
        /// Generate header rows in the output CSV files.
        #[arg(long)]
        headers: bool,
        /// Message summary output (default: <mbox>.mail.csv).
        #[arg(long)]
        mail_out: Option<PathBuf>,
        /// Meeting summary output (default: <mbox>.meeting.csv).
        #[arg(long)]
        meeting_out: Option<PathBuf>,
    },
}
