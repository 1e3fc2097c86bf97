//! The filter pipeline: segment -> parse -> extract -> filter -> serialize.
//!
//! Fully synchronous and single-threaded. One message block is completely
//! processed before the next is read, so peak memory is bounded by one
//! message. The only state shared across messages is the read-only allowlist
//! and the serializer's header latches.

use crate::adapters::csv::SummaryWriter;
use crate::adapters::mbox::{MessageBlocks, parse_message};
use crate::domain::{Allowlist, DomainError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sentinel meaning "process the whole archive".
pub const UNBOUNDED: usize = usize::MAX;

/// Run parameters of one filter pass.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// The decrypted mailbox archive.
    pub mbox: PathBuf,
    /// Message summary output. Defaults to `<mbox>.mail.csv`.
    pub mail_out: Option<PathBuf>,
    /// Meeting summary output. Defaults to `<mbox>.meeting.csv`.
    pub meeting_out: Option<PathBuf>,
    /// Stop after this many messages, without error.
    pub max_messages: usize,
    /// Emit a header row at the top of each output stream.
    pub emit_headers: bool,
}

impl FilterOptions {
    pub fn new(mbox: PathBuf) -> Self {
        Self {
            mbox,
            mail_out: None,
            meeting_out: None,
            max_messages: UNBOUNDED,
            emit_headers: false,
        }
    }

    fn mail_out(&self) -> PathBuf {
        self.mail_out
            .clone()
            .unwrap_or_else(|| derived_path(&self.mbox, ".mail.csv"))
    }

    fn meeting_out(&self) -> PathBuf {
        self.meeting_out
            .clone()
            .unwrap_or_else(|| derived_path(&self.mbox, ".meeting.csv"))
    }
}

fn derived_path(mbox: &Path, suffix: &str) -> PathBuf {
    let mut name = mbox.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Counters of one filter pass.
#[derive(Debug, Default, PartialEq)]
pub struct FilterStats {
    pub scanned: usize,
    pub retained: usize,
    pub dropped: usize,
    pub meetings: usize,
}

/// Filters a mailbox archive against the allowlist.
pub struct FilterService {
    allowlist: Allowlist,
}

impl FilterService {
    pub fn new(allowlist: Allowlist) -> Self {
        Self { allowlist }
    }

    /// Process the archive one message at a time and append retained rows to
    /// the two output streams. Output files are truncated up front; a fatal
    /// `Resource` error is the only failure mode.
    pub fn run(&self, options: &FilterOptions) -> Result<FilterStats, DomainError> {
        let mail_out = options.mail_out();
        let meeting_out = options.meeting_out();
        let mut writer = SummaryWriter::create(&mail_out, &meeting_out, options.emit_headers)?;

        let blocks = MessageBlocks::from_path(&options.mbox).map_err(|e| {
            DomainError::Resource(format!("open mailbox {}: {e}", options.mbox.display()))
        })?;

        let mut stats = FilterStats::default();
        for block in blocks.take(options.max_messages) {
            let block = block.map_err(|e| {
                DomainError::Resource(format!("read mailbox {}: {e}", options.mbox.display()))
            })?;
            stats.scanned += 1;

            let record = parse_message(&block);
            if self.allowlist.retains(&record) {
                stats.retained += 1;
                stats.meetings += record.meetings.len();
                info!(
                    message_id = record.message_id.as_deref().unwrap_or(""),
                    meetings = record.meetings.len(),
                    "retained message"
                );
                writer.write_message(&record)?;
            } else {
                stats.dropped += 1;
                debug!(
                    message_id = record.message_id.as_deref().unwrap_or(""),
                    "dropped message"
                );
            }
        }
        writer.finish()?;

        info!(
            mbox = %options.mbox.display(),
            scanned = stats.scanned,
            retained = stats.retained,
            dropped = stats.dropped,
            meetings = stats.meetings,
            "filter run complete"
        );
        Ok(stats)
    }
}
