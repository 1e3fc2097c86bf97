//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here; these are mapped from adapters. Field presence is
//! always an explicit `Option` or an empty collection, never a missing map key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed email from the mailbox archive.
///
/// Field declaration order is the column order of the message summary stream
/// (minus `meetings`, which feed the meeting stream instead).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub to: Vec<String>,
    pub from: Vec<String>,
    pub content_type: String,
    /// Envelope sender. Gates calendar extraction when it starts with
    /// `calendar-notification`.
    pub sender: Option<String>,
    pub subject: String,
    pub in_reply_to: Option<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub has_attachment: bool,
    /// `to ++ cc ++ bcc`, derived once at parse time. Used only for filtering.
    pub destinations: Vec<String>,
    /// Calendar events carried by this message. Empty unless the message is a
    /// calendar notification with a decodable payload.
    pub meetings: Vec<MeetingRecord>,
}

/// One calendar event extracted from a message. Owned by its MessageRecord.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub uid: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub summary: String,
    pub location: String,
    pub organizer: Option<String>,
    pub attendees: Vec<String>,
}

/// A mailbox export the audit API has been asked to prepare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub user: String,
    pub request_id: String,
}

/// Reported state of an export request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportStatus {
    pub user: String,
    pub request_id: String,
    pub request_date: Option<String>,
    /// Raw status string from the API (e.g. PENDING, COMPLETED, ERROR).
    pub status: String,
    /// Download URLs (`fileUrl0`, `fileUrl1`, ...) in index order. Populated
    /// only once the request is completed.
    pub file_urls: Vec<String>,
}

impl ExportStatus {
    /// Archives may be downloaded only in this state.
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

/// Parameters of an export request.
#[derive(Debug, Clone, Default)]
pub struct ExportParams {
    /// Inclusive start of the export window, `YYYY-MM-DD`. Unbounded if None.
    pub begin_date: Option<String>,
    /// Inclusive end of the export window, `YYYY-MM-DD`. Unbounded if None.
    pub end_date: Option<String>,
    /// Request header-only packages instead of full messages.
    pub headers_only: bool,
}
