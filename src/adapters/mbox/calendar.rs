//! Calendar extraction. Pulls MeetingRecords out of calendar notification
//! messages.
//!
//! Only messages whose sender starts with `calendar-notification` are
//! considered; the invitation payload is the second body part, base64-encoded
//! iCalendar. Every failure mode (missing part, bad base64, bad iCalendar) is
//! silently tolerated; the owning message is still valid, just meeting-less.

use crate::domain::MeetingRecord;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use icalendar::parser::{Component, read_calendar, unfold};
use mailparse::ParsedMail;
use tracing::debug;

/// Sender prefix that marks a message as a calendar notification.
pub const CALENDAR_SENDER_PREFIX: &str = "calendar-notification";

/// Index of the body part carrying the invitation payload.
const PAYLOAD_PART: usize = 1;

/// Extract the meetings carried by a parsed message, if it is a calendar
/// notification. Returns an empty vector in every non-success case.
pub fn extract_meetings(mail: &ParsedMail<'_>, sender: Option<&str>) -> Vec<MeetingRecord> {
    if !sender.is_some_and(|s| s.starts_with(CALENDAR_SENDER_PREFIX)) {
        return Vec::new();
    }

    let Some(part) = mail.subparts.get(PAYLOAD_PART) else {
        debug!("calendar notification without a second body part");
        return Vec::new();
    };
    let Some(ics) = decode_payload(part) else {
        debug!("calendar payload is neither iCalendar nor base64");
        return Vec::new();
    };

    let unfolded = unfold(&ics);
    let calendar = match read_calendar(&unfolded) {
        Ok(calendar) => calendar,
        Err(e) => {
            debug!(error = %e, "calendar payload did not parse");
            return Vec::new();
        }
    };

    calendar
        .components
        .iter()
        .filter(|c| c.name.as_str().eq_ignore_ascii_case("VEVENT"))
        .map(meeting_from_event)
        .collect()
}

/// Recover the iCalendar text of the payload part.
///
/// The transfer-encoding-decoded body is used directly when it already reads
/// as a calendar document; otherwise it is treated as one more base64 layer
/// (whitespace-forgiving), as produced by the notification service.
fn decode_payload(part: &ParsedMail<'_>) -> Option<String> {
    let bytes = part.get_body_raw().ok()?;
    let text = String::from_utf8_lossy(&bytes);
    if text.contains("BEGIN:VCALENDAR") {
        return Some(text.into_owned());
    }
    let compact: Vec<u8> = bytes
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let decoded = BASE64.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&decoded).into_owned())
}

fn prop_value<'a>(component: &'a Component<'_>, name: &str) -> Option<&'a str> {
    component
        .properties
        .iter()
        .find(|p| p.name.as_str().eq_ignore_ascii_case(name))
        .map(|p| p.val.as_str())
}

fn meeting_from_event(event: &Component<'_>) -> MeetingRecord {
    MeetingRecord {
        uid: prop_value(event, "UID").unwrap_or_default().to_string(),
        start: prop_value(event, "DTSTART").and_then(ical_datetime),
        end: prop_value(event, "DTEND").and_then(ical_datetime),
        summary: prop_value(event, "SUMMARY").unwrap_or_default().to_string(),
        location: prop_value(event, "LOCATION").unwrap_or_default().to_string(),
        organizer: prop_value(event, "ORGANIZER").map(strip_mailto),
        attendees: event
            .properties
            .iter()
            .filter(|p| p.name.as_str().eq_ignore_ascii_case("ATTENDEE"))
            .map(|p| strip_mailto(p.val.as_str()))
            .collect(),
    }
}

/// Organizer/attendee values arrive as `mailto:` URIs; keep the address.
fn strip_mailto(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 7 && value.as_bytes()[..7].eq_ignore_ascii_case(b"mailto:") {
        value[7..].to_string()
    } else {
        value.to_string()
    }
}

/// Parse the iCal date-time forms in use: UTC (`...Z`), floating, and
/// date-only. Floating times are taken as UTC.
fn ical_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
