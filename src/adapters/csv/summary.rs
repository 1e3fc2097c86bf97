//! Summary serialization. Renders retained messages and their meetings into
//! the two `^`-delimited output streams.
//!
//! Fields are scrubbed (newlines and literal delimiters become spaces) before
//! writing, so the writers can run with quoting disabled and produce the flat
//! rows downstream tooling expects. Header rows are one-shot latches per
//! stream, written before the first data row only.

use crate::domain::{DomainError, MeetingRecord, MessageRecord};
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// Field delimiter of both output streams.
pub const FIELD_DELIMITER: char = '^';
/// Separator between the elements of a multi-valued field.
pub const LIST_SEPARATOR: &str = ";";

/// Timestamps are rendered to minute precision.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Message stream columns, in MessageRecord declaration order (minus
/// `meetings`).
pub const MESSAGE_COLUMNS: [&str; 12] = [
    "messageId",
    "date",
    "to",
    "from",
    "contentType",
    "sender",
    "subject",
    "inReplyTo",
    "cc",
    "bcc",
    "hasAttachment",
    "destinations",
];

/// Meeting stream columns, in MeetingRecord declaration order.
pub const MEETING_COLUMNS: [&str; 7] = [
    "uid",
    "start",
    "end",
    "summary",
    "location",
    "organizer",
    "attendees",
];

/// Writer over the two output streams. Owns the header latches.
///
/// Creation truncates both files; a run that retains nothing leaves them
/// empty (no header row either).
pub struct SummaryWriter {
    messages: Writer<File>,
    meetings: Writer<File>,
    emit_headers: bool,
    message_header_written: bool,
    meeting_header_written: bool,
}

impl SummaryWriter {
    pub fn create(
        message_path: &Path,
        meeting_path: &Path,
        emit_headers: bool,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            messages: open_stream(message_path)?,
            meetings: open_stream(meeting_path)?,
            emit_headers,
            message_header_written: false,
            meeting_header_written: false,
        })
    }

    /// Append one retained message to the message stream and each of its
    /// meetings to the meeting stream.
    pub fn write_message(&mut self, record: &MessageRecord) -> Result<(), DomainError> {
        if self.emit_headers && !self.message_header_written {
            self.messages
                .write_record(MESSAGE_COLUMNS)
                .map_err(write_error)?;
            self.message_header_written = true;
        }
        self.messages
            .write_record(message_row(record))
            .map_err(write_error)?;

        for meeting in &record.meetings {
            if self.emit_headers && !self.meeting_header_written {
                self.meetings
                    .write_record(MEETING_COLUMNS)
                    .map_err(write_error)?;
                self.meeting_header_written = true;
            }
            self.meetings
                .write_record(meeting_row(meeting))
                .map_err(write_error)?;
        }
        Ok(())
    }

    /// Flush both streams. Call once at the end of the run.
    pub fn finish(mut self) -> Result<(), DomainError> {
        self.messages
            .flush()
            .and_then(|_| self.meetings.flush())
            .map_err(|e| DomainError::Resource(format!("flush output: {e}")))
    }
}

fn open_stream(path: &Path) -> Result<Writer<File>, DomainError> {
    WriterBuilder::new()
        .delimiter(FIELD_DELIMITER as u8)
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .map_err(|e| DomainError::Resource(format!("create {}: {e}", path.display())))
}

fn write_error(e: csv::Error) -> DomainError {
    DomainError::Resource(format!("write output row: {e}"))
}

/// Newlines and literal field delimiters become spaces; nothing is quoted.
fn scrub(value: &str) -> String {
    value
        .replace('\n', " ")
        .replace('\r', "")
        .replace(FIELD_DELIMITER, " ")
}

fn scrub_opt(value: Option<&str>) -> String {
    value.map(scrub).unwrap_or_default()
}

fn join_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| scrub(v))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn format_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn message_row(record: &MessageRecord) -> Vec<String> {
    vec![
        scrub_opt(record.message_id.as_deref()),
        format_time(record.date),
        join_list(&record.to),
        join_list(&record.from),
        scrub(&record.content_type),
        scrub_opt(record.sender.as_deref()),
        scrub(&record.subject),
        scrub_opt(record.in_reply_to.as_deref()),
        join_list(&record.cc),
        join_list(&record.bcc),
        record.has_attachment.to_string(),
        join_list(&record.destinations),
    ]
}

fn meeting_row(meeting: &MeetingRecord) -> Vec<String> {
    vec![
        scrub(&meeting.uid),
        format_time(meeting.start),
        format_time(meeting.end),
        scrub(&meeting.summary),
        scrub(&meeting.location),
        scrub_opt(meeting.organizer.as_deref()),
        join_list(&meeting.attendees),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    fn sample_message() -> MessageRecord {
        MessageRecord {
            message_id: Some("id-1".into()),
            date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 45).unwrap()),
            to: vec!["a@one.com".into(), "b@two.com".into()],
            from: vec!["s@three.com".into()],
            content_type: "text/plain".into(),
            sender: None,
            subject: "hello".into(),
            in_reply_to: None,
            cc: vec![],
            bcc: vec![],
            has_attachment: false,
            destinations: vec!["a@one.com".into(), "b@two.com".into()],
            meetings: vec![],
        }
    }

    fn write_all(messages: &[MessageRecord], headers: bool) -> (String, String) {
        let dir = tempfile::tempdir().unwrap();
        let mail_path = dir.path().join("out.mail.csv");
        let meeting_path = dir.path().join("out.meeting.csv");
        let mut writer = SummaryWriter::create(&mail_path, &meeting_path, headers).unwrap();
        for m in messages {
            writer.write_message(m).unwrap();
        }
        writer.finish().unwrap();
        (
            fs::read_to_string(&mail_path).unwrap(),
            fs::read_to_string(&meeting_path).unwrap(),
        )
    }

    #[test]
    fn test_message_row_layout() {
        let (mail, _) = write_all(&[sample_message()], false);
        assert_eq!(
            mail,
            "id-1^2024-01-15T09:30^a@one.com;b@two.com^s@three.com^text/plain^^hello^^^^false^a@one.com;b@two.com\n"
        );
    }

    #[test]
    fn test_header_written_exactly_once() {
        let (mail, _) = write_all(&[sample_message(), sample_message()], true);
        let lines: Vec<&str> = mail.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], MESSAGE_COLUMNS.join("^"));
        assert!(lines[1].starts_with("id-1^"));
        assert_eq!(
            mail.matches("messageId").count(),
            1,
            "header must not repeat"
        );
    }

    #[test]
    fn test_no_rows_written_without_messages() {
        let (mail, meetings) = write_all(&[], true);
        assert!(mail.is_empty());
        assert!(meetings.is_empty());
    }

    #[test]
    fn test_meeting_header_gated_on_first_meeting() {
        let plain = sample_message();
        let mut with_meetings = sample_message();
        with_meetings.meetings = vec![
            MeetingRecord {
                uid: "m-1".into(),
                organizer: Some("boss@allowed.com".into()),
                attendees: vec!["a@one.com".into(), "b@two.com".into()],
                ..Default::default()
            },
            MeetingRecord {
                uid: "m-2".into(),
                ..Default::default()
            },
        ];
        let (_, meetings) = write_all(&[plain, with_meetings], true);
        let lines: Vec<&str> = meetings.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], MEETING_COLUMNS.join("^"));
        assert_eq!(lines[1], "m-1^^^^^boss@allowed.com^a@one.com;b@two.com");
        assert_eq!(lines[2], "m-2^^^^^^");
    }

    #[test]
    fn test_scrubs_newlines_and_delimiters() {
        let mut msg = sample_message();
        msg.subject = "line one\r\nline^two".into();
        let (mail, _) = write_all(&[msg], false);
        assert!(mail.contains("^line one line two^"));
    }

    #[test]
    fn test_create_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let mail_path = dir.path().join("out.mail.csv");
        let meeting_path = dir.path().join("out.meeting.csv");

        let mut writer = SummaryWriter::create(&mail_path, &meeting_path, false).unwrap();
        writer.write_message(&sample_message()).unwrap();
        writer.finish().unwrap();
        assert!(!fs::read_to_string(&mail_path).unwrap().is_empty());

        let writer = SummaryWriter::create(&mail_path, &meeting_path, false).unwrap();
        writer.finish().unwrap();
        assert!(fs::read_to_string(&mail_path).unwrap().is_empty());
    }
}
