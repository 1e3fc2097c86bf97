//! End-to-end filter pipeline tests: real files in, real CSV streams out.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use gmail_extract::adapters::persistence::load_allowlist;
use gmail_extract::usecases::{FilterOptions, FilterService};
use std::fs;
use std::path::{Path, PathBuf};

const ICS: &str = "BEGIN:VCALENDAR\r\n\
    VERSION:2.0\r\n\
    BEGIN:VEVENT\r\n\
    UID:planning-1@calendar\r\n\
    DTSTART:20131015T090000Z\r\n\
    DTEND:20131015T100000Z\r\n\
    SUMMARY:Planning\r\n\
    LOCATION:HQ\r\n\
    ORGANIZER:mailto:boss@allowed.com\r\n\
    ATTENDEE:mailto:nobody@notallowed.com\r\n\
    END:VEVENT\r\n\
    END:VCALENDAR\r\n";

/// Message A: plain mail from an allowed domain, no calendar.
fn plain_message() -> String {
    "From user@allowed.com Mon Oct 14 22:05:00 2013\n\
     Message-ID: <a@mail>\n\
     Date: Mon, 14 Oct 2013 20:00:00 +0000\n\
     From: user@allowed.com\n\
     To: other@notallowed.com\n\
     Subject: Plain note\n\
     Content-Type: text/plain\n\
     \n\
     Hello there.\n"
        .to_string()
}

/// Message B: calendar notification whose own addresses match nothing, but
/// whose event organizer is in the allowlist.
fn calendar_message(sender: &str) -> String {
    format!(
        "From calendar-notification@google.com Mon Oct 14 22:06:00 2013\n\
         Message-ID: <b@mail>\n\
         Date: Mon, 14 Oct 2013 21:00:00 +0000\n\
         From: calendar-notification@google.com\n\
         To: nobody@notallowed.com\n\
         Sender: {sender}\n\
         Subject: Invitation: Planning\n\
         Content-Type: multipart/alternative; boundary=\"BOUND\"\n\
         \n\
         --BOUND\n\
         Content-Type: text/plain; charset=UTF-8\n\
         \n\
         You have been invited to Planning.\n\
         --BOUND\n\
         Content-Type: text/calendar; method=REQUEST\n\
         Content-Transfer-Encoding: base64\n\
         \n\
         {}\n\
         --BOUND--\n",
        BASE64.encode(ICS)
    )
}

struct Run {
    mbox: PathBuf,
    mail_out: PathBuf,
    meeting_out: PathBuf,
    service: FilterService,
}

fn setup(dir: &Path, mbox_content: &str, allowed: &str) -> Run {
    let mbox = dir.join("backup.mbox");
    fs::write(&mbox, mbox_content).unwrap();
    let accounts = dir.join("accounts.txt");
    fs::write(&accounts, format!("{allowed}\n")).unwrap();
    Run {
        mail_out: dir.join("backup.mbox.mail.csv"),
        meeting_out: dir.join("backup.mbox.meeting.csv"),
        mbox,
        service: FilterService::new(load_allowlist(&accounts).unwrap()),
    }
}

impl Run {
    fn execute(&self, configure: impl FnOnce(&mut FilterOptions)) -> (String, String) {
        let mut options = FilterOptions::new(self.mbox.clone());
        configure(&mut options);
        self.service.run(&options).unwrap();
        (
            fs::read_to_string(&self.mail_out).unwrap(),
            fs::read_to_string(&self.meeting_out).unwrap(),
        )
    }
}

#[test]
fn end_to_end_scenario_retains_by_from_and_by_organizer() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "{}{}",
        plain_message(),
        calendar_message("calendar-notification-noreply@google.com")
    );
    let run = setup(dir.path(), &content, "allowed.com");
    let (mail, meetings) = run.execute(|_| {});

    // Message A via its from domain; message B as a whole unit via its
    // meeting's organizer domain, even though B's own from/to match nothing.
    let mail_rows: Vec<&str> = mail.lines().collect();
    assert_eq!(mail_rows.len(), 2);
    assert!(mail_rows[0].contains("a@mail"));
    assert!(mail_rows[0].contains("2013-10-14T20:00"));
    assert!(mail_rows[1].contains("b@mail"));

    let meeting_rows: Vec<&str> = meetings.lines().collect();
    assert_eq!(meeting_rows.len(), 1);
    assert_eq!(
        meeting_rows[0],
        "planning-1@calendar^2013-10-15T09:00^2013-10-15T10:00^Planning^HQ^boss@allowed.com^nobody@notallowed.com"
    );
}

#[test]
fn dropped_message_contributes_no_rows_at_all() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "{}{}",
        plain_message(),
        calendar_message("calendar-notification-noreply@google.com")
    );
    // Nothing matches "unrelated.zz", so both streams stay empty.
    let run = setup(dir.path(), &content, "unrelated.zz");
    let (mail, meetings) = run.execute(|options| options.emit_headers = true);
    assert!(mail.is_empty(), "no rows and no header for zero retained");
    assert!(meetings.is_empty());
}

#[test]
fn header_rows_are_emitted_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "{}{}{}",
        plain_message(),
        plain_message(),
        calendar_message("calendar-notification-noreply@google.com")
    );
    let run = setup(dir.path(), &content, "allowed.com");
    let (mail, meetings) = run.execute(|options| options.emit_headers = true);

    let mail_rows: Vec<&str> = mail.lines().collect();
    assert_eq!(mail_rows.len(), 4, "one header + three data rows");
    assert!(mail_rows[0].starts_with("messageId^date^to^from^contentType^"));
    assert_eq!(mail.matches("messageId^").count(), 1);

    let meeting_rows: Vec<&str> = meetings.lines().collect();
    assert_eq!(meeting_rows.len(), 2, "one header + one data row");
    assert_eq!(
        meeting_rows[0],
        "uid^start^end^summary^location^organizer^attendees"
    );
}

#[test]
fn reruns_are_byte_identical_with_headers_off() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "{}{}",
        plain_message(),
        calendar_message("calendar-notification-noreply@google.com")
    );
    let run = setup(dir.path(), &content, "allowed.com");
    let first = run.execute(|_| {});
    let second = run.execute(|_| {});
    assert_eq!(first, second);
}

#[test]
fn max_message_bound_stops_early_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!("{}{}{}", plain_message(), plain_message(), plain_message());
    let run = setup(dir.path(), &content, "allowed.com");
    let (mail, _) = run.execute(|options| options.max_messages = 1);
    assert_eq!(mail.lines().count(), 1);
}

#[test]
fn non_notification_sender_never_yields_meetings() {
    let dir = tempfile::tempdir().unwrap();
    // Same calendar body, but the sender lacks the notification prefix. The
    // message is still retained (from-domain match against google.com).
    let content = calendar_message("human-operator@google.com");
    let run = setup(dir.path(), &content, "google.com");
    let (mail, meetings) = run.execute(|_| {});
    assert_eq!(mail.lines().count(), 1);
    assert!(meetings.is_empty());
}
