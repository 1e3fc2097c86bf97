//! Message block parsing. One raw mbox block in, one MessageRecord out.
//!
//! Total: malformed input never fails, missing or unparsable fields simply
//! become absent/empty. Header lookup is case-insensitive.

use crate::adapters::mbox::calendar;
use crate::domain::MessageRecord;
use chrono::{DateTime, Utc};
use mailparse::{
    DispositionType, MailAddr, MailHeaderMap, ParsedMail, addrparse, dateparse, parse_mail,
};
use tracing::debug;

/// Parse one raw message block (headers + body) into a MessageRecord.
pub fn parse_message(block: &str) -> MessageRecord {
    let parsed = match parse_mail(block.as_bytes()) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "message block did not parse; emitting empty record");
            return MessageRecord::default();
        }
    };

    let headers = &parsed.headers;
    let to = address_list(headers.get_first_value("To"));
    let cc = address_list(headers.get_first_value("Cc"));
    let bcc = address_list(headers.get_first_value("Bcc"));
    let destinations: Vec<String> = to
        .iter()
        .chain(cc.iter())
        .chain(bcc.iter())
        .cloned()
        .collect();
    let sender = single_address(headers.get_first_value("Sender"));

    let mut record = MessageRecord {
        message_id: headers.get_first_value("Message-ID").map(strip_brackets),
        date: parse_date(headers.get_first_value("Date")),
        to,
        from: address_list(headers.get_first_value("From")),
        content_type: headers.get_first_value("Content-Type").unwrap_or_default(),
        sender,
        subject: headers.get_first_value("Subject").unwrap_or_default(),
        in_reply_to: headers.get_first_value("In-Reply-To").map(strip_brackets),
        cc,
        bcc,
        has_attachment: any_attachment(&parsed),
        destinations,
        meetings: Vec::new(),
    };
    record.meetings = calendar::extract_meetings(&parsed, record.sender.as_deref());
    record
}

/// Parse an address-list header value into bare addresses, in order.
/// Display names are stripped; an unparsable list degrades to empty.
fn address_list(value: Option<String>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match addrparse(&value) {
        Ok(list) => list
            .iter()
            .flat_map(|addr| match addr {
                MailAddr::Single(single) => vec![single.addr.clone()],
                MailAddr::Group(group) => group.addrs.iter().map(|s| s.addr.clone()).collect(),
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn single_address(value: Option<String>) -> Option<String> {
    address_list(value).into_iter().next()
}

fn parse_date(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| dateparse(&v).ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
}

/// `Message-ID`/`In-Reply-To` values are conventionally wrapped in `<...>`.
fn strip_brackets(value: String) -> String {
    value
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_string()
}

/// True iff any MIME part, at any depth, is marked as an attachment.
fn any_attachment(mail: &ParsedMail<'_>) -> bool {
    mail.subparts.iter().any(|part| {
        part.get_content_disposition().disposition == DispositionType::Attachment
            || any_attachment(part)
    })
}
