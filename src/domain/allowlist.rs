//! Organization domain allowlist and the message retention rule.
//!
//! Entries are compared literally (no lowercasing, no scheme stripping) against
//! domains extracted from addresses. Loaded once, immutable for the run.

use crate::domain::MessageRecord;
use std::collections::HashSet;

/// The domain part of an email address: everything after the first `@`.
/// Returns None for strings with no `@`.
pub fn email_domain(address: &str) -> Option<&str> {
    address.splitn(2, '@').nth(1)
}

/// Read-only set of retained domains, shared across all messages of a run.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    domains: HashSet<String>,
}

impl Allowlist {
    pub fn new(domains: HashSet<String>) -> Self {
        Self { domains }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    fn matches_address(&self, address: &str) -> bool {
        email_domain(address).is_some_and(|d| self.contains_domain(d))
    }

    /// Keep/drop decision for a whole message.
    ///
    /// First match wins among `from ++ destinations`. Failing that, a message
    /// with meetings is kept if any meeting's attendee or organizer domain is
    /// allowed (organizer checked last; an absent organizer contributes no
    /// domain). A dropped message contributes no rows to either output stream.
    pub fn retains(&self, message: &MessageRecord) -> bool {
        if message
            .from
            .iter()
            .chain(message.destinations.iter())
            .any(|a| self.matches_address(a))
        {
            return true;
        }

        message.meetings.iter().any(|meeting| {
            meeting
                .attendees
                .iter()
                .chain(meeting.organizer.iter())
                .any(|a| self.matches_address(a))
        })
    }
}

impl FromIterator<String> for Allowlist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MeetingRecord;

    fn allowlist(domains: &[&str]) -> Allowlist {
        domains.iter().map(|d| d.to_string()).collect()
    }

    fn message(from: &[&str], to: &[&str]) -> MessageRecord {
        let to: Vec<String> = to.iter().map(|s| s.to_string()).collect();
        MessageRecord {
            from: from.iter().map(|s| s.to_string()).collect(),
            destinations: to.clone(),
            to,
            ..Default::default()
        }
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("user@example.com"), Some("example.com"));
        assert_eq!(email_domain("a@b@c"), Some("b@c"));
        assert_eq!(email_domain("no-at-sign"), None);
    }

    #[test]
    fn test_comparison_is_literal() {
        let list = allowlist(&["Example.com"]);
        assert!(!list.contains_domain("example.com"));
        assert!(list.contains_domain("Example.com"));
    }

    #[test]
    fn test_retains_via_from_domain() {
        let list = allowlist(&["allowed.com"]);
        let msg = message(&["user@allowed.com"], &["other@elsewhere.net"]);
        assert!(list.retains(&msg));
    }

    #[test]
    fn test_retains_via_destination_domain() {
        let list = allowlist(&["allowed.com"]);
        let msg = message(&["user@elsewhere.net"], &["other@allowed.com"]);
        assert!(list.retains(&msg));
    }

    #[test]
    fn test_drops_when_no_domain_matches() {
        let list = allowlist(&["allowed.com"]);
        let msg = message(&["user@elsewhere.net"], &["other@elsewhere.net"]);
        assert!(!list.retains(&msg));
    }

    #[test]
    fn test_retains_via_meeting_organizer() {
        let list = allowlist(&["allowed.com"]);
        let mut msg = message(&["user@elsewhere.net"], &["other@elsewhere.net"]);
        msg.meetings.push(MeetingRecord {
            organizer: Some("boss@allowed.com".into()),
            ..Default::default()
        });
        assert!(list.retains(&msg));
    }

    #[test]
    fn test_retains_via_meeting_attendee() {
        let list = allowlist(&["allowed.com"]);
        let mut msg = message(&["user@elsewhere.net"], &[]);
        msg.meetings.push(MeetingRecord {
            attendees: vec!["guest@allowed.com".into()],
            ..Default::default()
        });
        assert!(list.retains(&msg));
    }

    #[test]
    fn test_absent_organizer_is_skipped() {
        let list = allowlist(&["allowed.com"]);
        let mut msg = message(&["user@elsewhere.net"], &[]);
        msg.meetings.push(MeetingRecord {
            organizer: None,
            attendees: vec!["guest@elsewhere.net".into()],
            ..Default::default()
        });
        assert!(!list.retains(&msg));
    }

    #[test]
    fn test_address_without_domain_never_matches() {
        let list = allowlist(&["allowed.com"]);
        let msg = message(&["not-an-address"], &[]);
        assert!(!list.retains(&msg));
    }
}
