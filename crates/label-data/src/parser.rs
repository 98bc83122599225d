//! Pasted-text parsing
//!
//! The editor accepts free text pasted from spreadsheets or documents. Lines
//! are trimmed, blank lines dropped, and fields are taken positionally. The
//! decoders are total: malformed input degrades to empty fields or to the
//! built-in example set, never to an error.

use crate::records::{RecipientRecord, SenderRecord, RECIPIENT_LINES_PER_BLOCK};
use crate::samples::example_recipients;

/// Parse sender text (6 lines, positional)
///
/// Lines beyond the sixth are ignored; missing lines become empty fields.
pub fn parse_sender(input: &str) -> SenderRecord {
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let field = |i: usize| lines.get(i).copied().unwrap_or_default().to_string();

    SenderRecord {
        document_number: field(0),
        organization: field(1),
        institution: field(2),
        address_line1: field(3),
        address_line2: field(4),
        postal_code: field(5),
    }
}

/// Parse recipient text (4 lines per block)
///
/// Blank lines are dropped before grouping, so blocks may be separated by
/// any number of empty lines. Only complete blocks whose first line (the
/// title) is non-empty are kept. When nothing parses, the built-in example
/// set is returned so a render always has at least one page.
pub fn parse_recipients(input: &str) -> Vec<RecipientRecord> {
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut recipients = Vec::new();

    for block in lines.chunks(RECIPIENT_LINES_PER_BLOCK) {
        if block.len() == RECIPIENT_LINES_PER_BLOCK && !block[0].is_empty() {
            recipients.push(RecipientRecord {
                title: block[0].to_string(),
                address: block[1].to_string(),
                province: block[2].to_string(),
                postal_code: block[3].to_string(),
            });
        }
    }

    if recipients.is_empty() {
        example_recipients()
    } else {
        recipients
    }
}

/// Render a sender record back to its 6-line text form
pub fn sender_to_text(sender: &SenderRecord) -> String {
    sender.lines().join("\n")
}

/// Render recipient records back to text, blocks separated by a blank line
pub fn recipients_to_text(recipients: &[RecipientRecord]) -> String {
    recipients
        .iter()
        .map(|r| r.lines().join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
