//! Record types for envelope labels

use serde::{Deserialize, Serialize};

/// Number of lines in the sender block
pub const SENDER_LINES: usize = 6;

/// Number of lines per pasted recipient block
pub const RECIPIENT_LINES_PER_BLOCK: usize = 4;

/// Return-address data, one shared instance per document.
///
/// Field order matches the pasted-text line order. Absent lines stay empty;
/// an empty field still occupies its line on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SenderRecord {
    /// Document/reference number, rendered bold on the first line
    pub document_number: String,
    /// Sending unit
    pub organization: String,
    /// Institution the unit belongs to
    pub institution: String,
    /// Street address
    pub address_line1: String,
    /// District and province
    pub address_line2: String,
    /// Postal code
    pub postal_code: String,
}

impl SenderRecord {
    /// The six lines in render order
    pub fn lines(&self) -> [&str; SENDER_LINES] {
        [
            &self.document_number,
            &self.organization,
            &self.institution,
            &self.address_line1,
            &self.address_line2,
            &self.postal_code,
        ]
    }
}

/// Destination-address data; each record renders as one output page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipientRecord {
    /// Addressee name or office title
    pub title: String,
    /// Street address
    pub address: String,
    /// Province
    pub province: String,
    /// Postal code, rendered with extra separation before it
    pub postal_code: String,
}

impl RecipientRecord {
    /// The four lines in render order
    pub fn lines(&self) -> [&str; RECIPIENT_LINES_PER_BLOCK] {
        [
            &self.title,
            &self.address,
            &self.province,
            &self.postal_code,
        ]
    }
}
