//! Label Data - address records for envelope labels
//!
//! This crate provides:
//! - The sender record (6 lines) and recipient record (4 lines per block)
//! - Parsing of pasted multi-line text into records, positional by line
//! - A built-in example record set used as the fallback when pasted text
//!   yields nothing usable
//!
//! # Example
//!
//! ```
//! use label_data::{parse_recipients, parse_sender};
//!
//! let sender = parse_sender("ที่ อว 0601.01/ว 252\nกองบริหารงานทั่วไป");
//! assert_eq!(sender.document_number, "ที่ อว 0601.01/ว 252");
//! assert_eq!(sender.postal_code, "");
//!
//! let recipients = parse_recipients("นายสมชาย ใจดี\n123/45 หมู่ 6 ตำบลบางพูด\nจังหวัดนนทบุรี\n11120");
//! assert_eq!(recipients.len(), 1);
//! ```

mod parser;
mod records;
mod samples;

pub use parser::{parse_recipients, parse_sender, recipients_to_text, sender_to_text};
pub use records::{RecipientRecord, SenderRecord, RECIPIENT_LINES_PER_BLOCK, SENDER_LINES};
pub use samples::{example_recipients, example_sender, DEFAULT_GREETING, DEFAULT_STAMP_TEXT};
