//! Label Layout - page layout engine and PDF rendering
//!
//! This crate provides:
//! - The label job schema (paper profile, sender/recipient records,
//!   stamp/greeting/logo settings)
//! - A pure layout engine that turns one recipient into absolute-positioned
//!   draw commands, with text measurement injected as a trait
//! - A renderer that plays draw commands into a `pdf_core::PdfDocument`,
//!   one page per recipient
//!
//! # Example
//!
//! ```ignore
//! use layout::{LabelJob, LabelRenderer};
//!
//! let job = LabelJob::from_json(job_json)?;
//! let renderer = LabelRenderer::new(std::fs::read("THSarabunNew.ttf")?)
//!     .with_bold(std::fs::read("THSarabunNew Bold.ttf")?);
//! let pdf_bytes = renderer.render(&job)?;
//! ```

mod engine;
mod renderer;
mod schema;

pub use engine::{compute_page, compute_pages, TextMeasurer};
pub use renderer::{FontMeasurer, LabelRenderer, MM_TO_PT, PT_TO_MM};
pub use schema::*;

use thiserror::Error;

/// Errors that can occur while parsing a job or rendering it to PDF
///
/// Layout computation itself is total and has no error states; only the
/// boundaries (JSON in, PDF out) can fail.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to parse job: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
