//! PDF Core - Low-level PDF generation
//!
//! This crate provides functionality for:
//! - Building PDF documents page by page
//! - Embedding TrueType fonts (subsetted at save time)
//! - Inserting text at specific coordinates, with glyph-metric measurement
//! - Stroking rectangles
//! - Inserting images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, FontFamilyBuilder, PdfDocument};
//!
//! let mut doc = PdfDocument::new();
//! doc.register_font_family(
//!     "sarabun",
//!     FontFamilyBuilder::new().regular(include_bytes!("fonts/THSarabunNew.ttf").to_vec()),
//! )?;
//! let page = doc.add_page(841.89, 595.28);
//! doc.set_font("sarabun", 18.0)?;
//! doc.insert_text("สวัสดี", page, 56.0, 120.0, Align::Left)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
pub mod image;
mod text;

pub use document::{Color, PdfDocument};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
pub use graphics::generate_rect_operators;
pub use image::ImageXObject;
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Font subset error: {0}")]
    FontSubsetError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
