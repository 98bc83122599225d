//! Label rendering
//!
//! Plays the layout engine's draw commands into a `pdf_core::PdfDocument`,
//! one page per recipient. Unit conversion happens here: the engine works in
//! millimeters, the PDF backend in points.

use crate::engine::{compute_pages, TextMeasurer};
use crate::schema::{DrawCommand, LabelJob};
use crate::Result;
use pdf_core::{Align, Color, FontFamily, FontFamilyBuilder, FontWeight, PdfDocument};
use std::collections::HashMap;
use std::path::Path;

/// Points per millimeter
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Millimeters per point
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// The single font family used on labels
const FONT_FAMILY: &str = "sarabun";

/// Stroke width of the stamp box border, in points
const STAMP_BORDER_PT: f64 = 0.6;

/// Text measurement backed by real font metrics
///
/// Parses its own copy of the faces so the layout engine can measure without
/// touching the document being built.
pub struct FontMeasurer {
    family: FontFamily,
}

impl FontMeasurer {
    /// Parse measurement faces from TTF bytes
    pub fn new(regular_ttf: &[u8], bold_ttf: Option<&[u8]>) -> Result<Self> {
        let mut builder = FontFamilyBuilder::new().regular(regular_ttf.to_vec());
        if let Some(data) = bold_ttf {
            builder = builder.bold(data.to_vec());
        }

        Ok(Self {
            family: builder.build("measure")?,
        })
    }
}

impl TextMeasurer for FontMeasurer {
    fn width_mm(&self, text: &str, size_pt: f32, bold: bool) -> f64 {
        let weight = if bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        };
        self.family
            .variant(weight)
            .text_width_points(text, size_pt) as f64
            * PT_TO_MM
    }
}

/// Renders a [`LabelJob`] to a PDF
///
/// Holds the font bytes and any logo images keyed by the `sourceRef` values
/// jobs refer to.
pub struct LabelRenderer {
    regular_font: Vec<u8>,
    bold_font: Option<Vec<u8>>,
    logos: HashMap<String, Vec<u8>>,
}

impl LabelRenderer {
    /// Create a renderer with the regular TTF face
    pub fn new(regular_font: Vec<u8>) -> Self {
        Self {
            regular_font,
            bold_font: None,
            logos: HashMap::new(),
        }
    }

    /// Add a bold TTF face. Without one, bold text falls back to the regular
    /// face.
    pub fn with_bold(mut self, bold_font: Vec<u8>) -> Self {
        self.bold_font = Some(bold_font);
        self
    }

    /// Attach logo image bytes (PNG or JPEG) under a source reference
    pub fn attach_logo(&mut self, source_ref: impl Into<String>, bytes: Vec<u8>) {
        self.logos.insert(source_ref.into(), bytes);
    }

    /// Render the job to PDF bytes, one page per recipient
    pub fn render(&self, job: &LabelJob) -> Result<Vec<u8>> {
        let measurer = FontMeasurer::new(&self.regular_font, self.bold_font.as_deref())?;

        let mut doc = PdfDocument::new();
        let mut builder = FontFamilyBuilder::new().regular(self.regular_font.clone());
        if let Some(bold) = &self.bold_font {
            builder = builder.bold(bold.clone());
        }
        doc.register_font_family(FONT_FAMILY, builder)?;
        doc.set_text_color(Color::black());

        let geometry = job.paper.metrics().geometry;
        let pages = compute_pages(
            job.paper,
            &job.sender,
            &job.recipients,
            &job.stamp,
            &job.greeting,
            &job.logo,
            &measurer,
        );

        for commands in pages {
            let page = doc.add_page(geometry.width_mm * MM_TO_PT, geometry.height_mm * MM_TO_PT);
            self.play(&mut doc, page, &commands)?;
        }

        Ok(doc.to_bytes()?)
    }

    /// Render the job and write the PDF to a file
    pub fn render_to_file<P: AsRef<Path>>(&self, job: &LabelJob, path: P) -> Result<()> {
        let bytes = self.render(job)?;
        std::fs::write(path, bytes).map_err(pdf_core::PdfError::from)?;
        Ok(())
    }

    /// Play one page of draw commands into the document
    fn play(&self, doc: &mut PdfDocument, page: usize, commands: &[DrawCommand]) -> Result<()> {
        for command in commands {
            match command {
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    size_pt,
                    bold,
                } => {
                    doc.set_font(FONT_FAMILY, *size_pt)?;
                    doc.set_font_weight(if *bold {
                        FontWeight::Bold
                    } else {
                        FontWeight::Regular
                    })?;
                    doc.insert_text(text, page, x * MM_TO_PT, y * MM_TO_PT, Align::Left)?;
                }
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    doc.stroke_rect(
                        page,
                        x * MM_TO_PT,
                        y * MM_TO_PT,
                        width * MM_TO_PT,
                        height * MM_TO_PT,
                        STAMP_BORDER_PT,
                    )?;
                }
                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    source_ref,
                } => {
                    // A missing or undecodable logo degrades to a page
                    // without it, never a failed render.
                    if let Some(bytes) = self.logos.get(source_ref) {
                        let _ = doc.insert_image(
                            bytes,
                            page,
                            x * MM_TO_PT,
                            y * MM_TO_PT,
                            width * MM_TO_PT,
                            height * MM_TO_PT,
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
