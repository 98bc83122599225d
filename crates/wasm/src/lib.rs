//! WASM bindings for thlabel
//!
//! This crate provides a JavaScript-friendly API for:
//! - Parsing pasted sender/recipient text into records
//! - Loading fonts and a logo image
//! - Rendering a label job to PDF bytes
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { LabelDocument, parseSender, parseRecipients } from 'thlabel-wasm';
//!
//! await init();
//!
//! const doc = new LabelDocument();
//! doc.loadFont(regularTtfBytes);
//! doc.loadBoldFont(boldTtfBytes);
//! const aspectRatio = doc.setLogo(logoPngBytes);
//!
//! const job = {
//!   paper: 'a4-landscape',
//!   sender: parseSender(senderText),
//!   recipients: parseRecipients(recipientsText),
//!   stamp: { enabled: true, text: stampText },
//!   greeting: { text: 'เรียน', position: 'left' },
//!   logo: { enabled: true, sourceRef: 'logo', aspectRatio },
//! };
//!
//! const pdfBytes = doc.render(job);
//! ```

use label_data::{parse_recipients as parse_recipients_impl, parse_sender as parse_sender_impl};
use layout::{LabelJob, LabelRenderer};
use wasm_bindgen::prelude::*;

/// The source reference under which the loaded logo is attached
const LOGO_REF: &str = "logo";

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Parse sender text (6 lines) into a sender record
///
/// @param text - Pasted sender text
/// @returns Sender record object
#[wasm_bindgen(js_name = parseSender)]
pub fn parse_sender(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&parse_sender_impl(text)).map_err(into_js_error)
}

/// Parse recipient text (4 lines per block) into recipient records
///
/// Falls back to the built-in example set when no complete block parses.
///
/// @param text - Pasted recipient text
/// @returns Array of recipient records
#[wasm_bindgen(js_name = parseRecipients)]
pub fn parse_recipients(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&parse_recipients_impl(text)).map_err(into_js_error)
}

/// Label PDF builder holding font and logo bytes between renders
#[wasm_bindgen]
pub struct LabelDocument {
    regular_font: Option<Vec<u8>>,
    bold_font: Option<Vec<u8>>,
    logo: Option<Vec<u8>>,
}

#[wasm_bindgen]
impl LabelDocument {
    /// Create an empty builder
    #[wasm_bindgen(constructor)]
    pub fn new() -> LabelDocument {
        LabelDocument {
            regular_font: None,
            bold_font: None,
            logo: None,
        }
    }

    /// Load the regular TTF face
    ///
    /// @param data - TTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, data: &[u8]) {
        self.regular_font = Some(data.to_vec());
    }

    /// Load the bold TTF face
    ///
    /// @param data - TTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadBoldFont)]
    pub fn load_bold_font(&mut self, data: &[u8]) {
        self.bold_font = Some(data.to_vec());
    }

    /// Load the logo image and return its width/height aspect ratio
    ///
    /// @param data - PNG or JPEG bytes (Uint8Array)
    /// @returns Aspect ratio for the job's logo settings
    #[wasm_bindgen(js_name = setLogo)]
    pub fn set_logo(&mut self, data: &[u8]) -> Result<f64, JsValue> {
        let dims = pdf_core::image::get_dimensions(data)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.logo = Some(data.to_vec());
        Ok(dims.aspect_ratio())
    }

    /// Drop the loaded logo
    #[wasm_bindgen(js_name = clearLogo)]
    pub fn clear_logo(&mut self) {
        self.logo = None;
    }

    /// Render a label job to PDF bytes, one page per recipient
    ///
    /// @param job - Job object (see crate docs for the shape)
    /// @returns PDF bytes (Uint8Array)
    pub fn render(&self, job: JsValue) -> Result<Vec<u8>, JsValue> {
        let regular = self
            .regular_font
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No font loaded. Call loadFont() first."))?;

        let job: LabelJob = serde_wasm_bindgen::from_value(job).map_err(into_js_error)?;

        let mut renderer = LabelRenderer::new(regular.clone());
        if let Some(bold) = &self.bold_font {
            renderer = renderer.with_bold(bold.clone());
        }
        if let Some(logo) = &self.logo {
            renderer.attach_logo(LOGO_REF, logo.clone());
        }

        renderer
            .render(&job)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for LabelDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn into_js_error(e: serde_wasm_bindgen::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}
