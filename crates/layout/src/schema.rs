//! Label job schema types

use crate::Result;
use label_data::{RecipientRecord, SenderRecord, DEFAULT_GREETING};
use serde::{Deserialize, Serialize};

/// Page size and margin in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl PageGeometry {
    /// Width, height, margin all positive and the margin leaves usable space
    pub fn is_valid(&self) -> bool {
        self.width_mm > 0.0
            && self.height_mm > 0.0
            && self.margin_mm > 0.0
            && self.margin_mm < self.width_mm.min(self.height_mm) / 2.0
    }
}

/// Paper preset selecting a geometry and its layout metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperProfile {
    /// A4 landscape, 297 x 210 mm, 20 mm margin
    #[default]
    #[serde(rename = "a4-landscape")]
    A4Landscape,
    /// Custom envelope, 235 x 108 mm landscape, 10 mm margin
    #[serde(rename = "envelope-108x235")]
    Envelope108x235,
}

/// Layout constants for one paper profile
///
/// All lengths in millimeters, font sizes in points. The recipient anchor is
/// expressed as page-size fractions so the block sits left of center and
/// just past the vertical midline on either profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMetrics {
    pub geometry: PageGeometry,
    /// First sender baseline, below the top margin
    pub sender_top_offset: f64,
    pub sender_line_spacing: f64,
    pub sender_size_pt: f32,
    /// Logo height when no custom height is given
    pub logo_default_height: f64,
    /// Vertical gap between logo bottom and the first sender baseline
    pub logo_gap: f64,
    pub stamp_size_pt: f32,
    pub stamp_padding_x: f64,
    pub stamp_padding_y: f64,
    pub stamp_line_spacing: f64,
    /// How far the stamp box is pulled above the nominal top margin
    pub stamp_rise: f64,
    /// First stamp baseline below the box's top padding
    pub stamp_first_baseline: f64,
    pub recipient_fx: f64,
    pub recipient_fy: f64,
    pub recipient_line_spacing: f64,
    pub recipient_size_pt: f32,
    /// Gap between the greeting and the recipient detail column
    pub greeting_gap: f64,
    /// Fixed offset of the postal line below the first recipient baseline.
    /// Deliberately larger than 3x the line spacing.
    pub postal_offset: f64,
}

const A4_LANDSCAPE: ProfileMetrics = ProfileMetrics {
    geometry: PageGeometry {
        width_mm: 297.0,
        height_mm: 210.0,
        margin_mm: 20.0,
    },
    sender_top_offset: 42.0,
    sender_line_spacing: 8.0,
    sender_size_pt: 18.0,
    logo_default_height: 20.5,
    logo_gap: 8.0,
    stamp_size_pt: 14.0,
    stamp_padding_x: 3.0,
    stamp_padding_y: 1.5,
    stamp_line_spacing: 7.0,
    stamp_rise: 5.0,
    stamp_first_baseline: 3.5,
    recipient_fx: 0.30,
    recipient_fy: 0.60,
    recipient_line_spacing: 12.0,
    recipient_size_pt: 26.0,
    greeting_gap: 8.0,
    postal_offset: 39.0,
};

const ENVELOPE_108X235: ProfileMetrics = ProfileMetrics {
    geometry: PageGeometry {
        width_mm: 235.0,
        height_mm: 108.0,
        margin_mm: 10.0,
    },
    sender_top_offset: 15.0,
    sender_line_spacing: 6.0,
    sender_size_pt: 14.0,
    logo_default_height: 12.0,
    logo_gap: 5.0,
    stamp_size_pt: 12.0,
    stamp_padding_x: 2.5,
    stamp_padding_y: 1.2,
    stamp_line_spacing: 5.5,
    stamp_rise: 3.0,
    stamp_first_baseline: 3.0,
    recipient_fx: 0.35,
    recipient_fy: 0.55,
    recipient_line_spacing: 8.0,
    recipient_size_pt: 20.0,
    greeting_gap: 6.0,
    postal_offset: 26.0,
};

impl PaperProfile {
    /// Layout constants for this profile
    pub fn metrics(self) -> &'static ProfileMetrics {
        match self {
            PaperProfile::A4Landscape => &A4_LANDSCAPE,
            PaperProfile::Envelope108x235 => &ENVELOPE_108X235,
        }
    }
}

/// Stamp box settings, shared by every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StampSettings {
    pub enabled: bool,
    /// Permit text; newlines split the box into lines. Retained while the
    /// stamp is disabled so re-enabling restores it.
    pub text: String,
}

impl StampSettings {
    /// The text the layout sees: empty while disabled
    pub fn effective_text(&self) -> &str {
        if self.enabled {
            &self.text
        } else {
            ""
        }
    }
}

/// Where the greeting sits relative to the recipient block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingPosition {
    /// Same row as the recipient title, which indents the detail column
    #[default]
    Left,
    /// On its own line above the recipient block
    Top,
}

/// Greeting settings, shared by every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreetingSettings {
    pub text: String,
    pub position: GreetingPosition,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_GREETING.to_string(),
            position: GreetingPosition::Left,
        }
    }
}

/// Logo settings, shared by every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoSettings {
    pub enabled: bool,
    /// Opaque handle resolved to image bytes by the renderer. Empty means no
    /// logo.
    pub source_ref: String,
    /// Width/height ratio of the source image
    pub aspect_ratio: f64,
    /// Explicit height override; the default profile height applies when
    /// absent or non-positive
    pub custom_height_mm: Option<f64>,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source_ref: String::new(),
            aspect_ratio: 1.0,
            custom_height_mm: None,
        }
    }
}

/// A complete render job: one shared sender/stamp/greeting/logo
/// configuration plus the recipient list, one page per recipient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelJob {
    pub paper: PaperProfile,
    pub sender: SenderRecord,
    pub recipients: Vec<RecipientRecord>,
    pub stamp: StampSettings,
    pub greeting: GreetingSettings,
    pub logo: LogoSettings,
}

impl LabelJob {
    /// Parse a job from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A positioned drawing instruction, the contract between the layout engine
/// and the render backend
///
/// Coordinates are in millimeters from the top-left page corner; text `y` is
/// the baseline, rectangle and image `y` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawCommand {
    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        text: String,
        size_pt: f32,
        bold: bool,
    },
    #[serde(rename_all = "camelCase")]
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        source_ref: String,
    },
}
