//! Font handling for PDF documents

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::HashSet;

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font data structure for embedded fonts
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters used (for subsetting)
    pub used_chars: HashSet<char>,
    /// Parsed font face
    face: Option<ttf_parser::Face<'static>>,
    /// Subsetted TTF data, produced at save time
    subset: Option<Vec<u8>>,
}

/// PDF objects generated for font embedding
pub struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

/// A font family with a regular face and an optional bold face
#[derive(Debug, Clone)]
pub struct FontFamily {
    /// Regular variant (required)
    pub regular: FontData,
    /// Bold variant
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// Get the font data for the requested weight.
    /// Bold falls back to regular when no bold face was registered.
    pub fn variant(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            FontWeight::Regular => &self.regular,
        }
    }

    /// Internal font name for the variant (for PDF resource naming)
    pub fn variant_name(&self, family_name: &str, weight: FontWeight) -> String {
        match weight {
            FontWeight::Bold if self.bold.is_some() => format!("{family_name}-bold"),
            _ => format!("{family_name}-regular"),
        }
    }
}

/// Builder for registering font families
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self {
            regular: None,
            bold: None,
        }
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let regular = match self.regular {
            Some(ttf_data) => FontData::from_ttf(&format!("{family_name}-regular"), &ttf_data)?,
            None => {
                return Err(PdfError::FontParseError(
                    "FontFamily must have at least a regular variant".to_string(),
                ))
            }
        };

        let bold = self
            .bold
            .map(|data| FontData::from_ttf(&format!("{family_name}-bold"), &data))
            .transpose()?;

        Ok(FontFamily { regular, bold })
    }
}

impl Default for FontFamilyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Font identifier
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let data = ttf_data.to_vec();

        // The face borrows the data for the document lifetime, so the copy is
        // leaked to obtain a 'static slice. Fonts are loaded once per document.
        let static_data: &'static [u8] = Box::leak(data.clone().into_boxed_slice());

        let face = ttf_parser::Face::parse(static_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: data,
            used_chars: HashSet::new(),
            face: Some(face),
            subset: None,
        })
    }

    /// Add characters to the used set (for subsetting)
    pub fn add_chars(&mut self, text: &str) {
        for c in text.chars() {
            self.used_chars.insert(c);
        }
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face
            .as_ref()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Get glyph advance width
    pub fn glyph_advance(&self, c: char) -> Option<u16> {
        self.face.as_ref().and_then(|face| {
            let glyph_id = face.glyph_index(c)?;
            face.glyph_hor_advance(glyph_id)
        })
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face
            .as_ref()
            .map(|face| face.units_per_em())
            .unwrap_or(1000)
    }

    /// Get font ascender
    pub fn ascender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.ascender())
            .unwrap_or(800)
    }

    /// Get font descender
    pub fn descender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.descender())
            .unwrap_or(-200)
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph_advance(c))
            .map(|w| w as u32)
            .sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text);
        let units_per_em = self.units_per_em() as f32;
        (width as f32 / units_per_em) * font_size
    }

    /// Create a subset containing only the glyphs that were used
    ///
    /// Glyph IDs are preserved by the PDF subsetting profile, so text encoded
    /// with `encode_text_hex` stays valid against the subsetted font file.
    pub fn create_subset(&mut self) -> Result<()> {
        if self.used_chars.is_empty() {
            return Ok(());
        }

        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c))
            .collect();
        gids.push(0); // .notdef
        gids.sort();
        gids.dedup();

        let profile = subsetter::Profile::pdf(&gids);
        let data = subsetter::subset(&self.ttf_data, 0, profile)
            .map_err(|e| PdfError::FontSubsetError(e.to_string()))?;
        self.subset = Some(data);

        Ok(())
    }

    /// Font file bytes to embed: the subset if one was created, else the full font
    fn embeddable_data(&self) -> &[u8] {
        self.subset.as_deref().unwrap_or(&self.ttf_data)
    }

    /// Generate all PDF objects needed to embed this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let font_name = Object::Name(self.name.clone().into());

        // Generate ToUnicode CMap
        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", "CMap".into()),
                ("Length", Object::Integer(tounicode_content.len() as i64)),
            ]),
            tounicode_content.as_bytes().to_vec(),
        );

        // Generate font file stream
        let embed_data = self.embeddable_data().to_vec();
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", "FontDescriptor".into()),
                ("Subtype", "TrueType".into()),
                ("Length1", Object::Integer(embed_data.len() as i64)),
            ]),
            embed_data,
        );

        // Generate font descriptor
        let units_per_em = self.units_per_em() as i64;
        let ascender = self.ascender() as i64;
        let descender = self.descender() as i64;

        let font_bbox = vec![
            Object::Integer(0),
            Object::Integer(descender),
            Object::Integer(units_per_em),
            Object::Integer(ascender),
        ];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()), // Symbolic font
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", Object::Integer(ascender)),
            ("Descent", Object::Integer(descender)),
            ("CapHeight", Object::Integer(ascender)),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))), // Placeholder, set when embedding
        ]);

        // Generate widths array
        let widths_array = self.generate_widths_array();

        // Generate CIDFont Type2 dictionary
        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", "Adobe".into()),
            ("Ordering", "Identity".into()),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))), // Placeholder, set when embedding
            ("W", widths_array.into()),
            ("DW", 1000.into()),
        ]);

        // Generate Type0 font dictionary
        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()),
            ("ToUnicode", Object::Reference((0, 0))),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Encode text as hex string for PDF Tj operator (Identity-H, GID = CID)
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::new();
        for c in text.chars() {
            let gid = self.glyph_id(c).unwrap_or(0);
            result.push_str(&format!("{gid:04X}"));
        }
        format!("<{result}>")
    }

    /// Generate /W array for glyph widths
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let face = match &self.face {
            Some(f) => f,
            None => return widths,
        };

        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c))
            .collect();
        gids.sort();
        gids.dedup();

        // Individual mapping format: [gid1 [width1] gid2 [width2] ...].
        // Less compact than ranges but correct for any GID distribution.
        for gid in gids {
            let glyph_id = ttf_parser::GlyphId(gid);
            let advance = face.glyph_hor_advance(glyph_id).unwrap_or(1000);
            widths.push(Object::Integer(gid as i64));
            widths.push(vec![Object::Integer(advance as i64)].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");

        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mut char_list: Vec<char> = self.used_chars.iter().copied().collect();
        char_list.sort_by_key(|c| *c as u32);

        if !char_list.is_empty() {
            // PDF spec recommends limiting bfchar sections to 100 entries
            for chunk in char_list.chunks(100) {
                cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
                for c in chunk {
                    let gid = self.glyph_id(*c).unwrap_or(0);
                    let unicode = *c as u32;
                    cmap.push_str(&format!("<{gid:04X}> <{unicode:04X}>\n"));
                }
                cmap.push_str("endbfchar\n");
            }
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}
