//! PDF Document builder

use crate::font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
use crate::graphics::generate_rect_operators;
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A buffered text operation for deferred encoding
///
/// Text is buffered during rendering and encoded during save, after fonts
/// have been subsetted.
#[derive(Debug, Clone)]
struct BufferedTextOp {
    /// The text to render
    text: String,
    /// Font variant name (e.g., "sarabun-bold")
    font_name: String,
    /// Font resource name (e.g., "F1")
    font_resource_name: String,
    /// Page number (1-indexed)
    page: usize,
    /// X coordinate (in PDF coordinates, alignment already applied)
    x: f64,
    /// Y coordinate (in PDF coordinates, from bottom)
    y: f64,
    /// Font size in points
    font_size: f32,
    /// Text color
    color: Color,
}

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF document builder providing high-level page, text, image, and
/// rectangle operations over lopdf.
///
/// Pages are created with [`add_page`](Self::add_page) and addressed by
/// 1-indexed page number. Y coordinates passed to the insertion methods are
/// measured from the top of the page and flipped into PDF coordinates
/// internally.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Object id of the page-tree node (written at save time)
    pages_id: ObjectId,
    /// Page object ids, in page order
    page_ids: Vec<ObjectId>,
    /// Content stream object ids, one per page
    content_ids: Vec<ObjectId>,
    /// Page sizes in points (width, height)
    page_sizes: Vec<(f64, f64)>,
    /// Registered font families
    families: HashMap<String, FontFamily>,
    /// Current font family name
    current_family: Option<String>,
    /// Current font weight
    current_weight: FontWeight,
    /// Current font size in points
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Embedded fonts (variant name -> PDF object id)
    embedded_fonts: HashMap<String, ObjectId>,
    /// Page font resources (page number -> variant name -> resource name)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Embedded images (data hash -> PDF object id)
    embedded_images: HashMap<u64, ObjectId>,
    /// Page image resources (page number -> resource name -> object id)
    page_image_resources: HashMap<usize, HashMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Buffered content operators per page
    content_buffers: HashMap<usize, Vec<u8>>,
    /// Buffered text operations (encoded during save after subsetting)
    text_ops: Vec<BufferedTextOp>,
}

impl PdfDocument {
    /// Create an empty document (catalog + page tree, no pages yet)
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");
        let pages_id = inner.new_object_id();
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            pages_id,
            page_ids: Vec::new(),
            content_ids: Vec::new(),
            page_sizes: Vec::new(),
            families: HashMap::new(),
            current_family: None,
            current_weight: FontWeight::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            embedded_fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            page_image_resources: HashMap::new(),
            next_image_resource: 1,
            content_buffers: HashMap::new(),
            text_ops: Vec::new(),
        }
    }

    /// Add a page with the given size in points
    ///
    /// # Returns
    /// The new page number (1-indexed)
    pub fn add_page(&mut self, width_pt: f64, height_pt: f64) -> usize {
        let content_id = self
            .inner
            .add_object(Object::Stream(Stream::new(Dictionary::new(), Vec::new())));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt as f32),
                Object::Real(height_pt as f32),
            ]),
            "Contents" => content_id,
        });

        self.page_ids.push(page_id);
        self.content_ids.push(content_id);
        self.page_sizes.push((width_pt, height_pt));

        self.page_ids.len()
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Register a font family with its variants
    ///
    /// # Example
    /// ```ignore
    /// doc.register_font_family("sarabun",
    ///     FontFamilyBuilder::new()
    ///         .regular(std::fs::read("THSarabunNew.ttf")?)
    ///         .bold(std::fs::read("THSarabunNew Bold.ttf")?),
    /// )?;
    /// ```
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        if self.families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let family = builder.build(name)?;
        self.families.insert(name.to_string(), family);

        Ok(())
    }

    /// Set the current font family and size
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.families.contains_key(family) {
            return Err(PdfError::FontNotFound(family.to_string()));
        }

        self.current_family = Some(family.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Set the font weight (keeps current family/size)
    pub fn set_font_weight(&mut self, weight: FontWeight) -> Result<()> {
        if self.current_family.is_none() {
            return Err(PdfError::FontNotFound("No font family set".to_string()));
        }

        self.current_weight = weight;
        Ok(())
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Measure text width in points with the current font and size
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let variant_name = self.current_variant_name()?;
        let font = self.font_data(&variant_name)?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `align` - Text alignment
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        // Nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let variant_name = self.current_variant_name()?;

        // Track characters for subsetting
        self.font_data_mut(&variant_name)?.add_chars(text);

        let text_width = {
            let font = self.font_data(&variant_name)?;
            font.text_width_points(text, self.current_font_size) as f64
        };

        // Convert from top-origin to PDF bottom-origin
        let page_height = self.page_sizes[page - 1].1;
        let pdf_y = page_height - y;

        let start_x = match align {
            Align::Left => x,
            Align::Center => x - (text_width / 2.0),
            Align::Right => x - text_width,
        };

        let font_resource_name = self.font_resource_name(&variant_name, page);

        self.text_ops.push(BufferedTextOp {
            text: text.to_string(),
            font_name: variant_name,
            font_resource_name,
            page,
            x: start_x,
            y: pdf_y,
            font_size: self.current_font_size,
            color: self.current_text_color,
        });

        Ok(())
    }

    /// Stroke a rectangle outline
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate of the top-left corner in points
    /// * `y` - Y coordinate of the top-left corner in points (from top)
    /// * `width` - Rectangle width in points
    /// * `height` - Rectangle height in points
    /// * `line_width` - Stroke width in points
    pub fn stroke_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    ) -> Result<()> {
        self.check_page(page)?;

        let page_height = self.page_sizes[page - 1].1;
        let pdf_y = page_height - y - height;

        let operators = generate_rect_operators(x, pdf_y, width, height, line_width);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Insert an image at a specific position
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Display width in points
    /// * `height` - Display height in points
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.check_page(page)?;

        let image_resource_name = self.image_resource_name(data, page)?;

        let page_height = self.page_sizes[page - 1].1;
        let pdf_y = page_height - y - height;

        let operators = generate_image_operators(&image_resource_name, x, pdf_y, width, height);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finish()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finish()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Run the save pipeline: subset fonts, encode buffered text, flush
    /// content streams, embed fonts, and write page resources and page tree.
    fn finish(&mut self) -> Result<()> {
        self.subset_fonts()?;
        self.encode_buffered_text()?;
        self.flush_content_buffers();
        self.embed_fonts()?;
        self.finalize_page_resources()?;
        self.finalize_page_tree();
        Ok(())
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.page_ids.len() {
            return Err(PdfError::InvalidPage(page, self.page_ids.len()));
        }
        Ok(())
    }

    /// Variant name for the current family and weight
    fn current_variant_name(&self) -> Result<String> {
        let family_name = self
            .current_family
            .as_ref()
            .ok_or_else(|| PdfError::FontNotFound("No font family set".to_string()))?;

        let family = self
            .families
            .get(family_name)
            .ok_or_else(|| PdfError::FontNotFound(family_name.clone()))?;

        Ok(family.variant_name(family_name, self.current_weight))
    }

    /// Get font data by variant name
    fn font_data(&self, name: &str) -> Result<&FontData> {
        for family in self.families.values() {
            for variant in [Some(&family.regular), family.bold.as_ref()]
                .into_iter()
                .flatten()
            {
                if variant.name == name {
                    return Ok(variant);
                }
            }
        }

        Err(PdfError::FontNotFound(name.to_string()))
    }

    /// Get mutable font data by variant name
    fn font_data_mut(&mut self, name: &str) -> Result<&mut FontData> {
        for family in self.families.values_mut() {
            for variant in [Some(&mut family.regular), family.bold.as_mut()]
                .into_iter()
                .flatten()
            {
                if variant.name == name {
                    return Ok(variant);
                }
            }
        }

        Err(PdfError::FontNotFound(name.to_string()))
    }

    /// Get or assign the content-stream resource name for a font on a page
    fn font_resource_name(&mut self, font_name: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(font_name) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Get or assign the content-stream resource name for an image on a page
    ///
    /// Images are deduplicated across pages by a hash of their bytes.
    fn image_resource_name(&mut self, data: &[u8], page: usize) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if !self.embedded_images.contains_key(&data_hash) {
            let xobject = ImageXObject::from_bytes(data)?;
            let object_id = self.inner.add_object(xobject.to_pdf_stream());
            self.embedded_images.insert(data_hash, object_id);
        }

        let object_id = self.embedded_images[&data_hash];
        let page_resources = self.page_image_resources.entry(page).or_default();

        for (name, id) in page_resources.iter() {
            if *id == object_id {
                return Ok(name.clone());
            }
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        Ok(resource_name)
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.content_buffers
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Create subsets for all fonts that have been used
    fn subset_fonts(&mut self) -> Result<()> {
        for family in self.families.values_mut() {
            for font in [Some(&mut family.regular), family.bold.as_mut()]
                .into_iter()
                .flatten()
            {
                if !font.used_chars.is_empty() {
                    font.create_subset()?;
                }
            }
        }

        Ok(())
    }

    /// Encode buffered text operations into the page content buffers
    fn encode_buffered_text(&mut self) -> Result<()> {
        let text_ops: Vec<BufferedTextOp> = std::mem::take(&mut self.text_ops);

        for op in text_ops {
            let (text_hex, text_width) = {
                let font = self.font_data(&op.font_name)?;
                (
                    font.encode_text_hex(&op.text),
                    font.text_width_points(&op.text, op.font_size) as f64,
                )
            };

            let ctx = TextRenderContext {
                font_name: op.font_resource_name,
                font_size: op.font_size,
                text_width,
                color: op.color,
            };

            // Alignment was applied when the op was buffered
            let operators = generate_text_operators(&text_hex, op.x, op.y, Align::Left, &ctx);
            self.buffer_content(op.page, &operators);
        }

        Ok(())
    }

    /// Write buffered operators into each page's content stream object
    fn flush_content_buffers(&mut self) {
        let buffers: Vec<(usize, Vec<u8>)> = self.content_buffers.drain().collect();

        for (page, content) in buffers {
            let stream_id = self.content_ids[page - 1];
            self.inner
                .objects
                .insert(stream_id, Object::Stream(Stream::new(Dictionary::new(), content)));
        }
    }

    /// Embed all used fonts into the PDF
    fn embed_fonts(&mut self) -> Result<()> {
        let mut font_names: Vec<String> = Vec::new();

        for family in self.families.values() {
            for font in [Some(&family.regular), family.bold.as_ref()]
                .into_iter()
                .flatten()
            {
                if !font.used_chars.is_empty() {
                    font_names.push(font.name.clone());
                }
            }
        }

        font_names.sort();
        font_names.dedup();

        for font_name in font_names {
            self.embed_font_object(&font_name)?;
        }

        Ok(())
    }

    /// Embed a single font object into the PDF
    fn embed_font_object(&mut self, font_name: &str) -> Result<ObjectId> {
        let font_objects = self.font_data(font_name)?.to_pdf_objects()?;

        let font_file_id = self.inner.add_object(font_objects.font_file_stream);

        let mut font_descriptor = font_objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = self.inner.add_object(font_descriptor);

        let mut cid_font = font_objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = self.inner.add_object(cid_font);

        let mut type0_font = font_objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );

        let tounicode_id = self.inner.add_object(font_objects.tounicode_stream);
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        let type0_font_id = self.inner.add_object(type0_font);

        self.embedded_fonts
            .insert(font_name.to_string(), type0_font_id);

        Ok(type0_font_id)
    }

    /// Write each page's Resources dictionary (fonts and images)
    fn finalize_page_resources(&mut self) -> Result<()> {
        for page in 1..=self.page_ids.len() {
            let mut resources = Dictionary::new();

            if let Some(fonts) = self.page_font_resources.get(&page) {
                let mut font_dict = Dictionary::new();
                for (font_name, resource_name) in fonts {
                    let font_ref = self
                        .embedded_fonts
                        .get(font_name)
                        .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
                    font_dict.set(resource_name.as_bytes(), Object::Reference(*font_ref));
                }
                resources.set("Font", Object::Dictionary(font_dict));
            }

            if let Some(images) = self.page_image_resources.get(&page) {
                let mut xobject_dict = Dictionary::new();
                for (resource_name, object_id) in images {
                    xobject_dict.set(resource_name.as_bytes(), Object::Reference(*object_id));
                }
                resources.set("XObject", Object::Dictionary(xobject_dict));
            }

            let page_id = self.page_ids[page - 1];
            if let Some(Object::Dictionary(page_dict)) = self.inner.objects.get_mut(&page_id) {
                page_dict.set("Resources", Object::Dictionary(resources));
            }
        }

        Ok(())
    }

    /// Write the page-tree node with the final Kids array and Count
    fn finalize_page_tree(&mut self) {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(self.page_ids.len() as i64),
        };
        self.inner
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_add_page() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.add_page(841.89, 595.28), 1);
        assert_eq!(doc.add_page(841.89, 595.28), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_to_bytes_produces_pdf() {
        let mut doc = PdfDocument::new();
        doc.add_page(841.89, 595.28);
        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_insert_text_without_font_fails() {
        let mut doc = PdfDocument::new();
        doc.add_page(841.89, 595.28);
        let err = doc.insert_text("x", 1, 0.0, 0.0, Align::Left).unwrap_err();
        assert!(matches!(err, PdfError::FontNotFound(_)));
    }

    #[test]
    fn test_invalid_page() {
        let mut doc = PdfDocument::new();
        let err = doc.stroke_rect(1, 0.0, 0.0, 10.0, 10.0, 0.6).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(1, 0)));
    }

    #[test]
    fn test_set_font_unknown_family() {
        let mut doc = PdfDocument::new();
        assert!(doc.set_font("missing", 12.0).is_err());
    }

    #[test]
    fn test_stroke_rect_operators_in_output() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page(841.89, 595.28);
        doc.stroke_rect(page, 10.0, 20.0, 100.0, 50.0, 0.6).unwrap();
        let bytes = doc.to_bytes().unwrap();
        assert!(contains(&bytes, b" re"));
    }

    #[test]
    fn test_insert_image_in_output() {
        use std::io::Cursor;
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let mut doc = PdfDocument::new();
        let page = doc.add_page(841.89, 595.28);
        doc.insert_image(&png, page, 10.0, 10.0, 50.0, 50.0).unwrap();
        let bytes = doc.to_bytes().unwrap();
        assert!(contains(&bytes, b"/Im1 Do"));
    }

    #[test]
    fn test_image_deduplicated_across_pages() {
        use std::io::Cursor;
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let mut doc = PdfDocument::new();
        let p1 = doc.add_page(841.89, 595.28);
        let p2 = doc.add_page(841.89, 595.28);
        doc.insert_image(&png, p1, 0.0, 0.0, 10.0, 10.0).unwrap();
        doc.insert_image(&png, p2, 0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(doc.embedded_images.len(), 1);
    }
}
