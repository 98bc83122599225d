//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Stream};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    // JPEG starts with FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG starts with 89 50 4E 47 0D 0A 1A 0A
    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// Image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Width/height ratio; 1.0 for degenerate zero-height data
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// Get image dimensions without fully decoding
pub fn get_dimensions(data: &[u8]) -> Result<ImageDimensions> {
    match detect_format(data)? {
        ImageFormat::Jpeg => {
            let info = get_jpeg_info(data)?;
            Ok(ImageDimensions {
                width: info.width,
                height: info.height,
            })
        }
        ImageFormat::Png => get_png_dimensions(data),
    }
}

/// JPEG info including dimensions and color components
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Parse JPEG dimensions and component count from the SOF marker
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    // SOF segment: marker (2) + length (2) + precision (1) + height (2) +
    // width (2) + components (1: 1=grayscale, 3=RGB/YCbCr)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // SOF markers (baseline, progressive, etc.), excluding DHT/JPG/DAC
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let num_components = data[i + 9];
            return Ok(JpegInfo {
                width,
                height,
                num_components,
            });
        }

        if i + 4 < data.len() {
            let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            if length < 2 {
                break;
            }
            i += 2 + length;
        } else {
            break;
        }
    }

    Err(PdfError::ImageError(
        "Could not parse JPEG info".to_string(),
    ))
}

/// Read PNG dimensions from the IHDR chunk
fn get_png_dimensions(data: &[u8]) -> Result<ImageDimensions> {
    if data.len() < 24 {
        return Err(PdfError::ImageError("PNG data too short".to_string()));
    }

    if &data[12..16] != b"IHDR" {
        return Err(PdfError::ImageError(
            "Invalid PNG: IHDR not found".to_string(),
        ));
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);

    Ok(ImageDimensions { width, height })
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: String,
    /// Raw image data (compressed)
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Create an XObject from JPEG or PNG bytes, detected by magic bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// Create XObject from JPEG data
    ///
    /// JPEG images can be embedded directly with the DCTDecode filter.
    fn from_jpeg(data: &[u8]) -> Result<Self> {
        let info = get_jpeg_info(data)?;

        let color_space = if info.num_components == 1 {
            "DeviceGray".to_string()
        } else {
            "DeviceRGB".to_string()
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space,
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        })
    }

    /// Create XObject from PNG data
    ///
    /// PNG images are decoded and re-encoded with FlateDecode. Alpha channels
    /// are blended with a white background, which matches how the labels are
    /// printed on white stock.
    fn from_png(data: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let dims = decoder.dimensions();
        let color_type = decoder.color_type();

        let image = DynamicImage::from_decoder(decoder)?;

        let (raw_data, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                let gray = image.to_luma8();
                (gray.into_raw(), "DeviceGray".to_string())
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = image.to_luma_alpha8();
                let mut gray_data = Vec::with_capacity((dims.0 * dims.1) as usize);
                for pixel in la.pixels() {
                    let alpha = pixel[1] as f32 / 255.0;
                    let gray = (pixel[0] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                    gray_data.push(gray);
                }
                (gray_data, "DeviceGray".to_string())
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = image.to_rgba8();
                let mut rgb_data = Vec::with_capacity((dims.0 * dims.1 * 3) as usize);
                for pixel in rgba.pixels() {
                    let alpha = pixel[3] as f32 / 255.0;
                    let r = (pixel[0] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                    let g = (pixel[1] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                    let b = (pixel[2] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                    rgb_data.push(r);
                    rgb_data.push(g);
                    rgb_data.push(b);
                }
                (rgb_data, "DeviceRGB".to_string())
            }
            _ => {
                let rgb = image.to_rgb8();
                (rgb.into_raw(), "DeviceRGB".to_string())
            }
        };

        // Compress with FlateDecode (zlib)
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw_data)?;
        let data = encoder.finish()?;

        Ok(Self {
            width: dims.0,
            height: dims.1,
            color_space,
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data,
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

/// Generate PDF operators for drawing an image XObject
///
/// # Arguments
/// * `resource_name` - XObject resource name (e.g., "Im1")
/// * `x` - X coordinate of the lower-left corner in points (PDF coordinates)
/// * `y` - Y coordinate of the lower-left corner in points (PDF coordinates)
/// * `width` - Display width in points
/// * `height` - Display height in points
pub fn generate_image_operators(
    resource_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("q\n");
    ops.push_str(&format!("{width} 0 0 {height} {x} {y} cm\n"));
    ops.push_str(&format!("/{resource_name} Do\n"));
    ops.push_str("Q\n");

    ops.into_bytes()
}
