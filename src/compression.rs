use crate::constants::{
    DEFAULT_MAX_DIMENSION, DEFAULT_TARGET_SIZE_BYTES, JPEG_MIN_QUALITY, JPEG_QUALITY_STEP,
    JPEG_START_QUALITY, LIBDEFLATER_LEVEL, MAX_COMPRESSION_ITERATIONS, MIN_SHRINK_DIMENSION,
    PNG_OPTIMIZATION_PRESET, SHRINK_FACTOR,
};
use crate::error::{MediaError, Result};
use crate::formats::detect_image_format;
use crate::media::SourceFile;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use oxipng::{Deflaters, Options};
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCompressionOptions {
    pub target_size_bytes: u64,
    pub max_dimension: u32,
    /// Compress the files of a batch on the rayon pool instead of one by one.
    pub parallelize: bool,
}

impl Default for ImageCompressionOptions {
    fn default() -> Self {
        Self {
            target_size_bytes: DEFAULT_TARGET_SIZE_BYTES,
            max_dimension: DEFAULT_MAX_DIMENSION,
            parallelize: true,
        }
    }
}

impl ImageCompressionOptions {
    pub fn new(
        target_size_bytes: Option<u64>,
        max_dimension: Option<u32>,
        parallelize: bool,
    ) -> Result<Self> {
        let target_size_bytes = target_size_bytes.unwrap_or(DEFAULT_TARGET_SIZE_BYTES);
        if target_size_bytes == 0 {
            return Err(MediaError::InvalidOptions(
                "target size must be greater than zero".to_string(),
            ));
        }

        let max_dimension = max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION);
        if max_dimension == 0 {
            return Err(MediaError::InvalidOptions(
                "max dimension must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            target_size_bytes,
            max_dimension,
            parallelize,
        })
    }
}

/// The engine the image processor delegates compression to.
pub trait ImageCompressor: Send + Sync {
    fn compress(&self, file: &SourceFile, options: &ImageCompressionOptions) -> Result<Vec<u8>>;
}

/// Compresses towards a byte budget: fit the dimension limit, then lower
/// JPEG quality, then shrink until the encoding fits or iterations run out.
#[derive(Debug, Clone, Default)]
pub struct TargetSizeCompressor;

impl ImageCompressor for TargetSizeCompressor {
    fn compress(&self, file: &SourceFile, options: &ImageCompressionOptions) -> Result<Vec<u8>> {
        let format = detect_image_format(&file.name, &file.bytes)?;
        let mut img = image::load_from_memory_with_format(&file.bytes, format)?;

        let within_budget = file.size() <= options.target_size_bytes;
        if within_budget && fits_within(&img, options.max_dimension) {
            debug!(file = %file.name, "already within target, keeping original bytes");
            return Ok(file.bytes.clone());
        }

        resize_to_fit(&mut img, options.max_dimension);

        let mut quality = JPEG_START_QUALITY;
        let mut best = encode_image(&img, format, quality)?;

        for iteration in 0..MAX_COMPRESSION_ITERATIONS {
            if best.len() as u64 <= options.target_size_bytes {
                break;
            }

            if format == ImageFormat::Jpeg && quality > JPEG_MIN_QUALITY {
                quality = quality.saturating_sub(JPEG_QUALITY_STEP).max(JPEG_MIN_QUALITY);
            } else if !shrink(&mut img) {
                break;
            }

            let candidate = encode_image(&img, format, quality)?;
            debug!(
                file = %file.name,
                iteration,
                quality,
                bytes = candidate.len(),
                "compression pass"
            );
            if candidate.len() < best.len() {
                best = candidate;
            }
        }

        Ok(best)
    }
}

fn fits_within(img: &DynamicImage, max_dimension: u32) -> bool {
    let (width, height) = img.dimensions();
    width.max(height) <= max_dimension
}

/// Scale down so the longest side is at most `max_dimension`, preserving
/// the aspect ratio. Smaller images are left untouched.
pub fn resize_to_fit(img: &mut DynamicImage, max_dimension: u32) {
    if !fits_within(img, max_dimension) {
        *img = img.resize(max_dimension, max_dimension, FilterType::Lanczos3);
    }
}

/// Returns false once the image is too small to shrink further.
fn shrink(img: &mut DynamicImage) -> bool {
    let (width, height) = img.dimensions();
    let new_width = (width as f64 * SHRINK_FACTOR).round() as u32;
    let new_height = (height as f64 * SHRINK_FACTOR).round() as u32;
    if new_width < MIN_SHRINK_DIMENSION || new_height < MIN_SHRINK_DIMENSION {
        return false;
    }
    *img = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    true
}

/// Encode `img` in `format`. `quality` only applies to JPEG.
pub fn encode_image(img: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)?;
        }
        ImageFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

            let mut oxipng_options = Options::from_preset(PNG_OPTIMIZATION_PRESET);
            oxipng_options.deflate = Deflaters::Libdeflater {
                compression: LIBDEFLATER_LEVEL,
            };
            buf = oxipng::optimize_from_memory(&buf, &oxipng_options)
                .map_err(|e| MediaError::PngOptimization(e.to_string()))?;
        }
        ImageFormat::WebP => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP)?;
        }
        other => {
            img.write_to(&mut Cursor::new(&mut buf), other)?;
        }
    }

    Ok(buf)
}
