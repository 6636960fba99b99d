//! Media kind detection and format helpers
//!
//! Maps file names onto the media category they belong to, and onto the
//! image crate's formats used when re-encoding.

use crate::constants::{SUPPORTED_IMAGE_EXTENSIONS, SUPPORTED_VIDEO_EXTENSIONS};
use crate::error::{MediaError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The media category a processor accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a path by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if SUPPORTED_VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        MediaKind::from_path(path) == Some(*self)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(MediaKind::Image),
            "video" | "videos" => Ok(MediaKind::Video),
            _ => Err(MediaError::UnsupportedMedia(s.to_string())),
        }
    }
}

pub fn is_image_file(path: &Path) -> bool {
    MediaKind::Image.matches(path)
}

pub fn is_video_file(path: &Path) -> bool {
    MediaKind::Video.matches(path)
}

/// Determine the image format of a source file, preferring its name and
/// falling back to sniffing the content.
pub fn detect_image_format(name: &str, bytes: &[u8]) -> Result<ImageFormat> {
    if let Ok(format) = ImageFormat::from_path(name) {
        return Ok(format);
    }
    image::guess_format(bytes)
        .map_err(|_| MediaError::UnsupportedMedia(format!("{} is not a recognised image", name)))
}

pub fn image_mime_type(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// Name of the re-muxed output: everything from the first `.` is replaced by
/// the new extension, a name without a dot gets the extension appended.
///
/// Two edge cases differ from a plain `\..+$` substitution on purpose: a
/// leading dot does not start an extension (`.hidden` becomes `.hidden.mp4`,
/// not `.mp4`), and a trailing dot is replaced too (`clip.` becomes
/// `clip.mp4`), so the output always carries a stem and the new extension.
pub fn remux_file_name(name: &str, extension: &str) -> String {
    match name.find('.') {
        Some(0) | None => format!("{}.{}", name, extension),
        Some(idx) => format!("{}.{}", &name[..idx], extension),
    }
}
