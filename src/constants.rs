/// 0.2 MiB (209 715 bytes), the size the image compressor aims to stay under.
pub const DEFAULT_TARGET_SIZE_BYTES: u64 = (0.2 * 1024.0 * 1024.0) as u64;
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;

pub const JPEG_START_QUALITY: u8 = 90;
pub const JPEG_QUALITY_STEP: u8 = 10;
pub const JPEG_MIN_QUALITY: u8 = 10;
pub const MAX_COMPRESSION_ITERATIONS: usize = 10;
/// Each shrink pass keeps this share of the previous dimensions.
pub const SHRINK_FACTOR: f64 = 0.9;
pub const MIN_SHRINK_DIMENSION: u32 = 16;

pub const PNG_OPTIMIZATION_PRESET: u8 = 4;
pub const LIBDEFLATER_LEVEL: u8 = 12;

pub const DEFAULT_VIDEO_BITRATE: &str = "1M";
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;
pub const VIDEO_OUTPUT_EXTENSION: &str = "mp4";
pub const VIDEO_OUTPUT_MIME: &str = "video/mp4";
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";
/// Bytes of ffmpeg stderr kept in an `EngineRun` error.
pub const ENGINE_STDERR_TAIL: usize = 2048;

pub const IMAGE_ARCHIVE_NAME: &str = "images.zip";
pub const VIDEO_ARCHIVE_NAME: &str = "media.zip";

pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;
pub const MAX_BATCH_FILES: usize = 10_000;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif", "gif", "avif",
];
pub const SUPPORTED_VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "wmv", "flv", "mpeg", "mpg", "3gp", "ts",
];

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
