pub mod archive;
pub mod batch;
pub mod cli;
pub mod compression;
pub mod constants;
pub mod engine;
pub mod error;
pub mod formats;
pub mod image_processor;
pub mod logger;
pub mod media;
pub mod state;
pub mod utils;
pub mod validation;
pub mod video_processor;

pub use archive::{build_archive, ArchiveSink, DirectorySink};
pub use batch::{collect_media_files, MediaBatch};
pub use compression::{ImageCompressionOptions, ImageCompressor, TargetSizeCompressor};
pub use engine::{FfmpegEngine, TranscodeEngine, TranscodeOptions};
pub use error::{MediaError, Result};
pub use formats::{is_image_file, is_video_file, MediaKind};
pub use image_processor::ImageProcessor;
pub use media::{MediaItem, Preview, SourceFile};
pub use state::{BusyIndicator, Lifecycle, ProcessorState};
pub use video_processor::VideoProcessor;
