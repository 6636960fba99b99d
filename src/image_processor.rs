use crate::archive::{build_archive, ArchiveSink};
use crate::batch::{validate_batch_size, MediaBatch};
use crate::compression::{ImageCompressionOptions, ImageCompressor, TargetSizeCompressor};
use crate::constants::IMAGE_ARCHIVE_NAME;
use crate::error::Result;
use crate::formats::{detect_image_format, image_mime_type};
use crate::media::{MediaItem, SourceFile};
use crate::state::{BusyIndicator, Lifecycle, ProcessorState};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Batch image processor.
///
/// Uploads are all-or-nothing: if any file of an upload fails to compress,
/// none of that upload's files are added and the processor enters the
/// `Error` state. The video processor instead skips failing files.
pub struct ImageProcessor<C: ImageCompressor = TargetSizeCompressor> {
    compressor: C,
    options: ImageCompressionOptions,
    batch: MediaBatch,
    lifecycle: Lifecycle,
}

impl ImageProcessor<TargetSizeCompressor> {
    pub fn with_default_compressor(options: ImageCompressionOptions) -> Self {
        Self::new(TargetSizeCompressor, options)
    }
}

impl<C: ImageCompressor> ImageProcessor<C> {
    pub fn new(compressor: C, options: ImageCompressionOptions) -> Self {
        Self {
            compressor,
            options,
            batch: MediaBatch::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn batch(&self) -> &MediaBatch {
        &self.batch
    }

    pub fn state(&self) -> &ProcessorState {
        self.lifecycle.state()
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.state().is_busy()
    }

    /// Handle reporting whether a batch is in flight, readable from any thread.
    pub fn busy_indicator(&self) -> BusyIndicator {
        self.lifecycle.indicator()
    }

    pub fn options(&self) -> &ImageCompressionOptions {
        &self.options
    }

    /// Compresses every file and appends the results together once all of
    /// them completed. Returns the number of items added.
    pub fn upload(&mut self, files: Vec<SourceFile>) -> Result<usize> {
        validate_batch_size(files.len())?;
        self.lifecycle.begin_batch()?;

        let start_time = Instant::now();
        info!(files = files.len(), "starting image batch");

        let outcome = self.compress_all(&files);
        self.lifecycle.settle(&outcome);

        match outcome {
            Ok(items) => {
                let added = items.len();
                self.batch.append(items);
                info!(added, elapsed = ?start_time.elapsed(), "image batch complete");
                Ok(added)
            }
            Err(e) => {
                error!(error = %e, "image batch failed, no files added");
                Err(e)
            }
        }
    }

    fn compress_all(&self, files: &[SourceFile]) -> Result<Vec<MediaItem>> {
        if self.options.parallelize {
            files.par_iter().map(|file| self.compress_one(file)).collect()
        } else {
            files.iter().map(|file| self.compress_one(file)).collect()
        }
    }

    fn compress_one(&self, file: &SourceFile) -> Result<MediaItem> {
        let compressed = self.compressor.compress(file, &self.options)?;
        let mime = detect_image_format(&file.name, &compressed)
            .map(image_mime_type)
            .unwrap_or("application/octet-stream");
        MediaItem::new(&file.name, &file.name, compressed, mime, file.size())
    }

    pub fn remove(&mut self, index: usize) -> Result<MediaItem> {
        self.batch.remove(index)
    }

    /// Clears every item and any error left by a failed upload.
    pub fn reset(&mut self) {
        self.batch.clear();
        self.lifecycle.clear_error();
    }

    /// Builds `images.zip` from the current items and hands it to `sink`.
    pub fn download_archive(&self, sink: &dyn ArchiveSink) -> Result<PathBuf> {
        let archive = build_archive(&self.batch.archive_entries())?;
        let path = sink.save(&archive, IMAGE_ARCHIVE_NAME)?;
        info!(path = %path.display(), entries = self.batch.len(), "image archive saved");
        Ok(path)
    }
}
