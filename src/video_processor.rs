use crate::archive::{build_archive, ArchiveSink};
use crate::batch::{validate_batch_size, MediaBatch};
use crate::constants::VIDEO_ARCHIVE_NAME;
use crate::engine::{FfmpegEngine, TranscodeEngine, TranscodeOptions};
use crate::error::Result;
use crate::formats::remux_file_name;
use crate::media::{MediaItem, SourceFile};
use crate::state::{BusyIndicator, Lifecycle, ProcessorState};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Batch video processor.
///
/// Owns one transcoding engine for its whole lifetime. The engine is loaded
/// on the first upload (or up front through [`VideoProcessor::load_engine`])
/// and reused afterwards. Files that fail to transcode are logged and left
/// out; the rest of the upload is still added.
pub struct VideoProcessor<E: TranscodeEngine = FfmpegEngine> {
    engine: E,
    options: TranscodeOptions,
    batch: MediaBatch,
    lifecycle: Lifecycle,
}

impl<E: TranscodeEngine> VideoProcessor<E> {
    pub fn new(engine: E, options: TranscodeOptions) -> Self {
        Self {
            engine,
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

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Loads the engine unless it already is.
    pub fn load_engine(&mut self) -> Result<()> {
        if !self.engine.is_loaded() {
            info!("loading transcoding engine");
            self.engine.load()?;
        }
        Ok(())
    }

    /// Transcodes every file and appends the successful ones, in input
    /// order, once the whole upload settled. Returns the number added.
    pub fn upload(&mut self, files: Vec<SourceFile>) -> Result<usize> {
        validate_batch_size(files.len())?;
        self.lifecycle.begin_batch()?;

        if let Err(e) = self.load_engine() {
            error!(error = %e, "transcoding engine failed to load");
            let outcome: Result<()> = Err(e);
            self.lifecycle.settle(&outcome);
            return outcome.map(|_| 0);
        }

        let start_time = Instant::now();
        info!(files = files.len(), "starting video batch");

        let items: Vec<MediaItem> = files
            .par_iter()
            .enumerate()
            .filter_map(|(slot, file)| match self.transcode_one(slot, file) {
                Ok(item) => Some(item),
                Err(e) => {
                    error!(file = %file.name, error = %e, "error processing video, skipping");
                    None
                }
            })
            .collect();

        let skipped = files.len() - items.len();
        if skipped > 0 {
            warn!(skipped, "some videos were left out of the batch");
        }

        let added = items.len();
        self.batch.append(items);
        self.lifecycle.finish();
        info!(added, elapsed = ?start_time.elapsed(), "video batch complete");
        Ok(added)
    }

    fn transcode_one(&self, slot: usize, file: &SourceFile) -> Result<MediaItem> {
        let output_name = remux_file_name(&file.name, &self.options.output_extension);
        // Slot prefixes keep files of one batch apart in the shared workspace.
        let input_vfs = format!("{}-{}", slot, file.name);
        let output_vfs = format!("{}-{}", slot, output_name);

        self.engine.write_file(&input_vfs, &file.bytes)?;
        let result = self
            .engine
            .run(&self.options.ffmpeg_args(&input_vfs, &output_vfs))
            .and_then(|_| self.engine.read_file(&output_vfs));

        for name in [&input_vfs, &output_vfs] {
            if let Err(e) = self.engine.remove_file(name) {
                debug!(file = %name, error = %e, "could not remove engine file");
            }
        }

        let transcoded = result?;
        debug!(file = %file.name, bytes = transcoded.len(), "video transcoded");
        MediaItem::new(
            &file.name,
            output_name,
            transcoded,
            &self.options.output_mime,
            file.size(),
        )
    }

    pub fn remove(&mut self, index: usize) -> Result<MediaItem> {
        self.batch.remove(index)
    }

    pub fn reset(&mut self) {
        self.batch.clear();
        self.lifecycle.clear_error();
    }

    /// Builds `media.zip` and hands it to `sink`. The processor is busy while
    /// the archive is generated; afterwards it returns to the state it was in
    /// before, whatever the outcome. An export does not clear an upload error.
    pub fn download_archive(&mut self, sink: &dyn ArchiveSink) -> Result<PathBuf> {
        let previous = self.lifecycle.begin_batch()?;

        let outcome = build_archive(&self.batch.archive_entries())
            .and_then(|archive| sink.save(&archive, VIDEO_ARCHIVE_NAME));
        self.lifecycle.restore(previous);

        match &outcome {
            Ok(path) => info!(path = %path.display(), entries = self.batch.len(), "video archive saved"),
            Err(e) => error!(error = %e, "error during archive generation"),
        }
        outcome
    }
}
