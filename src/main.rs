use anyhow::{bail, Context, Result};
use clap::Parser;
use media_squeeze::cli::{Args, Commands, InputArgs};
use media_squeeze::logger::{init_logging, is_quiet};
use media_squeeze::utils::{calculate_compression_ratio, create_progress_spinner, format_file_size};
use media_squeeze::{
    collect_media_files, DirectorySink, FfmpegEngine, ImageCompressionOptions, ImageProcessor,
    MediaBatch, MediaKind, SourceFile, TranscodeOptions, VideoProcessor,
};
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    match args.command {
        Commands::Images {
            input,
            target_size_kb,
            max_dimension,
            no_parallel,
        } => {
            setup_thread_pool(input.threads);
            let options = ImageCompressionOptions::new(
                target_size_kb.map(|kb| kb.saturating_mul(1024)),
                max_dimension,
                !no_parallel,
            )?;
            let files = read_inputs(&input, MediaKind::Image)?;
            let mut processor = ImageProcessor::with_default_compressor(options);

            let spinner = create_progress_spinner(
                &format!("Compressing {} images...", files.len()),
                is_quiet(),
            );
            let uploaded = processor.upload(files);
            spinner.finish_and_clear();
            uploaded.context("image batch failed, no archive written")?;

            print_summary(processor.batch());
            let path = processor.download_archive(&DirectorySink::new(&input.output))?;
            report(&format!("📦 Archive written to {}", path.display()));
        }
        Commands::Videos {
            input,
            ffmpeg,
            bitrate,
            width,
            height,
        } => {
            setup_thread_pool(input.threads);
            let options = TranscodeOptions::new(bitrate, width, height)?;
            let files = read_inputs(&input, MediaKind::Video)?;
            let total = files.len();

            let mut processor = VideoProcessor::new(FfmpegEngine::new(ffmpeg), options);
            processor
                .load_engine()
                .context("could not start ffmpeg, is it installed?")?;

            let spinner =
                create_progress_spinner(&format!("Transcoding {} videos...", total), is_quiet());
            let uploaded = processor.upload(files);
            spinner.finish_and_clear();
            let added = uploaded?;

            if added < total {
                warn!("{} of {} videos failed and were skipped", total - added, total);
            }
            if added == 0 {
                bail!("no video could be transcoded");
            }

            print_summary(processor.batch());
            let spinner = create_progress_spinner("Building media.zip...", is_quiet());
            let saved = processor.download_archive(&DirectorySink::new(&input.output));
            spinner.finish_and_clear();
            report(&format!("📦 Archive written to {}", saved?.display()));
        }
    }

    Ok(())
}

fn setup_thread_pool(threads: Option<usize>) {
    let num_threads = threads.unwrap_or_else(num_cpus::get);
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        warn!("failed to set thread pool size: {}", e);
    }
}

fn read_inputs(input: &InputArgs, kind: MediaKind) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for pattern in &input.inputs {
        for path in collect_media_files(pattern, kind, input.recursive)? {
            debug!(path = %path.display(), "selected");
            files.push(
                SourceFile::from_path(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
            );
        }
    }

    if files.is_empty() {
        bail!("no {} files found in {:?}", kind, input.inputs);
    }
    Ok(files)
}

fn print_summary(batch: &MediaBatch) {
    if is_quiet() {
        return;
    }

    println!("\n📊 Batch summary:");
    for (index, item) in batch.iter().enumerate() {
        println!(
            "  {:>3}. {} → {} ({} → {})",
            index + 1,
            item.original_name,
            item.output_name,
            format_file_size(item.original_size),
            format_file_size(item.processed_size()),
        );
        debug!(preview = item.preview().uri(), "preview");
    }

    let before = batch.total_original_size();
    let after = batch.total_processed_size();
    println!("  📁 Files: {}", batch.len());
    println!(
        "  🎯 Total: {} → {} ({:.1}% smaller)",
        format_file_size(before),
        format_file_size(after),
        calculate_compression_ratio(before, after)
    );
}

fn report(message: &str) {
    if !is_quiet() {
        println!("{}", message);
    }
}
