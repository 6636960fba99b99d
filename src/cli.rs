use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "media-squeeze",
    about = "Compress batches of images or videos and bundle them into a zip archive",
    long_about = "media-squeeze compresses a batch of images towards a target file size, or transcodes \
                  a batch of videos to 720p MP4 with ffmpeg, and writes the results as a single zip \
                  archive (images.zip or media.zip) into an output directory.",
    version,
    after_help = "EXAMPLES:\n  \
    media-squeeze images a.png b.jpg -o ./out\n  \
    media-squeeze images ./photos -r -o ./out --target-size-kb 150\n  \
    media-squeeze videos \"./clips/*.mov\" -o ./out --bitrate 800k"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print per-file details")]
    pub verbose: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    #[arg(
        required = true,
        help = "Input files, directories, or glob patterns",
        long_help = "Each input can be a file, a directory, or a glob expression. \
                     Only files of the matching media kind are picked up."
    )]
    pub inputs: Vec<String>,

    #[arg(short = 'o', long, help = "Directory the archive is written to")]
    pub output: PathBuf,

    #[arg(short = 'r', long, help = "Process subdirectories recursively")]
    pub recursive: bool,

    #[arg(
        short = 'j',
        long,
        help = "Number of parallel threads (default: auto)",
        long_help = "Number of threads for parallel batch processing. \
                     If not specified, uses number of CPU cores."
    )]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a batch of images into images.zip",
        long_about = "Compress every image towards a target size, shrinking anything larger than \
                      the maximum dimension, then bundle the results into images.zip. \
                      If any image fails, nothing is written."
    )]
    Images {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Target size per image in KiB (default: 200)")]
        target_size_kb: Option<u64>,

        #[arg(long, help = "Maximum width or height in pixels (default: 1920)")]
        max_dimension: Option<u32>,

        #[arg(long, help = "Compress images one at a time")]
        no_parallel: bool,
    },

    #[command(
        about = "Transcode a batch of videos into media.zip",
        long_about = "Transcode every video with ffmpeg (scaled, bitrate capped, re-muxed to MP4) \
                      and bundle the results into media.zip. Videos that fail are skipped."
    )]
    Videos {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value = "ffmpeg", help = "ffmpeg binary to use")]
        ffmpeg: PathBuf,

        #[arg(long, help = "Video bitrate cap, e.g. 1M or 800k (default: 1M)")]
        bitrate: Option<String>,

        #[arg(long, help = "Output width in pixels (default: 1280)")]
        width: Option<u32>,

        #[arg(long, help = "Output height in pixels (default: 720)")]
        height: Option<u32>,
    },
}
