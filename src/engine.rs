//! Transcoding engine.
//!
//! The video processor talks to its engine through a small virtual
//! filesystem: write the input, run the engine with ffmpeg-style arguments,
//! read the output back. [`FfmpegEngine`] backs that filesystem with a
//! temporary workspace directory and runs the `ffmpeg` binary inside it.

use crate::constants::{
    DEFAULT_FFMPEG_BINARY, DEFAULT_VIDEO_BITRATE, DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH,
    ENGINE_STDERR_TAIL, VIDEO_OUTPUT_EXTENSION, VIDEO_OUTPUT_MIME,
};
use crate::error::{MediaError, Result};
use crate::utils::stderr_tail;
use crate::validation::validate_plain_file_name;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// ffmpeg bitrate notation, e.g. `1M` or `800k`.
    pub video_bitrate: String,
    pub width: u32,
    pub height: u32,
    pub output_extension: String,
    pub output_mime: String,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            width: DEFAULT_VIDEO_WIDTH,
            height: DEFAULT_VIDEO_HEIGHT,
            output_extension: VIDEO_OUTPUT_EXTENSION.to_string(),
            output_mime: VIDEO_OUTPUT_MIME.to_string(),
        }
    }
}

impl TranscodeOptions {
    pub fn new(video_bitrate: Option<String>, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let video_bitrate = video_bitrate.unwrap_or_else(|| DEFAULT_VIDEO_BITRATE.to_string());
        if !is_valid_bitrate(&video_bitrate) {
            return Err(MediaError::InvalidOptions(format!(
                "invalid bitrate {:?}, expected digits with an optional k/M suffix",
                video_bitrate
            )));
        }

        let width = width.unwrap_or(DEFAULT_VIDEO_WIDTH);
        let height = height.unwrap_or(DEFAULT_VIDEO_HEIGHT);
        if width == 0 || height == 0 {
            return Err(MediaError::InvalidOptions(format!(
                "invalid scale {}x{}",
                width, height
            )));
        }

        Ok(Self {
            video_bitrate,
            width,
            height,
            ..Self::default()
        })
    }

    /// Engine arguments transcoding `input` into `output`.
    pub fn ffmpeg_args(&self, input: &str, output: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.to_string(),
            "-b:v".to_string(),
            self.video_bitrate.clone(),
            "-vf".to_string(),
            format!("scale={}:{}", self.width, self.height),
            output.to_string(),
        ]
    }
}

fn is_valid_bitrate(bitrate: &str) -> bool {
    let digits = bitrate.trim_end_matches(['k', 'K', 'm', 'M']);
    let suffix_len = bitrate.len() - digits.len();
    !digits.is_empty() && suffix_len <= 1 && digits.chars().all(|c| c.is_ascii_digit())
}

/// A stateful transcoding service with its own virtual filesystem.
///
/// `load` must succeed before any other call. The file methods take plain
/// file names; paths are rejected.
pub trait TranscodeEngine: Send + Sync {
    fn load(&mut self) -> Result<()>;
    fn is_loaded(&self) -> bool;
    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()>;
    fn run(&self, args: &[String]) -> Result<()>;
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;
    fn remove_file(&self, name: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct FfmpegEngine {
    binary: PathBuf,
    workspace: Option<TempDir>,
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_BINARY)
    }
}

impl FfmpegEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workspace: None,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn workspace(&self) -> Result<&Path> {
        self.workspace
            .as_ref()
            .map(TempDir::path)
            .ok_or(MediaError::EngineNotLoaded)
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        validate_plain_file_name(name)?;
        Ok(self.workspace()?.join(name))
    }
}

impl TranscodeEngine for FfmpegEngine {
    fn load(&mut self) -> Result<()> {
        if self.workspace.is_some() {
            return Ok(());
        }

        let output = Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MediaError::EngineLoad(format!("{}: {}", self.binary.display(), e)))?;
        if !output.status.success() {
            return Err(MediaError::EngineLoad(format!(
                "{} -version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!(
            version = version.lines().next().unwrap_or_default(),
            "transcoding engine loaded"
        );

        let workspace = tempfile::Builder::new()
            .prefix("media-squeeze-engine-")
            .tempdir()
            .map_err(|e| MediaError::EngineLoad(format!("workspace: {}", e)))?;
        self.workspace = Some(workspace);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.workspace.is_some()
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(name)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let workspace = self.workspace()?;
        debug!(args = ?args, "running ffmpeg");

        let output = Command::new(&self.binary)
            .args(["-y", "-hide_banner", "-nostdin"])
            .args(args)
            .current_dir(workspace)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            return Err(MediaError::EngineRun {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr, ENGINE_STDERR_TAIL),
            });
        }
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        if !path.exists() {
            return Err(MediaError::FileNotFound(PathBuf::from(name)));
        }
        Ok(fs::read(path)?)
    }

    fn remove_file(&self, name: &str) -> Result<()> {
        let path = self.resolve(name)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
