use crate::error::{MediaError, Result};
use crate::validation::validate_input_path;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// A selected input file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        validate_input_path(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MediaError::UnsupportedMedia(format!("{:?} has no file name", path)))?;
        let bytes = fs::read(path)?;
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Displayable reference to processed content.
///
/// The bytes live in a temporary file for as long as the preview is alive;
/// dropping the preview deletes the file and invalidates the URI.
#[derive(Debug)]
pub struct Preview {
    file: NamedTempFile,
    uri: String,
}

impl Preview {
    pub fn create(bytes: &[u8], extension: Option<&str>) -> Result<Self> {
        let suffix = extension.map(|ext| format!(".{}", ext)).unwrap_or_default();
        let mut file = Builder::new()
            .prefix("media-squeeze-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        let uri = format!("file://{}", file.path().display());
        Ok(Self { file, uri })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// One processed file, owned by a [`crate::batch::MediaBatch`].
#[derive(Debug)]
pub struct MediaItem {
    /// Name the file was selected under; also its archive entry name.
    pub original_name: String,
    /// Name of the processed output (`clip.mp4` for `clip.mov`). Only used
    /// for the preview's extension and in summaries.
    pub output_name: String,
    pub processed: Vec<u8>,
    pub mime_type: String,
    pub original_size: u64,
    preview: Preview,
}

impl MediaItem {
    pub fn new(
        original_name: impl Into<String>,
        output_name: impl Into<String>,
        processed: Vec<u8>,
        mime_type: impl Into<String>,
        original_size: u64,
    ) -> Result<Self> {
        let output_name = output_name.into();
        let extension = Path::new(&output_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        let preview = Preview::create(&processed, extension.as_deref())?;

        Ok(Self {
            original_name: original_name.into(),
            output_name,
            processed,
            mime_type: mime_type.into(),
            original_size,
            preview,
        })
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn processed_size(&self) -> u64 {
        self.processed.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_file_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.png");
        fs::write(&path, b"png bytes").unwrap();

        let source = SourceFile::from_path(&path).unwrap();
        assert_eq!(source.name, "a.png");
        assert_eq!(source.bytes, b"png bytes");
        assert_eq!(source.size(), 9);
    }

    #[test]
    fn test_source_file_from_missing_path() {
        let result = SourceFile::from_path(Path::new("missing.png"));
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }

    #[test]
    fn test_preview_holds_content_until_dropped() {
        let preview = Preview::create(b"abc", Some("mp4")).unwrap();
        let path = preview.path().to_path_buf();

        assert!(preview.uri().starts_with("file://"));
        assert!(preview.uri().ends_with(".mp4"));
        assert_eq!(fs::read(&path).unwrap(), b"abc");

        drop(preview);
        assert!(!path.exists());
    }

    #[test]
    fn test_media_item_preview_matches_archive_extension() {
        let item = MediaItem::new("clip.mov", "clip.mp4", vec![1, 2, 3], "video/mp4", 10).unwrap();
        assert_eq!(item.processed_size(), 3);
        assert!(item.preview().uri().ends_with(".mp4"));
        assert_eq!(fs::read(item.preview().path()).unwrap(), vec![1, 2, 3]);
    }
}
