use crate::error::{MediaError, Result};
use crate::validation::{prepare_output_dir, validate_plain_file_name};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a zip archive in memory from `(name, content)` entries.
///
/// When two entries share a name the later one replaces the earlier one, so
/// the archive holds one entry per distinct name at the position of the
/// first occurrence.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Err(MediaError::EmptyArchive);
    }

    let mut unique: Vec<(&str, &[u8])> = Vec::with_capacity(entries.len());
    for &(name, content) in entries {
        match unique.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = content,
            None => unique.push((name, content)),
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in unique {
        debug!(entry = name, bytes = content.len(), "adding archive entry");
        zip.start_file(name, options)?;
        zip.write_all(content)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Where a finished archive is handed off to the user.
pub trait ArchiveSink {
    fn save(&self, archive: &[u8], filename: &str) -> Result<PathBuf>;
}

/// Saves archives into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArchiveSink for DirectorySink {
    fn save(&self, archive: &[u8], filename: &str) -> Result<PathBuf> {
        validate_plain_file_name(filename)?;
        let dir = prepare_output_dir(&self.dir)?;
        let path = dir.join(filename);
        fs::write(&path, archive)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn read_entries(archive: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut file = zip.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_build_archive_entries_match() {
        let archive = build_archive(&[("a.png", &b"aaaa"[..]), ("b.png", &b"bb"[..])]).unwrap();
        let entries = read_entries(archive);
        assert_eq!(
            entries,
            vec![
                ("a.png".to_string(), b"aaaa".to_vec()),
                ("b.png".to_string(), b"bb".to_vec()),
            ]
        );
    }

    #[test]
    fn test_build_archive_duplicate_name_last_wins() {
        let archive =
            build_archive(&[("a.png", &b"first"[..]), ("b.png", &b"b"[..]), ("a.png", &b"second"[..])])
                .unwrap();
        let entries = read_entries(archive);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a.png".to_string(), b"second".to_vec()));
    }

    #[test]
    fn test_build_archive_empty() {
        assert!(matches!(build_archive(&[]), Err(MediaError::EmptyArchive)));
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().join("out"));

        let path = sink.save(b"zip bytes", "images.zip").unwrap();
        assert_eq!(path.file_name().unwrap(), "images.zip");
        assert_eq!(fs::read(&path).unwrap(), b"zip bytes");
    }

    #[test]
    fn test_directory_sink_rejects_paths() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path());
        assert!(matches!(
            sink.save(b"x", "../escape.zip"),
            Err(MediaError::InvalidFileName(_))
        ));
    }
}
