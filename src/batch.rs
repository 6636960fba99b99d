use crate::constants::MAX_BATCH_FILES;
use crate::error::{MediaError, Result};
use crate::formats::MediaKind;
use crate::media::MediaItem;
use glob::glob;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ordered list of processed items; insertion order is display order.
#[derive(Debug, Default)]
pub struct MediaBatch {
    items: Vec<MediaItem>,
}

impl MediaBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Appends every item of a settled upload at once.
    pub fn append(&mut self, items: Vec<MediaItem>) {
        self.items.extend(items);
    }

    /// Removes the item at `index`; later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<MediaItem> {
        if index >= self.items.len() {
            return Err(MediaError::IndexOutOfRange(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    /// Drops every item, releasing their previews.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// `(original name, processed content)` pairs in display order
    pub fn archive_entries(&self) -> Vec<(&str, &[u8])> {
        self.items
            .iter()
            .map(|item| (item.original_name.as_str(), item.processed.as_slice()))
            .collect()
    }

    pub fn total_original_size(&self) -> u64 {
        self.items.iter().map(|item| item.original_size).sum()
    }

    pub fn total_processed_size(&self) -> u64 {
        self.items.iter().map(MediaItem::processed_size).sum()
    }
}

impl<'a> IntoIterator for &'a MediaBatch {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Rejects uploads larger than the batch file limit.
pub fn validate_batch_size(count: usize) -> Result<()> {
    if count > MAX_BATCH_FILES {
        return Err(MediaError::BatchFileLimitExceeded(count, MAX_BATCH_FILES));
    }
    Ok(())
}

/// Collects files of `kind` from a file path, a directory or a glob pattern.
pub fn collect_media_files(input: &str, kind: MediaKind, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        if kind.matches(input_path) {
            let canonical = input_path
                .canonicalize()
                .map_err(|_| MediaError::FileNotFound(input_path.to_path_buf()))?;
            files.push(canonical);
        }
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && kind.matches(path) {
                if let Ok(canonical) = path.canonicalize() {
                    files.push(canonical);
                }
            }
        }
    } else if let Ok(pattern) = glob(input) {
        for entry in pattern.flatten() {
            if entry.is_file() && kind.matches(&entry) {
                if let Ok(canonical) = entry.canonicalize() {
                    files.push(canonical);
                }
            }
        }
    } else {
        return Err(MediaError::NoMediaFilesFound(input.to_string()));
    }

    Ok(files)
}
