use crate::constants::MAX_FILE_SIZE;
use crate::error::{MediaError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Validate an input file before it is read into memory
pub fn validate_input_path(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(MediaError::UnsupportedMedia(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(MediaError::FileTooLarge(size, MAX_FILE_SIZE));
    }

    Ok(size)
}

/// Create the output directory if needed and return its canonical form
pub fn prepare_output_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|_| MediaError::DirectoryCreationFailed(dir.to_path_buf()))?;
    dir.canonicalize()
        .map_err(|_| MediaError::DirectoryCreationFailed(dir.to_path_buf()))
}

/// A name written into an engine workspace or an archive sink must be a
/// single plain path component.
pub fn validate_plain_file_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(MediaError::InvalidFileName(name.to_string())),
    }
}
