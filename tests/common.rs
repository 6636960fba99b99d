#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use media_squeeze::{MediaError, TranscodeEngine};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// A gradient image, compressible like a photo.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn write_image(dir: &Path, name: &str, img: &DynamicImage, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, encode(img, format)).unwrap();
    path
}

/// Creates one real PNG, one real JPEG, a video placeholder and a text file.
pub fn create_mixed_media_files(dir: &Path) -> Vec<PathBuf> {
    let img = gradient_image(64, 48);
    let png = write_image(dir, "a.png", &img, ImageFormat::Png);
    let jpg = write_image(dir, "b.jpg", &img, ImageFormat::Jpeg);

    let mov = dir.join("clip.mov");
    fs::write(&mov, b"not really a movie").unwrap();
    let txt = dir.join("notes.txt");
    fs::write(&txt, b"not media").unwrap();

    vec![png, jpg, mov, txt]
}

/// Reads every `(name, content)` entry of a zip archive.
pub fn read_zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

/// Deterministic noise; barely compressible, so it exercises the quality ladder.
pub fn noisy_image(width: u32, height: u32) -> DynamicImage {
    let mut seed: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let [r, g, b, _] = seed.to_le_bytes();
        Rgb([r, g, b])
    });
    DynamicImage::ImageRgb8(img)
}

/// Engine double that copies its input to the requested output name.
#[derive(Default)]
pub struct CopyEngine {
    loaded: bool,
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl TranscodeEngine for CopyEngine {
    fn load(&mut self) -> media_squeeze::Result<()> {
        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> media_squeeze::Result<()> {
        self.files.lock().unwrap().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn run(&self, args: &[String]) -> media_squeeze::Result<()> {
        let mut files = self.files.lock().unwrap();
        let input = files
            .get(&args[1])
            .cloned()
            .ok_or_else(|| MediaError::FileNotFound(PathBuf::from(&args[1])))?;
        files.insert(args[args.len() - 1].clone(), input);
        Ok(())
    }

    fn read_file(&self, name: &str) -> media_squeeze::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::FileNotFound(PathBuf::from(name)))
    }

    fn remove_file(&self, name: &str) -> media_squeeze::Result<()> {
        self.files.lock().unwrap().remove(name);
        Ok(())
    }
}
