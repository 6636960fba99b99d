use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use media_squeeze::compression::{encode_image, resize_to_fit};
use media_squeeze::{
    build_archive, ImageCompressionOptions, ImageCompressor, ImageProcessor, SourceFile,
    TargetSizeCompressor,
};
use std::io::Cursor;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

fn create_source(name: &str, width: u32, height: u32, format: ImageFormat) -> SourceFile {
    let mut bytes = Vec::new();
    create_test_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    SourceFile::new(name, bytes)
}

fn bench_resize_to_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_to_fit");

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let img = create_test_image(width, height);

        group.bench_with_input(
            BenchmarkId::new("resize", format!("{}x{}", width, height)),
            &img,
            |b, img| {
                b.iter(|| {
                    let mut img = img.clone();
                    resize_to_fit(black_box(&mut img), black_box(1920));
                })
            },
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let img = create_test_image(1280, 720);
    let mut group = c.benchmark_group("encode");

    for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP] {
        group.bench_with_input(
            BenchmarkId::new("format", format!("{:?}", format)),
            &format,
            |b, format| b.iter(|| encode_image(black_box(&img), *format, 80)),
        );
    }

    group.finish();
}

fn bench_target_size_compression(c: &mut Criterion) {
    let source = create_source("photo.jpg", 3000, 2000, ImageFormat::Jpeg);
    let options = ImageCompressionOptions::default();

    c.bench_function("target_size_compression", |b| {
        b.iter(|| TargetSizeCompressor.compress(black_box(&source), black_box(&options)))
    });
}

fn bench_batch_upload(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..8)
        .map(|i| create_source(&format!("photo_{}.jpg", i), 1600, 1200, ImageFormat::Jpeg))
        .collect();

    let mut group = c.benchmark_group("batch_upload");
    group.sample_size(10);
    for parallelize in [true, false] {
        group.bench_with_input(
            BenchmarkId::new("parallelize", parallelize),
            &parallelize,
            |b, &parallelize| {
                b.iter(|| {
                    let options = ImageCompressionOptions::new(None, None, parallelize).unwrap();
                    let mut processor = ImageProcessor::with_default_compressor(options);
                    processor.upload(files.clone()).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_build_archive(c: &mut Criterion) {
    let contents: Vec<Vec<u8>> = (0..20).map(|i| vec![i as u8; 200 * 1024]).collect();
    let names: Vec<String> = (0..20).map(|i| format!("item_{}.jpg", i)).collect();
    let entries: Vec<(&str, &[u8])> = names
        .iter()
        .zip(&contents)
        .map(|(n, c)| (n.as_str(), c.as_slice()))
        .collect();

    c.bench_function("build_archive", |b| {
        b.iter(|| build_archive(black_box(&entries)))
    });
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_resize_to_fit,
    bench_encode,
    bench_target_size_compression,
    bench_batch_upload,
    bench_build_archive
);
criterion_main!(benches);
