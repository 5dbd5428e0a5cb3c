#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Loads every image in `dir`, sorted by file name.
fn load_photos(dir: &Path) -> Vec<(String, RgbaImage)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read photo directory")
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .expect("read each photo entry");

    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let image = image::open(&path)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()))
                .into_rgba8();
            (name, image)
        })
        .collect()
}

pub const PHOTO_DIR: &str = "img/photos";

pub fn root_dir() -> PathBuf {
    // assume current exe path is something like: target/build/deps/current_exe
    let exe = std::env::current_exe().unwrap();
    exe.parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap()
        .to_owned()
}

/// A noisy image, the worst case for the distinct method since nothing repeats.
pub fn noise_image(width: u32, height: u32) -> RgbaImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    RgbaImage::from_fn(width, height, |_, _| {
        image::Rgba([rng.gen(), rng.gen(), rng.gen(), u8::MAX])
    })
}

/// A smooth two axis gradient, closer to a photo than noise.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    #[allow(clippy::cast_possible_truncation)]
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        image::Rgba([r, g, r / 2 + g / 2, u8::MAX])
    })
}

fn load_bench_images() -> Vec<(String, RgbaImage)> {
    let dir = root_dir().join(PHOTO_DIR);
    let mut images = if dir.is_dir() {
        load_photos(&dir)
    } else {
        Vec::new()
    };

    images.push(("noise_1920x1080".to_owned(), noise_image(1920, 1080)));
    images.push(("gradient_1920x1080".to_owned(), gradient_image(1920, 1080)));
    images
}

static BENCH_IMAGES: OnceLock<Vec<(String, RgbaImage)>> = OnceLock::new();

/// Photos under `img/photos` (if any) followed by the synthetic images.
pub fn bench_images() -> &'static [(String, RgbaImage)] {
    BENCH_IMAGES.get_or_init(load_bench_images)
}
