/// Texture pixels for the textured scenes

use std::path::Path;

use freelook_engine::freelook::{Error, Result};
use freelook_engine::freelook::render::{TextureDesc, TextureFilter, TextureFormat, TextureWrap};
use freelook_engine::engine_info;

/// Size of the generated checkerboard
const CHECKER_SIZE: u32 = 256;
/// Pixels per checker square
const CHECKER_CELL: u32 = 32;

const CHECKER_LIGHT: [u8; 4] = [222, 184, 135, 255];
const CHECKER_DARK: [u8; 4] = [139, 90, 43, 255];

/// Decode an image file (png or jpeg) into RGBA8
pub fn load_image(path: &Path) -> Result<TextureDesc> {
    let image = image::open(path)
        .map_err(|e| Error::InvalidResource(format!("Failed to load '{}': {}", path.display(), e)))?
        .flipv()
        .into_rgba8();

    let (width, height) = image.dimensions();
    engine_info!("freelook::demo", "Loaded texture '{}' ({}x{})", path.display(), width, height);

    Ok(texture_desc(width, height, image.into_raw()))
}

/// Two-tone checkerboard
pub fn checkerboard() -> TextureDesc {
    let mut data = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let light = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0;
            data.extend_from_slice(if light { &CHECKER_LIGHT } else { &CHECKER_DARK });
        }
    }
    texture_desc(CHECKER_SIZE, CHECKER_SIZE, data)
}

/// Image file when given, checkerboard otherwise
pub fn load_or_generate(path: Option<&Path>) -> Result<TextureDesc> {
    match path {
        Some(path) => load_image(path),
        None => Ok(checkerboard()),
    }
}

fn texture_desc(width: u32, height: u32, data: Vec<u8>) -> TextureDesc {
    TextureDesc {
        width,
        height,
        format: TextureFormat::R8G8B8A8_SRGB,
        data,
        filter: TextureFilter::Linear,
        wrap: TextureWrap::Repeat,
    }
}
