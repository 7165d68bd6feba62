use crate::{Error, Result};
use fast_image_resize::{PixelType, ResizeOptions, Resizer, images::Image as FrImage};
use image::{Rgba, RgbaImage};

const CHECKER_CELL: u32 = 16;
const CHECKER_LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CHECKER_DARK: Rgba<u8> = Rgba([204, 204, 204, 255]);
const DIVIDER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DIVIDER_WIDTH: u32 = 2;

/// Decodes both images and renders them as a before/after comparison.
pub fn compose_from_bytes(original: &[u8], processed: &[u8], divider: f32) -> Result<RgbaImage> {
    let original = image::load_from_memory(original)?.to_rgba8();
    let processed = image::load_from_memory(processed)?.to_rgba8();
    compose(&original, &processed, divider)
}

/// Left of `divider` (percent) shows `original`, right of it shows
/// `processed` over a checkerboard so removed areas stay visible.
pub fn compose(original: &RgbaImage, processed: &RgbaImage, divider: f32) -> Result<RgbaImage> {
    let (width, height) = original.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::ImageProcessing("original image is empty".to_string()));
    }
    if processed.width() == 0 || processed.height() == 0 {
        return Err(Error::ImageProcessing("processed image is empty".to_string()));
    }

    let processed = fit(processed, width, height)?;
    let divider = if divider.is_finite() {
        divider.clamp(0.0, 100.0)
    } else {
        50.0
    };
    let split = (width as f32 * divider / 100.0).round() as u32;

    let mut result = RgbaImage::new(width, height);
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        *pixel = if x < split {
            *original.get_pixel(x, y)
        } else {
            blend(*processed.get_pixel(x, y), checker(x, y))
        };
    }

    let line_start = split.saturating_sub(DIVIDER_WIDTH / 2);
    let line_end = (line_start + DIVIDER_WIDTH).min(width);
    for x in line_start..line_end {
        for y in 0..height {
            result.put_pixel(x, y, DIVIDER_COLOR);
        }
    }

    Ok(result)
}

fn checker(x: u32, y: u32) -> Rgba<u8> {
    if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
        CHECKER_LIGHT
    } else {
        CHECKER_DARK
    }
}

// source-over with an opaque background
fn blend(fg: Rgba<u8>, bg: Rgba<u8>) -> Rgba<u8> {
    let alpha = u32::from(fg[3]);
    let mix = |f: u8, b: u8| ((u32::from(f) * alpha + u32::from(b) * (255 - alpha) + 127) / 255) as u8;
    Rgba([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2]), 255])
}

fn fit(image: &RgbaImage, target_width: u32, target_height: u32) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == target_width && height == target_height {
        return Ok(image.clone());
    }

    log::debug!("resizing processed image {width}x{height} -> {target_width}x{target_height}");

    let src_image = FrImage::from_vec_u8(width, height, image.as_raw().clone(), PixelType::U8x4)?;
    let mut dst_image = FrImage::new(target_width, target_height, PixelType::U8x4);
    Resizer::new().resize(&src_image, &mut dst_image, &ResizeOptions::new())?;

    RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| Error::ImageProcessing("Failed to create resized image".to_string()))
}
