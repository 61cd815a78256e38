//! Per-channel tint recoloring of sprite images

use image::RgbaImage;

/// A normalized per-channel tint factor, each component in [0, 1].
///
/// Built from 0-255 integer channels; (255, 255, 255) is the identity tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    /// Build a tint from 0-255 channel values.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// Rescale the RGB channels of every non-transparent pixel by `tint`.
///
/// Pixels with alpha == 0 are left byte-identical, RGB included, so
/// fully transparent regions survive exactly as authored. Alpha is never
/// modified. Channels round half away from zero; a <=255 byte times a
/// <=1 factor cannot exceed 255, so the cast needs no extra clamp.
pub fn tint_image(image: &mut RgbaImage, tint: Tint) {
    for pixel in image.pixels_mut() {
        if pixel[3] > 0 {
            pixel[0] = (pixel[0] as f32 * tint.r).round() as u8;
            pixel[1] = (pixel[1] as f32 * tint.g).round() as u8;
            pixel[2] = (pixel[2] as f32 * tint.b).round() as u8;
        }
    }
}
