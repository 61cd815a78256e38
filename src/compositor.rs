//! Overlay placement and alpha-over compositing

use image::{Rgba, RgbaImage};

/// Hand-tuned anchor offsets for overlay sprites whose artwork is not
/// centered on the base canvas.
const FIXED_OFFSETS: &[(i64, (f32, f32))] = &[
    (8, (-16.56, 14.81)),
    (11, (-14.74451, 20.39122)),
    (13, (-16.54019, 14.70365)),
];

/// Resolve the placement of `overlay` on `base` for the given overlay id.
///
/// Overlays without a fixed anchor are centered on the base canvas. Offsets
/// are fractional pixels and may be negative.
pub fn overlay_offset(overlay_id: i64, base: &RgbaImage, overlay: &RgbaImage) -> (f32, f32) {
    if let Some(&(_, offset)) = FIXED_OFFSETS.iter().find(|(id, _)| *id == overlay_id) {
        return offset;
    }
    (
        (base.width() as f32 - overlay.width() as f32) / 2.0,
        (base.height() as f32 - overlay.height() as f32) / 2.0,
    )
}

/// Composite `overlay` onto `base` at its fixed or centered offset.
///
/// The canvas keeps base's dimensions; anything the offset pushes outside
/// the canvas is clipped silently.
pub fn composite(base: &mut RgbaImage, overlay: &RgbaImage, overlay_id: i64) {
    let (ox, oy) = overlay_offset(overlay_id, base, overlay);
    blit_over(base, overlay, ox, oy);
}

/// Alpha-over blit of `sprite` onto `canvas` at a fractional offset.
///
/// Destination pixel centers are mapped back into sprite space and the
/// sprite is sampled bilinearly, so sub-pixel offsets render the filtered
/// edges a 2d canvas would produce. Integer offsets degenerate to an exact
/// texel copy.
pub(crate) fn blit_over(canvas: &mut RgbaImage, sprite: &RgbaImage, ox: f32, oy: f32) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let (sprite_w, sprite_h) = sprite.dimensions();

    // Bounding box of destination pixels the sprite can touch, one pixel of
    // slack on each side for the bilinear footprint, clipped to the canvas.
    let x0 = (ox.floor() as i64 - 1).max(0);
    let y0 = (oy.floor() as i64 - 1).max(0);
    let x1 = ((ox + sprite_w as f32).ceil() as i64 + 1).min(canvas_w as i64);
    let y1 = ((oy + sprite_h as f32).ceil() as i64 + 1).min(canvas_h as i64);

    for dest_y in y0..y1 {
        for dest_x in x0..x1 {
            // Sprite-space coordinate of this destination pixel's center.
            let sx = dest_x as f32 + 0.5 - ox;
            let sy = dest_y as f32 + 0.5 - oy;
            let src = sample_bilinear(sprite, sx, sy);
            if src[3] == 0 {
                continue;
            }
            let dst = canvas.get_pixel(dest_x as u32, dest_y as u32);
            let blended = blend_over(src, *dst);
            canvas.put_pixel(dest_x as u32, dest_y as u32, blended);
        }
    }
}

/// Sample `sprite` at a fractional pixel-center coordinate.
///
/// Color channels are weighted by alpha so transparent texels contribute no
/// RGB to filtered edges. Samples outside the sprite are transparent.
fn sample_bilinear(sprite: &RgbaImage, sx: f32, sy: f32) -> Rgba<u8> {
    let fx = sx - 0.5;
    let fy = sy - 0.5;
    let ix = fx.floor();
    let iy = fy.floor();
    let tx = fx - ix;
    let ty = fy - iy;

    let texel = |x: i64, y: i64| -> [f32; 4] {
        if x < 0 || y < 0 || x >= sprite.width() as i64 || y >= sprite.height() as i64 {
            return [0.0; 4];
        }
        let p = sprite.get_pixel(x as u32, y as u32);
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32 / 255.0]
    };

    let weights = [
        (texel(ix as i64, iy as i64), (1.0 - tx) * (1.0 - ty)),
        (texel(ix as i64 + 1, iy as i64), tx * (1.0 - ty)),
        (texel(ix as i64, iy as i64 + 1), (1.0 - tx) * ty),
        (texel(ix as i64 + 1, iy as i64 + 1), tx * ty),
    ];

    let mut alpha = 0.0f32;
    let mut premul = [0.0f32; 3];
    for (t, w) in weights {
        alpha += t[3] * w;
        for c in 0..3 {
            premul[c] += t[c] * t[3] * w;
        }
    }

    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    Rgba([
        (premul[0] / alpha).round().clamp(0.0, 255.0) as u8,
        (premul[1] / alpha).round().clamp(0.0, 255.0) as u8,
        (premul[2] / alpha).round().clamp(0.0, 255.0) as u8,
        (alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Porter-duff source-over of `src` on `dst`.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;

    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let composite = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let result = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    #[test]
    fn test_overlay_offset_fixed_table() {
        let base = solid(32, 32, [0, 0, 0, 255]);
        let overlay = solid(8, 8, [0, 0, 0, 255]);
        assert_eq!(overlay_offset(8, &base, &overlay), (-16.56, 14.81));
        assert_eq!(overlay_offset(11, &base, &overlay), (-14.74451, 20.39122));
        assert_eq!(overlay_offset(13, &base, &overlay), (-16.54019, 14.70365));
    }

    #[test]
    fn test_overlay_offset_centered() {
        let base = solid(32, 32, [0, 0, 0, 255]);
        let overlay = solid(8, 16, [0, 0, 0, 255]);
        assert_eq!(overlay_offset(3, &base, &overlay), (12.0, 8.0));
    }

    #[test]
    fn test_overlay_offset_centered_can_be_negative() {
        // Overlay larger than base anchors above/left of the canvas origin
        let base = solid(8, 8, [0, 0, 0, 255]);
        let overlay = solid(16, 16, [0, 0, 0, 255]);
        assert_eq!(overlay_offset(5, &base, &overlay), (-4.0, -4.0));
    }

    #[test]
    fn test_integer_blit_is_exact() {
        let mut canvas = solid(4, 4, [10, 20, 30, 255]);
        let sprite = solid(2, 2, [200, 100, 50, 255]);
        blit_over(&mut canvas, &sprite, 1.0, 1.0);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([200, 100, 50, 255]));
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([200, 100, 50, 255]));
        // Outside the sprite footprint the canvas is untouched
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_transparent_sprite_is_noop() {
        let mut canvas = solid(4, 4, [10, 20, 30, 255]);
        let before = canvas.clone();
        let sprite = solid(2, 2, [255, 255, 255, 0]);
        blit_over(&mut canvas, &sprite, 1.0, 1.0);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_negative_offset_clips_silently() {
        let mut canvas = solid(4, 4, [0, 0, 0, 255]);
        let sprite = solid(4, 4, [255, 0, 0, 255]);
        blit_over(&mut canvas, &sprite, -2.0, -2.0);
        // Top-left quadrant covered, bottom-right untouched
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_semi_transparent_overlay_blends() {
        let mut canvas = solid(2, 2, [0, 0, 0, 255]);
        let sprite = solid(2, 2, [255, 255, 255, 128]);
        blit_over(&mut canvas, &sprite, 0.0, 0.0);
        let p = canvas.get_pixel(0, 0);
        // 50% white over black, opaque result
        assert_eq!(p[3], 255);
        assert!(p[0] >= 127 && p[0] <= 129, "got {}", p[0]);
    }

    #[test]
    fn test_fractional_offset_spreads_coverage() {
        let mut canvas = solid(4, 1, [0, 0, 0, 255]);
        let sprite = solid(1, 1, [255, 255, 255, 255]);
        blit_over(&mut canvas, &sprite, 1.5, 0.0);
        // The texel straddles pixels 1 and 2 with equal weight
        let left = canvas.get_pixel(1, 0);
        let right = canvas.get_pixel(2, 0);
        assert_eq!(left, right);
        assert!(left[0] > 0 && left[0] < 255, "got {}", left[0]);
        // Pixel 0 and 3 stay black
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_composite_keeps_base_dimensions() {
        let mut base = solid(32, 16, [0, 0, 0, 255]);
        let overlay = solid(8, 8, [255, 0, 0, 255]);
        composite(&mut base, &overlay, 8);
        assert_eq!(base.dimensions(), (32, 16));
    }

    #[test]
    fn test_composite_centered_overlay_lands_in_middle() {
        let mut base = solid(8, 8, [0, 0, 255, 255]);
        let overlay = solid(2, 2, [255, 0, 0, 255]);
        composite(&mut base, &overlay, 1);
        assert_eq!(*base.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(4, 4), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }
}
