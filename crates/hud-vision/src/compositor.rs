use image::{GrayImage, Rgb, RgbImage};

/// Alpha-blend a reference icon over a solid panel color.
///
/// Produces the template to compare against the frame: what the icon looks
/// like sitting on that panel. The backdrop color is broadcast across the
/// whole region (the panel is a solid fill, not a texture). Must be redone
/// whenever the backdrop changes; it differs per side and per capture.
pub fn fuse(icon: &RgbImage, mask: &GrayImage, background: Rgb<u8>) -> RgbImage {
    debug_assert_eq!(icon.dimensions(), mask.dimensions());

    RgbImage::from_fn(icon.width(), icon.height(), |x, y| {
        let alpha = mask.get_pixel(x, y)[0] as f32 / 255.0;
        let fg = icon.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            // Convex combination of two u8 values, cannot leave [0, 255].
            let v = fg[c] as f32 * alpha + background[c] as f32 * (1.0 - alpha);
            out[c] = v.round() as u8;
        }
        Rgb(out)
    })
}
