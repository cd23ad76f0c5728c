use image::{Rgb, RgbImage};

use crate::layout::{Side, SlotRegion};
use crate::DetectError;

/// Read the panel backdrop color for one side from its sample pixel.
pub fn sample_background(frame: &RgbImage, side: Side) -> Result<Rgb<u8>, DetectError> {
    let (x, y) = side.background_sample();
    if x >= frame.width() || y >= frame.height() {
        return Err(DetectError::OutOfBounds {
            what: "background sample",
            x,
            y,
            width: 1,
            height: 1,
            frame_width: frame.width(),
            frame_height: frame.height(),
        });
    }
    Ok(*frame.get_pixel(x, y))
}

/// Crop one slot rectangle out of the frame.
pub fn crop_slot(frame: &RgbImage, region: SlotRegion) -> Result<RgbImage, DetectError> {
    let fits = region.x + region.width <= frame.width()
        && region.y + region.height <= frame.height();
    if !fits {
        return Err(DetectError::OutOfBounds {
            what: "slot rectangle",
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            frame_width: frame.width(),
            frame_height: frame.height(),
        });
    }
    Ok(image::imageops::crop_imm(frame, region.x, region.y, region.width, region.height)
        .to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::slot_region;

    #[test]
    fn test_sample_background_reads_corner_pixels() {
        let mut frame = RgbImage::from_pixel(1280, 100, Rgb([1, 2, 3]));
        frame.put_pixel(0, 0, Rgb([200, 10, 10]));
        frame.put_pixel(1279, 0, Rgb([10, 10, 200]));

        assert_eq!(sample_background(&frame, Side::Blue).unwrap().0, [200, 10, 10]);
        assert_eq!(sample_background(&frame, Side::Red).unwrap().0, [10, 10, 200]);
    }

    #[test]
    fn test_sample_background_narrow_frame() {
        let frame = RgbImage::new(640, 100);
        assert!(sample_background(&frame, Side::Blue).is_ok());
        assert!(matches!(
            sample_background(&frame, Side::Red),
            Err(DetectError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_crop_slot_size_and_offset() {
        let frame = RgbImage::from_fn(1280, 100, |x, y| Rgb([(x % 251) as u8, (y % 97) as u8, 0]));
        let region = slot_region(2);
        let crop = crop_slot(&frame, region).unwrap();
        assert_eq!(crop.dimensions(), (38, 30));
        assert_eq!(
            crop.get_pixel(0, 0),
            frame.get_pixel(region.x, region.y)
        );
        assert_eq!(
            crop.get_pixel(37, 29),
            frame.get_pixel(region.x + 37, region.y + 29)
        );
    }

    #[test]
    fn test_crop_slot_short_frame() {
        let frame = RgbImage::new(1280, 60);
        assert!(matches!(
            crop_slot(&frame, slot_region(1)),
            Err(DetectError::OutOfBounds { .. })
        ));
    }
}
