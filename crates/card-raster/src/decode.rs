use crate::types::Result;
use image::RgbaImage;

/// Decode encoded image bytes (PNG, JPEG, ...) into an RGBA raster.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    #[test]
    fn test_decode_round_trip() {
        let source = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(source.as_raw(), 4, 3, image::ExtendedColorType::Rgba8)
            .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
