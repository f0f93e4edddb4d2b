use std::io::Cursor;

use anyhow::Result;
use image::ImageFormat;

/// Clients render stickers at most this big on either side
const MAX_DISPLAY_SIDE: u32 = 256;

#[derive(Debug)]
pub struct ConvertedImage {
    /// PNG encoded RGBA image
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Scales `(w, h)` down proportionally so neither side exceeds [`MAX_DISPLAY_SIDE`].
pub fn display_size(w: u32, h: u32) -> (u32, u32) {
    if w <= MAX_DISPLAY_SIDE && h <= MAX_DISPLAY_SIDE {
        (w, h)
    } else if w > h {
        let h = (h as f64 / (w as f64 / MAX_DISPLAY_SIDE as f64)) as u32;
        (MAX_DISPLAY_SIDE, h)
    } else {
        let w = (w as f64 / (h as f64 / MAX_DISPLAY_SIDE as f64)) as u32;
        (w, MAX_DISPLAY_SIDE)
    }
}

/// Decodes any supported raster image and re-encodes it as an RGBA PNG.
pub fn convert_image(data: &[u8]) -> Result<ConvertedImage> {
    let image = image::load_from_memory(data)?.to_rgba8();
    let (width, height) = display_size(image.width(), image.height());

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;

    Ok(ConvertedImage {
        data: out.into_inner(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png(w: u32, h: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn display_size_caps_longest_side() {
        assert_eq!(display_size(100, 50), (100, 50));
        assert_eq!(display_size(512, 512), (256, 256));
        assert_eq!(display_size(512, 300), (256, 150));
        assert_eq!(display_size(300, 512), (150, 256));
        assert_eq!(display_size(512, 257), (256, 128));
    }

    #[test]
    fn converts_to_png() {
        let converted = convert_image(&png(512, 128)).unwrap();
        assert_eq!((converted.width, converted.height), (256, 64));
        assert_eq!(
            image::guess_format(&converted.data).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn rejects_non_images() {
        assert!(convert_image(b"definitely not an image").is_err());
    }
}
