//! Signature payload decoding.
//!
//! The drawing surface hands over a `data:image/...;base64,` URL. Anything
//! that fails to decode is reported as `None` and the caller simply renders
//! nothing; a bad signature must never abort the document.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::application::render::layout::page::RasterImage;

/// Decode a data-URL image payload into packed RGB, compositing any alpha
/// channel over white to match the page background.
pub fn decode_signature(payload: &str) -> Option<RasterImage> {
    let trimmed = payload.trim();
    let encoded = trimmed
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(","))
        .filter(|(header, _)| header.contains("base64"))
        .map(|(_, data)| data)?;

    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(error) => {
            debug!(target: "handoff::render", %error, "signature payload is not valid base64");
            return None;
        }
    };

    let decoded = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(error) => {
            debug!(target: "handoff::render", %error, "signature payload is not a decodable image");
            return None;
        }
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        // out = a * px + (1 - a) * white
        rgb.push(((u16::from(r) * alpha + 255 * (255 - alpha)) / 255) as u8);
        rgb.push(((u16::from(g) * alpha + 255 * (255 - alpha)) / 255) as u8);
        rgb.push(((u16::from(b) * alpha + 255 * (255 - alpha)) / 255) as u8);
    }

    Some(RasterImage { width, height, rgb })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let mut image = image::RgbaImage::new(width, height);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            // Left half opaque ink, right half fully transparent.
            *pixel = if x < width / 2 {
                image::Rgba([20, 20, 20, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            };
        }
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("in-memory png encode");
        format!("data:image/png;base64,{}", STANDARD.encode(&bytes))
    }

    #[test]
    fn valid_payload_decodes_with_alpha_over_white() {
        let raster = decode_signature(&png_data_url(8, 4)).expect("decodes");
        assert_eq!((raster.width, raster.height), (8, 4));
        assert_eq!(raster.rgb.len(), 8 * 4 * 3);
        // Opaque ink stays dark, transparent pixels become white.
        assert_eq!(&raster.rgb[0..3], &[20, 20, 20]);
        let last = raster.rgb.len() - 3;
        assert_eq!(&raster.rgb[last..], &[255, 255, 255]);
    }

    #[test]
    fn malformed_payloads_are_rejected_quietly() {
        assert!(decode_signature("").is_none());
        assert!(decode_signature("hello world").is_none());
        assert!(decode_signature("data:image/png;base64,!!!not-base64!!!").is_none());
        assert!(decode_signature("data:image/png;base64,AAAABBBB").is_none());
        assert!(decode_signature("data:text/plain,plain").is_none());
    }
}
