//! CPU color conversion

use super::{CB_TO_B, CB_TO_G, CR_TO_G, CR_TO_R, RgbImage};
use crate::error::{Error, Result};
use crate::y4m::FrameRef;
use rayon::prelude::*;

/// CPU-side converter from planar 4:2:0 frames to packed RGB.
///
/// Rows are converted in parallel on the global rayon pool; chroma is read
/// at `(x/2, y/2)` without interpolation, matching the nearest-neighbor
/// sampling of the GPU path.
#[derive(Debug, Default)]
pub struct CpuConverter;

impl CpuConverter {
    /// Create a new converter
    pub fn new() -> Self {
        CpuConverter
    }

    /// Convert one frame to a full-color RGB image
    pub fn convert(&self, frame: &FrameRef<'_>) -> Result<RgbImage> {
        validate_planes(frame)?;

        let width = frame.width as usize;
        let chroma_width = frame.chroma_width() as usize;
        let mut image = RgbImage::new(frame.width, frame.height);

        image
            .data
            .par_chunks_exact_mut(width * 3)
            .enumerate()
            .for_each(|(row, out)| {
                let luma_row = &frame.luma[row * width..][..width];
                let cb_row = &frame.cb[(row / 2) * chroma_width..][..chroma_width];
                let cr_row = &frame.cr[(row / 2) * chroma_width..][..chroma_width];
                for (x, pixel) in out.chunks_exact_mut(3).enumerate() {
                    pixel.copy_from_slice(&convert_pixel(
                        luma_row[x],
                        cb_row[x / 2],
                        cr_row[x / 2],
                    ));
                }
            });

        Ok(image)
    }

    /// Convert one frame to a greyscale preview image.
    ///
    /// Each luma byte is replicated into R, G and B; chroma is ignored.
    pub fn luma_preview(&self, frame: &FrameRef<'_>) -> Result<RgbImage> {
        let width = frame.width as usize;
        let height = frame.height as usize;
        if frame.luma.len() != width * height {
            return Err(Error::invalid_input(format!(
                "luma plane size mismatch: expected {}, got {}",
                width * height,
                frame.luma.len()
            )));
        }

        let mut image = RgbImage::new(frame.width, frame.height);
        for (pixel, &value) in image.data.chunks_exact_mut(3).zip(frame.luma) {
            pixel.fill(value);
        }
        Ok(image)
    }
}

/// Convert a single full-range BT.601 sample triple to RGB
pub fn convert_pixel(luma: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = luma as f32 / 255.0;
    let cb = cb as f32 / 255.0 - 0.5;
    let cr = cr as f32 / 255.0 - 0.5;

    let r = y + CR_TO_R * cr;
    let g = y + CB_TO_G * cb + CR_TO_G * cr;
    let b = y + CB_TO_B * cb;

    [quantize(r), quantize(g), quantize(b)]
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub(crate) fn validate_planes(frame: &FrameRef<'_>) -> Result<()> {
    let luma_len = frame.width as usize * frame.height as usize;
    let chroma_len = frame.chroma_width() as usize * frame.chroma_height() as usize;

    if frame.luma.len() != luma_len {
        return Err(Error::invalid_input(format!(
            "luma plane size mismatch: expected {}, got {}",
            luma_len,
            frame.luma.len()
        )));
    }
    if frame.cb.len() != chroma_len {
        return Err(Error::invalid_input(format!(
            "Cb plane size mismatch: expected {}, got {}",
            chroma_len,
            frame.cb.len()
        )));
    }
    if frame.cr.len() != chroma_len {
        return Err(Error::invalid_input(format!(
            "Cr plane size mismatch: expected {}, got {}",
            chroma_len,
            frame.cr.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_grey() {
        // 128 is one quantization step above exact neutral (128/255 vs 0.5),
        // so channels land within one step of mid-grey.
        let [r, g, b] = convert_pixel(128, 128, 128);
        for channel in [r, g, b] {
            assert!((127..=129).contains(&channel), "channel {}", channel);
        }
    }

    #[test]
    fn test_peak_luma_clamps_to_white() {
        let [r, g, b] = convert_pixel(255, 128, 128);
        assert_eq!(r, 255);
        assert!(g >= 254);
        assert_eq!(b, 255);
    }

    #[test]
    fn test_zero_luma_never_goes_negative() {
        for (cb, cr) in [(0, 0), (0, 255), (255, 0), (255, 255)] {
            let [_, g, _] = convert_pixel(0, cb, cr);
            // G picks up only negative contributions at saturated chroma
            if cb == 255 && cr == 255 {
                assert_eq!(g, 0);
            }
        }
    }

    #[test]
    fn test_plane_size_mismatch() {
        let luma = [0u8; 8];
        let cb = [0u8; 1];
        let cr = [0u8; 2];
        let frame = crate::y4m::FrameRef {
            luma: &luma,
            cb: &cb,
            cr: &cr,
            width: 4,
            height: 2,
        };
        assert!(matches!(
            CpuConverter::new().convert(&frame),
            Err(Error::InvalidInput(_))
        ));
    }
}
