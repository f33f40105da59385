//! GPU conversion tests for rawplay
//!
//! These run only with the `gpu` feature and skip (without failing) on
//! machines with no usable adapter.

#![cfg(feature = "gpu")]

use rawplay_lib::convert::{CpuConverter, GpuConverter};
use rawplay_lib::util::Buffer;
use rawplay_lib::y4m;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_gpu_matches_cpu_within_rounding() {
    let mut converter = match GpuConverter::new_blocking() {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("skipping GPU test: {}", e);
            return;
        }
    };

    let data = build_stream(8, 4, &[(128, 128, 128), (200, 64, 180)]);
    let stream = y4m::parse(Buffer::from_vec(data)).unwrap();
    let cpu = CpuConverter::new();

    for frame in stream.frames() {
        let rgba = converter.convert_to_rgba(&frame).unwrap();
        let rgb = cpu.convert(&frame).unwrap();

        assert_eq!(rgba.len(), (frame.width * frame.height * 4) as usize);
        for (gpu_pixel, cpu_pixel) in rgba.chunks_exact(4).zip(rgb.data.chunks_exact(3)) {
            for channel in 0..3 {
                let diff = (gpu_pixel[channel] as i16 - cpu_pixel[channel] as i16).abs();
                assert!(
                    diff <= 2,
                    "gpu {:?} vs cpu {:?}",
                    &gpu_pixel[..3],
                    cpu_pixel
                );
            }
            assert_eq!(gpu_pixel[3], 255);
        }
    }
}

#[test]
fn test_gpu_exposes_target_texture() {
    let mut converter = match GpuConverter::new_blocking() {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("skipping GPU test: {}", e);
            return;
        }
    };

    assert!(converter.rgba_texture().is_none());

    let data = build_stream(8, 4, &[(90, 128, 128)]);
    let stream = y4m::parse(Buffer::from_vec(data)).unwrap();
    converter.convert(&stream.frame(0).unwrap()).unwrap();

    let texture = converter.rgba_texture().expect("target texture after convert");
    assert_eq!(texture.width(), 8);
    assert_eq!(texture.height(), 4);
}
