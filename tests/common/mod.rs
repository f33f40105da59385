//! Common test utilities for rawplay integration tests
//!
//! Helpers for synthesizing YUV4MPEG2 byte buffers with known plane fills.

#![allow(dead_code)]

/// Build a stream header line for a 4:2:0 stream at 25 fps
pub fn stream_header(width: u32, height: u32) -> Vec<u8> {
    format!("YUV4MPEG2 W{} H{} F25:1 Ip A1:1 C420jpeg\n", width, height).into_bytes()
}

/// Append one frame block with constant plane fills
pub fn push_frame(data: &mut Vec<u8>, width: u32, height: u32, luma: u8, cb: u8, cr: u8) {
    let luma_len = (width * height) as usize;
    let chroma_len = ((width / 2) * (height / 2)) as usize;
    data.extend_from_slice(b"FRAME\n");
    data.extend_from_slice(&vec![luma; luma_len]);
    data.extend_from_slice(&vec![cb; chroma_len]);
    data.extend_from_slice(&vec![cr; chroma_len]);
}

/// Build a complete stream from `(luma, cb, cr)` fill triples
pub fn build_stream(width: u32, height: u32, frames: &[(u8, u8, u8)]) -> Vec<u8> {
    let mut data = stream_header(width, height);
    for &(luma, cb, cr) in frames {
        push_frame(&mut data, width, height, luma, cb, cr);
    }
    data
}
