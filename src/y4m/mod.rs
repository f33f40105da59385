//! YUV4MPEG2 ("y4m") stream support
//!
//! This module indexes raw y4m byte buffers without copying pixel data.
//! The stream header is parsed rather than assumed, and every frame block
//! is recorded as bounds-checked ranges into the source buffer.

pub mod header;
pub mod parser;
pub mod stream;

pub use header::{Colorspace, Interlacing, StreamHeader};
pub use parser::parse;
pub use stream::{FrameRef, VideoStream};
