//! Indexed video streams and zero-copy frame views

use super::header::StreamHeader;
use crate::error::{Error, Result};
use crate::util::Buffer;
use std::ops::Range;

/// Byte ranges of one frame's planes within the stream buffer.
///
/// Invariant: every range lies fully within the buffer the stream owns.
/// The parser only records ranges it has verified against the buffer end.
#[derive(Debug, Clone)]
pub(crate) struct FramePlanes {
    pub luma: Range<usize>,
    pub cb: Range<usize>,
    pub cr: Range<usize>,
}

/// A parsed YUV4MPEG2 stream: the source buffer, its header, and an ordered
/// index of frame plane locations. Frame data is never copied; accessors
/// hand out borrowed plane slices.
#[derive(Debug)]
pub struct VideoStream {
    buffer: Buffer,
    header: StreamHeader,
    frames: Vec<FramePlanes>,
}

impl VideoStream {
    pub(crate) fn new(buffer: Buffer, header: StreamHeader, frames: Vec<FramePlanes>) -> Self {
        VideoStream {
            buffer,
            header,
            frames,
        }
    }

    /// The parsed stream header
    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Number of indexed frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check whether the stream holds no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Stream duration in seconds, from frame count and header frame rate
    pub fn duration_seconds(&self) -> f64 {
        self.frames.len() as f64 * self.header.frame_rate.invert().to_f64()
    }

    /// Get a frame by index.
    ///
    /// Strict lookup: an index past the last frame is an error.
    pub fn frame(&self, index: usize) -> Result<FrameRef<'_>> {
        let planes = self.frames.get(index).ok_or(Error::FrameIndex {
            index,
            count: self.frames.len(),
        })?;
        Ok(self.view(planes))
    }

    /// Get a frame by index, wrapping modulo the frame count.
    ///
    /// This is the looping-playback policy: index 5 of a 4-frame stream is
    /// frame 1, and a display tick counter can grow without bound. Fails
    /// only when the stream holds no frames at all.
    pub fn frame_wrapping(&self, index: usize) -> Result<FrameRef<'_>> {
        if self.frames.is_empty() {
            return Err(Error::FrameIndex { index, count: 0 });
        }
        self.frame(index % self.frames.len())
    }

    /// Iterate over all frames in stream order
    pub fn frames(&self) -> impl Iterator<Item = FrameRef<'_>> {
        self.frames.iter().map(|planes| self.view(planes))
    }

    fn view(&self, planes: &FramePlanes) -> FrameRef<'_> {
        let data = self.buffer.as_slice();
        FrameRef {
            luma: &data[planes.luma.clone()],
            cb: &data[planes.cb.clone()],
            cr: &data[planes.cr.clone()],
            width: self.header.width,
            height: self.header.height,
        }
    }
}

/// Borrowed view of one frame's three planes.
///
/// `luma` is `width*height` bytes; `cb` and `cr` are each
/// `(width/2)*(height/2)` bytes (4:2:0).
#[derive(Debug, Clone, Copy)]
pub struct FrameRef<'a> {
    pub luma: &'a [u8],
    pub cb: &'a [u8],
    pub cr: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl FrameRef<'_> {
    /// Chroma plane width (half the luma width)
    pub fn chroma_width(&self) -> u32 {
        self.width / 2
    }

    /// Chroma plane height (half the luma height)
    pub fn chroma_height(&self) -> u32 {
        self.height / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::y4m;

    fn two_frame_stream() -> VideoStream {
        let mut data = b"YUV4MPEG2 W4 H2 F25:1\n".to_vec();
        for fill in [10u8, 20u8] {
            data.extend_from_slice(b"FRAME\n");
            data.extend_from_slice(&[fill; 8]);
            data.extend_from_slice(&[fill + 1; 2]);
            data.extend_from_slice(&[fill + 2; 2]);
        }
        y4m::parse(Buffer::from_vec(data)).unwrap()
    }

    #[test]
    fn test_strict_lookup() {
        let stream = two_frame_stream();
        assert_eq!(stream.frame(1).unwrap().luma[0], 20);
        assert!(matches!(
            stream.frame(2),
            Err(Error::FrameIndex { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_wrapping_lookup() {
        let stream = two_frame_stream();
        assert_eq!(stream.frame_wrapping(5).unwrap().luma[0], 20);
        assert_eq!(stream.frame_wrapping(4).unwrap().luma[0], 10);
    }

    #[test]
    fn test_frame_geometry() {
        let stream = two_frame_stream();
        let frame = stream.frame(0).unwrap();
        assert_eq!(frame.luma.len(), 8);
        assert_eq!(frame.cb.len(), 2);
        assert_eq!(frame.cr.len(), 2);
        assert_eq!(frame.chroma_width(), 2);
        assert_eq!(frame.chroma_height(), 1);
    }
}
