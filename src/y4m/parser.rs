//! Zero-copy indexing of YUV4MPEG2 byte buffers

use super::header::{self, StreamHeader};
use super::stream::{FramePlanes, VideoStream};
use crate::error::{Error, Result};
use crate::util::Buffer;
use tracing::debug;

/// Parse a complete in-memory YUV4MPEG2 payload into an indexed stream.
///
/// The buffer is scanned once: the stream header line, then for each frame
/// a `FRAME` header line followed by the luma, Cb and Cr planes, whose
/// locations are recorded as ranges without copying. A buffer that ends
/// mid-line or mid-plane yields `Error::Truncated` rather than a partial
/// stream.
pub fn parse(buffer: Buffer) -> Result<VideoStream> {
    let data = buffer.as_slice();

    let (line, mut cursor) = take_line(data, 0, "stream header")?;
    let header = StreamHeader::parse(line)?;

    let luma_len = header.luma_plane_len();
    let chroma_len = header.chroma_plane_len();
    let block_len = header.frame_len();

    let mut frames = Vec::new();
    while cursor < data.len() {
        let (line, body) = take_line(data, cursor, "frame header")?;
        header::validate_frame_header(line)?;

        let have = data.len() - body;
        if have < block_len {
            return Err(Error::truncated(format!(
                "frame {} needs {} plane bytes, {} remain",
                frames.len(),
                block_len,
                have
            )));
        }

        let luma = body..body + luma_len;
        let cb = luma.end..luma.end + chroma_len;
        let cr = cb.end..cb.end + chroma_len;
        cursor = cr.end;
        frames.push(FramePlanes { luma, cb, cr });
    }

    debug!(
        frames = frames.len(),
        width = header.width,
        height = header.height,
        colorspace = %header.colorspace,
        "indexed y4m stream"
    );

    Ok(VideoStream::new(buffer, header, frames))
}

/// Take one `\n`-terminated line starting at `start`, returning the line
/// (terminator excluded) and the offset just past it. A buffer that ends
/// before the terminator is a truncated stream.
fn take_line<'a>(data: &'a [u8], start: usize, what: &str) -> Result<(&'a [u8], usize)> {
    match data[start..].iter().position(|&b| b == b'\n') {
        Some(pos) => Ok((&data[start..start + pos], start + pos + 1)),
        None => Err(Error::truncated(format!(
            "{} line is missing its newline terminator",
            what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_bytes(frame_count: usize) -> Vec<u8> {
        let mut data = b"YUV4MPEG2 W4 H2 F25:1 Ip A1:1 C420jpeg\n".to_vec();
        for i in 0..frame_count {
            data.extend_from_slice(b"FRAME\n");
            data.extend_from_slice(&[i as u8; 12]);
        }
        data
    }

    #[test]
    fn test_parse_counts_frames() {
        let stream = parse(Buffer::from_vec(stream_bytes(3))).unwrap();
        assert_eq!(stream.frame_count(), 3);
        assert_eq!(stream.frame(2).unwrap().luma[0], 2);
    }

    #[test]
    fn test_header_only_stream_is_empty() {
        let stream = parse(Buffer::from_vec(stream_bytes(0))).unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn test_truncated_plane_reported() {
        let mut data = stream_bytes(2);
        data.truncate(data.len() - 1);
        assert!(matches!(
            parse(Buffer::from_vec(data)),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn test_missing_newline_reported() {
        let data = b"YUV4MPEG2 W4 H2 F25:1".to_vec();
        assert!(matches!(
            parse(Buffer::from_vec(data)),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn test_bad_frame_magic_reported() {
        let mut data = stream_bytes(1);
        data.extend_from_slice(b"FRUME\n");
        data.extend_from_slice(&[0u8; 12]);
        assert!(matches!(
            parse(Buffer::from_vec(data)),
            Err(Error::Parse(_))
        ));
    }
}
