//! YUV4MPEG2 header line parsing

use crate::error::{Error, Result};
use crate::util::Rational;
use std::fmt;
use tracing::debug;

/// Magic tag opening the stream header line
pub const STREAM_MAGIC: &[u8] = b"YUV4MPEG2";

/// Magic tag opening every frame header line
pub const FRAME_MAGIC: &[u8] = b"FRAME";

/// Chroma layout declared by the `C` stream parameter.
///
/// Only the 4:2:0 family is supported: all four tags share the same plane
/// geometry (full-resolution luma, half-resolution Cb and Cr) and differ
/// only in chroma siting, which nearest-neighbor conversion does not
/// distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    /// 4:2:0 with default (JPEG) siting
    C420,
    /// 4:2:0 with JPEG siting, explicit
    C420Jpeg,
    /// 4:2:0 with PAL-DV siting
    C420Paldv,
    /// 4:2:0 with MPEG-2 siting
    C420Mpeg2,
}

impl Colorspace {
    /// Parse the value of a `C` parameter (without the leading `C`)
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "420" => Ok(Colorspace::C420),
            "420jpeg" => Ok(Colorspace::C420Jpeg),
            "420paldv" => Ok(Colorspace::C420Paldv),
            "420mpeg2" => Ok(Colorspace::C420Mpeg2),
            other => Err(Error::unsupported(format!("colorspace C{}", other))),
        }
    }

    /// The header tag for this colorspace (without the leading `C`)
    pub fn tag(&self) -> &'static str {
        match self {
            Colorspace::C420 => "420",
            Colorspace::C420Jpeg => "420jpeg",
            Colorspace::C420Paldv => "420paldv",
            Colorspace::C420Mpeg2 => "420mpeg2",
        }
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.tag())
    }
}

/// Interlacing mode declared by the `I` stream parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interlacing {
    Progressive,
    TopFieldFirst,
    BottomFieldFirst,
    Mixed,
}

impl Interlacing {
    /// Parse the value of an `I` parameter (without the leading `I`)
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "p" => Ok(Interlacing::Progressive),
            "t" => Ok(Interlacing::TopFieldFirst),
            "b" => Ok(Interlacing::BottomFieldFirst),
            "m" => Ok(Interlacing::Mixed),
            other => Err(Error::parse(format!("unknown interlacing mode I{}", other))),
        }
    }
}

impl fmt::Display for Interlacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interlacing::Progressive => "progressive",
            Interlacing::TopFieldFirst => "top-field-first",
            Interlacing::BottomFieldFirst => "bottom-field-first",
            Interlacing::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

/// Parsed stream header (`YUV4MPEG2 W… H… F… [I…] [A…] [C…]`)
///
/// `W`, `H` and `F` are required. Width and height must be even: 4:2:0
/// chroma planes are exactly `(W/2)*(H/2)` samples, so odd dimensions would
/// silently drop samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Frame rate in frames per second
    pub frame_rate: Rational,

    /// Interlacing mode (progressive when absent)
    pub interlacing: Interlacing,

    /// Pixel aspect ratio, if declared (`A0:0` means unknown)
    pub pixel_aspect: Option<Rational>,

    /// Chroma layout (4:2:0 when absent)
    pub colorspace: Colorspace,
}

impl StreamHeader {
    /// Parse a stream header line (without its `\n` terminator)
    pub fn parse(line: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(line)
            .map_err(|_| Error::parse("stream header is not valid ASCII"))?;
        if !text.is_ascii() {
            return Err(Error::parse("stream header is not valid ASCII"));
        }
        let mut tokens = text.split_ascii_whitespace();

        if tokens.next().map(str::as_bytes) != Some(STREAM_MAGIC) {
            return Err(Error::parse("missing YUV4MPEG2 magic"));
        }

        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut frame_rate: Option<Rational> = None;
        let mut interlacing = Interlacing::Progressive;
        let mut pixel_aspect = None;
        let mut colorspace = Colorspace::C420;

        for param in tokens {
            let (tag, value) = param.split_at(1);
            match tag {
                "W" => {
                    width = Some(value.parse().map_err(|_| {
                        Error::parse(format!("bad width parameter W{}", value))
                    })?);
                }
                "H" => {
                    height = Some(value.parse().map_err(|_| {
                        Error::parse(format!("bad height parameter H{}", value))
                    })?);
                }
                "F" => {
                    let rate = parse_ratio(value)
                        .ok_or_else(|| Error::parse(format!("bad frame rate F{}", value)))?;
                    if !rate.is_positive() {
                        return Err(Error::parse(format!("bad frame rate F{}", value)));
                    }
                    frame_rate = Some(rate);
                }
                "I" => interlacing = Interlacing::from_tag(value)?,
                "A" => {
                    let aspect = parse_ratio(value)
                        .ok_or_else(|| Error::parse(format!("bad aspect ratio A{}", value)))?;
                    pixel_aspect = aspect.is_positive().then_some(aspect);
                }
                "C" => colorspace = Colorspace::from_tag(value)?,
                "X" => debug!(param, "ignoring stream header comment"),
                _ => debug!(param, "ignoring unknown stream header parameter"),
            }
        }

        let width = width.ok_or_else(|| Error::parse("stream header missing width (W)"))?;
        let height = height.ok_or_else(|| Error::parse("stream header missing height (H)"))?;
        let frame_rate =
            frame_rate.ok_or_else(|| Error::parse("stream header missing frame rate (F)"))?;

        if width == 0 || height == 0 {
            return Err(Error::parse(format!(
                "degenerate frame dimensions {}x{}",
                width, height
            )));
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(Error::parse(format!(
                "4:2:0 requires even dimensions, got {}x{}",
                width, height
            )));
        }

        Ok(StreamHeader {
            width,
            height,
            frame_rate,
            interlacing,
            pixel_aspect,
            colorspace,
        })
    }

    /// Chroma plane width (half the luma width)
    pub fn chroma_width(&self) -> u32 {
        self.width / 2
    }

    /// Chroma plane height (half the luma height)
    pub fn chroma_height(&self) -> u32 {
        self.height / 2
    }

    /// Luma plane size in bytes
    pub fn luma_plane_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in bytes of each chroma plane
    pub fn chroma_plane_len(&self) -> usize {
        self.chroma_width() as usize * self.chroma_height() as usize
    }

    /// Total payload size of one frame block (luma plus both chroma planes)
    pub fn frame_len(&self) -> usize {
        self.luma_plane_len() + 2 * self.chroma_plane_len()
    }
}

/// Check that a frame header line is `FRAME`, optionally followed by
/// space-separated parameters (which carry no information we consume).
pub(crate) fn validate_frame_header(line: &[u8]) -> Result<()> {
    let valid = line.strip_prefix(FRAME_MAGIC).is_some_and(|rest| {
        rest.is_empty() || rest[0] == b' '
    });
    if valid {
        Ok(())
    } else {
        Err(Error::parse(format!(
            "bad frame header line: {:?}",
            String::from_utf8_lossy(line)
        )))
    }
}

fn parse_ratio(value: &str) -> Option<Rational> {
    let (num, den) = value.split_once(':')?;
    let num: i64 = num.parse().ok()?;
    let den: i64 = den.parse().ok()?;
    Some(Rational::new(num, den))
}
