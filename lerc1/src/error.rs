//! Error types for Lerc1 decoding.

use core::fmt;

/// The main error type for Lerc1 decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The blob is not a Lerc1 float raster.
    Format(FormatError),
    /// A read would run past the end of the blob.
    Truncated,
    /// The compressed stream is internally inconsistent.
    Stream(StreamError),
    /// The header describes an image that can't be decoded.
    Validation(ValidationError),
}

/// Errors related to the fixed preamble of the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The blob doesn't start with the `CntZImage ` token.
    InvalidMagic,
    /// The format version is not 11.
    UnsupportedVersion,
    /// The pixel type is not float32.
    UnsupportedPixelType,
}

/// Errors related to the mask and value streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The run-length stream is not terminated by the end marker.
    MissingEndMarker,
    /// A block has an encoding mode outside of 0-3.
    InvalidBlockMode,
    /// A width selector has the reserved value 3.
    InvalidWidthSelector,
    /// A packed integer array uses more than 32 bits per value.
    TooManyBits,
    /// A block has fewer packed values than valid pixels.
    MissingValues,
    /// The decoded mask has fewer bits than the image has pixels.
    MaskTooShort,
}

/// Errors related to image dimensions and the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The value block grid has no blocks in one dimension.
    InvalidBlockGrid,
    /// The image has more pixels than allowed.
    ImageTooLarge,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "{e}"),
            Self::Truncated => write!(f, "unexpected end of data"),
            Self::Stream(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid CntZImage signature"),
            Self::UnsupportedVersion => write!(f, "unsupported Lerc1 version"),
            Self::UnsupportedPixelType => write!(f, "unsupported pixel type"),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndMarker => write!(f, "missing end marker in run-length stream"),
            Self::InvalidBlockMode => write!(f, "invalid block encoding mode"),
            Self::InvalidWidthSelector => write!(f, "invalid width selector"),
            Self::TooManyBits => write!(f, "too many bits per packed value"),
            Self::MissingValues => write!(f, "block contains too few packed values"),
            Self::MaskTooShort => write!(f, "mask is shorter than the image"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBlockGrid => write!(f, "invalid block grid"),
            Self::ImageTooLarge => write!(f, "image is too large"),
        }
    }
}

impl core::error::Error for DecodeError {}
impl core::error::Error for FormatError {}
impl core::error::Error for StreamError {}
impl core::error::Error for ValidationError {}

impl From<FormatError> for DecodeError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<StreamError> for DecodeError {
    fn from(e: StreamError) -> Self {
        Self::Stream(e)
    }
}

impl From<ValidationError> for DecodeError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Result type for Lerc1 decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
