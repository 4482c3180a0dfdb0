use super::Mode;
#[cfg(feature = "wav")]
use hound::Error as WavError;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    io::Error as IoError,
};
#[cfg(feature = "decode")]
use symphonia::core::errors::Error as SymphoniaError;

/// Errors reported by a codec backend while opening, using or releasing a stream.
///
/// The registry treats these as opaque: they are logged and passed back to
/// the caller unchanged.
#[derive(Debug)]
#[non_exhaustive]
pub enum CodecError {
    /// Miscellaneous I/O error from the underlying file or device.
    Io(IoError),
    #[cfg(feature = "decode")]
    /// Failed to probe, demux or decode a container.
    Symphonia(SymphoniaError),
    #[cfg(feature = "wav")]
    /// Failed to read or write a RIFF/WAVE stream.
    Wav(WavError),
    /// The requested sample encoding is not offered by this backend.
    BadEncoding(String),
    /// A format parameter is unusable for this backend (e.g., zero channels).
    InvalidParams(&'static str),
    /// The container held no track which could be decoded.
    NoTrack,
    /// The backend does not offer this operation at all.
    Unsupported(&'static str),
    /// The operation belongs to the other access direction.
    ///
    /// Holds the mode the codec was opened with.
    WrongMode(Mode),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(e) => write!(f, "i/o failure: {e}"),
            #[cfg(feature = "decode")]
            Self::Symphonia(e) => write!(f, "failed to parse stream: {e}"),
            #[cfg(feature = "wav")]
            Self::Wav(e) => write!(f, "wav stream failure: {e}"),
            Self::BadEncoding(enc) => write!(f, "bad encoding: {enc}"),
            Self::InvalidParams(why) => write!(f, "invalid parameters: {why}"),
            Self::NoTrack => write!(f, "no decodable track found"),
            Self::Unsupported(op) => write!(f, "{op} is not supported"),
            Self::WrongMode(mode) => write!(f, "codec was opened in mode '{mode}'"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "decode")]
            Self::Symphonia(e) => Some(e),
            #[cfg(feature = "wav")]
            Self::Wav(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for CodecError {
    fn from(e: IoError) -> Self {
        CodecError::Io(e)
    }
}

#[cfg(feature = "decode")]
impl From<SymphoniaError> for CodecError {
    fn from(e: SymphoniaError) -> Self {
        CodecError::Symphonia(e)
    }
}

#[cfg(feature = "wav")]
impl From<WavError> for CodecError {
    fn from(e: WavError) -> Self {
        CodecError::Wav(e)
    }
}

/// Convenience type for backend operations.
pub type CodecResult<T> = Result<T, CodecError>;
