//! Concrete format backends, and the contract the registry consumes them through.
//!
//! Each registry entry holds one [`Backend`]: a constructor for live
//! [`CodecInstance`]s, and a description of the sample encodings it offers.
//! Several entries may share a backend type (every symphonia-driven reader is
//! a [`SymphoniaBackend`], for instance) since the canonical type name is
//! passed through on each request.
//!
//! [`CodecInstance`]: crate::codec::CodecInstance

mod encoding;
mod null;
mod raw;
#[cfg(feature = "decode")]
mod symph;
#[cfg(feature = "wav")]
mod wav;

pub use self::{encoding::SampleEncoding, null::NullBackend, raw::RawBackend};
#[cfg(feature = "decode")]
pub use self::symph::SymphoniaBackend;
#[cfg(feature = "wav")]
pub use self::wav::WavBackend;

use crate::codec::{CodecInstance, CodecParams, CodecResult, Mode};
use std::io::{Result as IoResult, Write};

/// Everything a backend is told about a stream it must open.
///
/// Borrowed data must not be retained beyond [`Backend::construct`].
#[derive(Clone, Copy, Debug)]
pub struct BackendRequest<'a> {
    /// Canonical registry type name of the selected format.
    pub type_name: &'a str,
    /// Requested access direction.
    pub mode: Mode,
    /// File path or device name.
    pub path: &'a str,
    /// Caller-supplied format parameters.
    pub params: &'a CodecParams,
}

/// A family of codecs which can be opened by the registry.
pub trait Backend: Send + Sync {
    /// Opens `request.path` as a live codec.
    ///
    /// May be called any number of times, for any number of concurrent instances.
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance>;

    /// Writes the sample encodings offered under `type_name` to `out`, on one line
    /// and without a trailing newline.
    fn describe_encodings(&self, type_name: &str, out: &mut dyn Write) -> IoResult<()>;
}
