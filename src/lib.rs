#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! `dsp-codec` decides which audio format handles a stream, opens it, and keeps
//! track of open streams until they are torn down.
//!
//! The crate offers:
//!  * A [`Registry`] of formats, each with a canonical type name, any number of
//!  case-insensitive extension aliases (`.wav`, `.WAV`, ...), and the directions
//!  it supports.
//!  * A [`Resolver`], which picks a format for a request using a fixed
//!  precedence (explicit type, then extension, then a fallback list) and opens it.
//!  Writes to paths with no recognised extension default to `wav`.
//!  * A [`CodecChain`] which owns open [`CodecInstance`]s in the order they were
//!  opened, releasing each exactly once.
//!
//! ```no_run
//! use dsp_codec::{CodecChain, CodecParams, OpenRequest, Resolver};
//!
//! # fn main() -> Result<(), dsp_codec::error::OpenError> {
//! let resolver = Resolver::default();
//! let mut chain = CodecChain::new();
//!
//! resolver.open_into(&mut chain, &OpenRequest::read("in.flac"))?;
//! resolver.open_into(
//!     &mut chain,
//!     &OpenRequest::write("out").params(CodecParams::default().rate(48_000)),
//! )?;
//!
//! chain.destroy_all();
//! # Ok(())
//! # }
//! ```
//!
//! ## Codec support
//! Reading of FLAC, Ogg Vorbis, MP3, MKV/WebM and MP4 (AAC, ALAC) goes through
//! [Symphonia] under the `"decode"` feature; this also provides the `probe` type,
//! which identifies a container from its contents and is the default fallback.
//! WAV reading and writing uses [hound] under the `"wav"` feature. Headerless
//! `raw` PCM and the `null` device are always available.
//!
//! [Symphonia]: https://github.com/pdeljanov/Symphonia
//! [hound]: https://github.com/ruuda/hound

#![warn(clippy::pedantic)]
#![allow(
    // Allowed as they are too pedantic
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    // TODO: would require significant rewriting of all existing docs
    clippy::missing_errors_doc,
)]

pub mod backends;
pub mod codec;
mod config;
pub mod constants;
pub mod error;
pub mod registry;
pub mod resolve;
#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    codec::{
        Codec,
        CodecChain,
        CodecInfo,
        CodecInstance,
        CodecParams,
        Endian,
        Mode,
        Modes,
    },
    config::Config,
    registry::{FormatDescriptor, Registry},
    resolve::{OpenRequest, Resolver},
};

use crate::error::OpenResult;

/// Opens a codec against the default registry and configuration.
///
/// `type_name` overrides extension inference when present. Failures are
/// logged before being returned.
pub fn open(
    type_name: Option<&str>,
    path: &str,
    mode: Mode,
    params: CodecParams,
) -> OpenResult<CodecInstance> {
    let request = OpenRequest {
        type_name,
        path,
        mode,
        params,
    };

    Resolver::default().open(&request)
}
