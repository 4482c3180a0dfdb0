//! Opened codec instances and the chains which own them.
//!
//! A [`CodecInstance`] combines a backend's live state (any [`Codec`]) with
//! a [`CodecInfo`] describing the stream. Samples cross this boundary as
//! interleaved `f64` values in `[-1.0, 1.0]`, so a buffer of `n` frames
//! holds `n * channels` samples.
//!
//! Instances are normally collected into a [`CodecChain`], which destroys
//! them in FIFO order. An instance's backend is released exactly once:
//! [`CodecInstance::destroy`] consumes the instance, and dropping an
//! instance which was never destroyed releases it on the way out.

mod chain;
mod error;
mod mode;
mod params;

pub use self::{chain::*, error::*, mode::*, params::*};

use derivative::Derivative;
use tracing::{trace, warn};

/// Live backend state for one opened stream.
///
/// Sources override [`read`], sinks override [`write`]. All backends must
/// provide [`release`], which frees file handles, devices and decoder state
/// without freeing the instance itself.
///
/// [`read`]: Codec::read
/// [`write`]: Codec::write
/// [`release`]: Codec::release
pub trait Codec: Send {
    /// Fills `buf` with whole interleaved frames, returning the number of
    /// frames read. `Ok(0)` signals the end of the stream.
    fn read(&mut self, _buf: &mut [f64]) -> CodecResult<usize> {
        Err(CodecError::WrongMode(Mode::Write))
    }

    /// Consumes whole interleaved frames from `buf`, returning the number of
    /// frames written.
    fn write(&mut self, _buf: &[f64]) -> CodecResult<usize> {
        Err(CodecError::WrongMode(Mode::Read))
    }

    /// Moves the stream to the given frame, returning the frame actually reached.
    fn seek(&mut self, _frame: u64) -> CodecResult<u64> {
        Err(CodecError::Unsupported("seek"))
    }

    /// Number of frames buffered inside the backend and not yet audible or on disk.
    fn delay(&self) -> u64 {
        0
    }

    /// Releases all backend resources.
    ///
    /// Called exactly once, by [`CodecInstance`].
    fn release(&mut self) -> CodecResult<()>;
}

/// Description of an opened stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodecInfo {
    /// Path (or device name) the codec was opened on.
    pub path: String,
    /// Canonical registry type of the backend which opened it.
    pub type_name: String,
    /// Name of the sample encoding in use.
    pub encoding: String,
    /// Access direction.
    pub mode: Mode,
    /// Sample rate, in Hz.
    pub rate: u32,
    /// Interleaved channel count.
    pub channels: u32,
    /// Effective bits per sample.
    pub precision: u32,
    /// Total length in frames, if the backend knows it.
    pub frames: Option<u64>,
}

/// An opened codec, owned by exactly one holder at a time.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CodecInstance {
    info: CodecInfo,
    #[derivative(Debug = "ignore")]
    backend: Box<dyn Codec>,
    released: bool,
}

impl CodecInstance {
    /// Wraps a backend's live state.
    pub fn new(info: CodecInfo, backend: Box<dyn Codec>) -> Self {
        Self {
            info,
            backend,
            released: false,
        }
    }

    /// Returns the description of this stream.
    #[must_use]
    pub fn info(&self) -> &CodecInfo {
        &self.info
    }

    /// Reads whole frames into `buf`. See [`Codec::read`].
    pub fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        if self.info.mode != Mode::Read {
            return Err(CodecError::WrongMode(self.info.mode));
        }

        self.backend.read(buf)
    }

    /// Writes whole frames from `buf`. See [`Codec::write`].
    pub fn write(&mut self, buf: &[f64]) -> CodecResult<usize> {
        if self.info.mode != Mode::Write {
            return Err(CodecError::WrongMode(self.info.mode));
        }

        self.backend.write(buf)
    }

    /// Seeks to `frame`. See [`Codec::seek`].
    pub fn seek(&mut self, frame: u64) -> CodecResult<u64> {
        self.backend.seek(frame)
    }

    /// See [`Codec::delay`].
    #[must_use]
    pub fn delay(&self) -> u64 {
        self.backend.delay()
    }

    /// Releases the backend and frees this instance.
    ///
    /// Release failures are logged and otherwise ignored.
    pub fn destroy(mut self) {
        self.release_backend();
    }

    fn release_backend(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        trace!("Releasing {} codec on {:?}.", self.info.type_name, self.info.path);

        if let Err(e) = self.backend.release() {
            warn!(
                "{}: {}: failed to release cleanly: {}",
                self.info.type_name, self.info.path, e
            );
        }
    }
}

impl Drop for CodecInstance {
    fn drop(&mut self) {
        self.release_backend();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fake_instance, CallLog};

    #[test]
    fn destroy_releases_once() {
        let log = CallLog::default();
        let instance = fake_instance(&log, "a", Mode::Read);

        instance.destroy();

        assert_eq!(log.releases(), vec!["a"]);
    }

    #[test]
    fn dropping_undestroyed_instance_still_releases() {
        let log = CallLog::default();
        {
            let _instance = fake_instance(&log, "a", Mode::Write);
        }

        assert_eq!(log.releases(), vec!["a"]);
    }

    #[test]
    fn direction_is_enforced_before_backend() {
        let log = CallLog::default();
        let mut instance = fake_instance(&log, "a", Mode::Write);

        let mut buf = [0.0; 4];
        assert!(matches!(
            instance.read(&mut buf),
            Err(CodecError::WrongMode(Mode::Write))
        ));
        assert_eq!(instance.write(&buf).ok(), Some(4));
    }
}
