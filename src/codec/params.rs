use crate::constants::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};

/// Byte order requested for sample data.
///
/// Only headerless backends consult this; self-describing containers
/// ignore it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Endian {
    /// Let the backend pick (little-endian for `raw`).
    #[default]
    Default,
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
    /// Whatever the host uses.
    Native,
}

impl Endian {
    /// Collapses [`Endian::Default`] and [`Endian::Native`] into a concrete order.
    #[must_use]
    pub fn is_big(self) -> bool {
        match self {
            Endian::Big => true,
            Endian::Little | Endian::Default => false,
            Endian::Native => cfg!(target_endian = "big"),
        }
    }
}

/// Format parameters handed through to a backend's constructor.
///
/// The registry never validates these; backends decide which fields
/// matter to them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodecParams {
    /// Requested sample encoding, e.g. `"s16"` or `"float"`.
    ///
    /// `None` lets the backend choose its default.
    pub encoding: Option<String>,
    /// Requested byte order.
    pub endian: Endian,
    /// Sample rate, in Hz.
    ///
    /// *Defaults to 44100.*
    pub rate: u32,
    /// Interleaved channel count.
    ///
    /// *Defaults to 1.*
    pub channels: u32,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            encoding: None,
            endian: Endian::Default,
            rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

impl CodecParams {
    /// Sets the requested sample encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Sets the requested byte order.
    #[must_use]
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Sets the sample rate.
    #[must_use]
    pub fn rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the channel count.
    #[must_use]
    pub fn channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }
}
