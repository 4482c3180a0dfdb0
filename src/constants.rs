//! Constants affecting codec resolution and backend defaults.

/// Type name substituted when writing to a path whose extension is missing
/// or unrecognised, and no explicit type was given.
pub const DEFAULT_OUTPUT_TYPE: &str = "wav";

/// Types tried, in order, when neither an explicit type nor the path's
/// extension selects a format.
///
/// The single entry is the general-purpose, container-probing reader.
pub const FALLBACK_TYPES: &[&str] = &["probe"];

/// Prefix attached to every resolution diagnostic.
pub const LOG_CONTEXT: &str = "dsp";

/// Sample rate assumed by headerless backends when none is supplied.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Channel count assumed by headerless backends when none is supplied.
pub const DEFAULT_CHANNELS: u32 = 1;

/// Encoding used by the `raw` and `wav` backends when none is requested.
pub const DEFAULT_ENCODING: &str = "s16";

/// Capacity, in frames, of the file buffers used by headerless backends.
pub(crate) const IO_BUFFER_FRAMES: usize = 4096;

/// Upper bound, in bytes, on those file buffers regardless of frame size.
pub(crate) const IO_BUFFER_MAX_BYTES: usize = 1 << 20;

#[cfg(test)]
/// Parameters for generated test fixtures.
pub mod test_data {
    /// Sample rate used for generated fixtures.
    pub const FIXTURE_RATE: u32 = 48_000;

    /// Length, in frames, of generated fixtures.
    pub const FIXTURE_FRAMES: usize = 4_800;
}
