use std::fmt::{Display, Formatter, Result as FmtResult};

/// Access direction requested when opening a codec.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// The codec is a sample source.
    Read,
    /// The codec is a sample sink.
    Write,
}

impl Mode {
    /// Single-character flag used in diagnostics (`'r'` or `'w'`).
    #[must_use]
    pub const fn as_char(self) -> char {
        use Mode::*;
        match self {
            Read => 'r',
            Write => 'w',
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_char())
    }
}

/// Set of access directions a format supports.
///
/// Every format supports at least one direction, so there is no empty variant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Modes {
    /// Sources only.
    Read,
    /// Sinks only.
    Write,
    /// Both sources and sinks.
    ReadWrite,
}

impl Modes {
    /// Returns whether `mode` is a member of this set.
    #[must_use]
    pub const fn supports(self, mode: Mode) -> bool {
        matches!(
            (self, mode),
            (Modes::ReadWrite, _) | (Modes::Read, Mode::Read) | (Modes::Write, Mode::Write)
        )
    }

    /// Two-column flag render used by registry listings: `"rw"`, `"r "` or `" w"`.
    #[must_use]
    pub fn flags(self) -> String {
        let r = if self.supports(Mode::Read) { 'r' } else { ' ' };
        let w = if self.supports(Mode::Write) { 'w' } else { ' ' };

        [r, w].iter().collect()
    }
}

impl From<Mode> for Modes {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Read => Modes::Read,
            Mode::Write => Modes::Write,
        }
    }
}
