//! The table of known formats, and lookups over it.
//!
//! A [`Registry`] is assembled once, then shared immutably (usually as an
//! `Arc<Registry>` inside a [`Config`]). Registration order matters: it fixes
//! the listing order, and it decides which format wins when two claim the
//! same file extension (the earlier one does).
//!
//! [`Config`]: crate::Config

use crate::{
    backends::*,
    codec::Modes,
    error::RegistryError,
};
use derivative::Derivative;
use lazy_static::lazy_static;
use std::{
    io::{self, Result as IoResult, Write},
    slice,
    sync::Arc,
};

lazy_static! {
    /// Default format table, containing every backend enabled at compile time.
    pub static ref DEFAULT_REGISTRY: Arc<Registry> = Arc::new(default_registry());
}

/// Builds a fresh copy of the default format table.
#[must_use]
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();

    #[cfg(feature = "decode")]
    registry.register_builtin(FormatDescriptor::new(
        "probe",
        Modes::Read,
        SymphoniaBackend::new(&["flac", "vorbis", "mp3", "aac", "alac", "pcm"]),
    ));

    #[cfg(feature = "wav")]
    registry.register_builtin(
        FormatDescriptor::new("wav", Modes::ReadWrite, WavBackend).extensions(&[".wav"]),
    );

    registry.register_builtin(
        FormatDescriptor::new("raw", Modes::ReadWrite, RawBackend).extensions(&[".raw", ".pcm"]),
    );

    #[cfg(feature = "decode")]
    {
        registry.register_builtin(
            FormatDescriptor::new("flac", Modes::Read, SymphoniaBackend::new(&["flac"]))
                .extensions(&[".flac"]),
        );
        registry.register_builtin(
            FormatDescriptor::new("ogg", Modes::Read, SymphoniaBackend::new(&["vorbis"]))
                .extensions(&[".ogg", ".oga"]),
        );
        registry.register_builtin(
            FormatDescriptor::new(
                "mkv",
                Modes::Read,
                SymphoniaBackend::new(&["vorbis", "flac", "pcm", "aac"]),
            )
            .extensions(&[".mkv", ".mka", ".webm"]),
        );
        registry.register_builtin(
            FormatDescriptor::new("mp4", Modes::Read, SymphoniaBackend::new(&["aac", "alac"]))
                .extensions(&[".mp4", ".m4a"]),
        );
        registry.register_builtin(
            FormatDescriptor::new("mp3", Modes::Read, SymphoniaBackend::new(&["mp3"]))
                .extensions(&[".mp3"]),
        );
    }

    registry.register_builtin(FormatDescriptor::new("null", Modes::ReadWrite, NullBackend));

    registry
}

/// One supported format: how it is named, recognised and opened.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct FormatDescriptor {
    type_name: String,
    extensions: Vec<String>,
    modes: Modes,
    #[derivative(Debug = "ignore")]
    backend: Arc<dyn Backend>,
}

impl FormatDescriptor {
    /// Creates a descriptor with no extension aliases.
    pub fn new(type_name: impl Into<String>, modes: Modes, backend: impl Backend + 'static) -> Self {
        Self::with_shared_backend(type_name, modes, Arc::new(backend))
    }

    /// Creates a descriptor around a backend already shared with other descriptors.
    pub fn with_shared_backend(
        type_name: impl Into<String>,
        modes: Modes,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            extensions: Vec::new(),
            modes,
            backend,
        }
    }

    /// Sets the file extensions (each with its leading `.`) recognised as this format.
    ///
    /// Earlier aliases are checked first.
    #[must_use]
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| (*e).to_string()).collect();
        self
    }

    /// Unique type name of this format.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Extension aliases, in declared order.
    #[must_use]
    pub fn extension_aliases(&self) -> &[String] {
        &self.extensions
    }

    /// Access directions this format supports.
    #[must_use]
    pub fn modes(&self) -> Modes {
        self.modes
    }

    /// The backend which opens this format.
    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Returns whether `ext` (with its leading `.`) is one of this format's aliases,
    /// ignoring ASCII case.
    #[must_use]
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.type_name.is_empty() {
            return Err(RegistryError::EmptyTypeName);
        }

        match self
            .extensions
            .iter()
            .find(|e| e.len() < 2 || !e.starts_with('.'))
        {
            Some(bad) => Err(RegistryError::BadAlias {
                type_name: self.type_name.clone(),
                alias: bad.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// An ordered table of [`FormatDescriptor`]s.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    formats: Vec<FormatDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Appends a format to the table.
    ///
    /// Fails if the type name is empty or already registered, or if an alias
    /// lacks its leading `.`. Sharing an alias with an earlier format is allowed,
    /// though the earlier format will always be chosen for it.
    pub fn register(&mut self, format: FormatDescriptor) -> Result<(), RegistryError> {
        format.validate()?;

        if self.by_type(format.type_name()).is_some() {
            return Err(RegistryError::DuplicateType(format.type_name));
        }

        self.formats.push(format);
        Ok(())
    }

    /// Consuming form of [`register`], for building a table in one expression.
    ///
    /// [`register`]: Registry::register
    pub fn with(mut self, format: FormatDescriptor) -> Result<Self, RegistryError> {
        self.register(format)?;
        Ok(self)
    }

    fn register_builtin(&mut self, format: FormatDescriptor) {
        debug_assert!(format.validate().is_ok());
        debug_assert!(self.by_type(format.type_name()).is_none());
        self.formats.push(format);
    }

    /// Finds the format registered under exactly `type_name`.
    #[must_use]
    pub fn by_type(&self, type_name: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.type_name == type_name)
    }

    /// Finds the earliest-registered format claiming `ext` (with its leading `.`),
    /// ignoring ASCII case.
    ///
    /// Formats without aliases never match.
    #[must_use]
    pub fn by_extension(&self, ext: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.matches_extension(ext))
    }

    /// Iterates over all formats in registration order.
    pub fn iter(&self) -> slice::Iter<'_, FormatDescriptor> {
        self.formats.iter()
    }

    /// Iterates over all type names in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> + '_ {
        self.formats.iter().map(FormatDescriptor::type_name)
    }

    /// Number of registered formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Returns whether no formats are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Writes a human-readable table of every format to `out`.
    ///
    /// ```text
    /// types:
    ///   type:    modes: encodings:
    ///   wav      rw    u8 s16 s24 s32 float
    /// ```
    pub fn describe_all(&self, out: &mut dyn Write) -> IoResult<()> {
        writeln!(out, "types:")?;
        writeln!(out, "  type:    modes: encodings:")?;

        for format in &self.formats {
            write!(out, "  {:<8} {}    ", format.type_name, format.modes.flags())?;
            format.backend.describe_encodings(&format.type_name, out)?;
            writeln!(out)?;
        }

        Ok(())
    }

    /// Writes [`describe_all`] to standard error, ignoring write failures.
    ///
    /// [`describe_all`]: Registry::describe_all
    pub fn print_all(&self) {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        let _ = self.describe_all(&mut lock);
    }
}

impl<'a> IntoIterator for &'a Registry {
    type IntoIter = slice::Iter<'a, FormatDescriptor>;
    type Item = &'a FormatDescriptor;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
