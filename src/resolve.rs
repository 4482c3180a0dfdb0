//! Selecting and opening a format for a request.
//!
//! Precedence is fixed:
//!  * an explicit type always wins, and a write with neither a type nor a
//!    recognised extension is given [`Config::default_output_type`];
//!  * otherwise the path's extension picks the format;
//!  * otherwise each of [`Config::fallback_types`] is tried in turn.
//!
//! The first two routes are terminal: once a format has been chosen, its
//! failure (wrong direction, or the backend refusing the stream) is reported
//! as-is. Only the fallback route moves on after a failure.

use crate::{
    backends::BackendRequest,
    codec::{CodecChain, CodecInstance, CodecParams, Mode},
    error::{OpenError, OpenResult},
    registry::{FormatDescriptor, Registry},
    Config,
};
use std::path::MAIN_SEPARATOR;
use tracing::{debug, error, trace};

/// Returns the final `.`-delimited suffix of the last component of `path`,
/// including the dot.
///
/// ```
/// use dsp_codec::resolve::path_extension;
///
/// assert_eq!(path_extension("takes/vox.Take2.WAV"), Some(".WAV"));
/// assert_eq!(path_extension("takes.d/vox"), None);
/// assert_eq!(path_extension(".raw"), Some(".raw"));
/// ```
#[must_use]
pub fn path_extension(path: &str) -> Option<&str> {
    let name_start = path
        .rfind(|c: char| c == '/' || c == MAIN_SEPARATOR)
        .map_or(0, |i| i + 1);
    let name = &path[name_start..];

    name.rfind('.').map(|i| &name[i..])
}

/// A request to open one stream.
#[derive(Clone, Debug)]
pub struct OpenRequest<'a> {
    /// Explicit format type, overriding extension inference.
    pub type_name: Option<&'a str>,
    /// File path or device name.
    pub path: &'a str,
    /// Access direction.
    pub mode: Mode,
    /// Parameters passed through to the backend.
    pub params: CodecParams,
}

impl<'a> OpenRequest<'a> {
    /// Creates a request with no explicit type and default parameters.
    #[must_use]
    pub fn new(path: &'a str, mode: Mode) -> Self {
        Self {
            type_name: None,
            path,
            mode,
            params: CodecParams::default(),
        }
    }

    /// Creates a request for a sample source.
    #[must_use]
    pub fn read(path: &'a str) -> Self {
        Self::new(path, Mode::Read)
    }

    /// Creates a request for a sample sink.
    #[must_use]
    pub fn write(path: &'a str) -> Self {
        Self::new(path, Mode::Write)
    }

    /// Sets the explicit format type.
    #[must_use]
    pub fn type_name(mut self, type_name: &'a str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Sets the backend parameters.
    #[must_use]
    pub fn params(mut self, params: CodecParams) -> Self {
        self.params = params;
        self
    }

    fn backend_request<'b>(&'b self, format: &'b FormatDescriptor) -> BackendRequest<'b> {
        BackendRequest {
            type_name: format.type_name(),
            mode: self.mode,
            path: self.path,
            params: &self.params,
        }
    }
}

/// Opens codecs against a [`Registry`], following the precedence rules above.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    config: Config,
}

impl Resolver {
    /// Creates a resolver over `config`'s registry.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns this resolver's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the registry this resolver searches.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.config.registry
    }

    /// Selects a format for `request` and opens it.
    ///
    /// Failures are logged at `error` level before being returned.
    pub fn open(&self, request: &OpenRequest<'_>) -> OpenResult<CodecInstance> {
        self.resolve(request)
            .map(|codec| {
                debug!(
                    "{}: opened {:?} as {} (mode '{}').",
                    self.config.log_context,
                    request.path,
                    codec.info().type_name,
                    request.mode
                );
                codec
            })
            .map_err(|e| {
                error!("{}: {}", self.config.log_context, e);
                e
            })
    }

    /// Opens `request` and, on success only, appends the codec to `chain`.
    pub fn open_into(&self, chain: &mut CodecChain, request: &OpenRequest<'_>) -> OpenResult<()> {
        let codec = self.open(request)?;
        chain.append(codec);

        Ok(())
    }

    fn resolve(&self, request: &OpenRequest<'_>) -> OpenResult<CodecInstance> {
        let registry = self.registry();
        let by_ext = path_extension(request.path).and_then(|ext| registry.by_extension(ext));

        let type_name = match request.type_name {
            Some(t) => Some(t),
            None if by_ext.is_none() && request.mode == Mode::Write => {
                trace!(
                    "No format inferred for {:?}; writing as {}.",
                    request.path,
                    self.config.default_output_type
                );
                Some(self.config.default_output_type.as_str())
            },
            None => None,
        };

        if let Some(type_name) = type_name {
            let format = registry
                .by_type(type_name)
                .ok_or_else(|| OpenError::UnknownType(type_name.to_string()))?;

            return construct(format, request);
        }

        if let Some(format) = by_ext {
            return construct(format, request);
        }

        self.fallback(request)
    }

    fn fallback(&self, request: &OpenRequest<'_>) -> OpenResult<CodecInstance> {
        let registry = self.registry();

        for type_name in &self.config.fallback_types {
            let format = match registry.by_type(type_name) {
                Some(format) => format,
                None => {
                    debug!("Fallback type {} is not registered.", type_name);
                    continue;
                },
            };

            if !format.modes().supports(request.mode) {
                debug!(
                    "Fallback type {} does not support mode '{}'.",
                    type_name, request.mode
                );
                continue;
            }

            match format.backend().construct(&request.backend_request(format)) {
                Ok(codec) => return Ok(codec),
                Err(e) => debug!(
                    "Fallback type {} could not open {:?}: {}",
                    type_name, request.path, e
                ),
            }
        }

        Err(OpenError::NoCodecAvailable {
            path: request.path.to_string(),
            mode: request.mode,
        })
    }
}

fn construct(format: &FormatDescriptor, request: &OpenRequest<'_>) -> OpenResult<CodecInstance> {
    if !format.modes().supports(request.mode) {
        return Err(OpenError::UnsupportedMode {
            type_name: format.type_name().to_string(),
            mode: request.mode,
        });
    }

    format
        .backend()
        .construct(&request.backend_request(format))
        .map_err(|source| OpenError::Backend {
            type_name: format.type_name().to_string(),
            path: request.path.to_string(),
            source,
        })
}
