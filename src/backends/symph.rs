use super::{Backend, BackendRequest};
use crate::{
    codec::{Codec, CodecError, CodecInfo, CodecInstance, CodecResult, Mode},
    resolve::path_extension,
};
use std::{
    fs::File,
    io::{ErrorKind, Result as IoResult, Write},
};
use symphonia::{
    core::{
        audio::SampleBuffer,
        codecs::{Decoder, DecoderOptions},
        errors::Error as SymphError,
        formats::{FormatOptions, FormatReader, SeekMode, SeekTo},
        io::MediaSourceStream,
        meta::MetadataOptions,
        probe::Hint,
    },
    default::{get_codecs, get_probe},
};

/// Read-only containers demuxed and decoded by Symphonia.
///
/// The same backend serves every registry entry it is listed under; the path's
/// extension is passed on as a probe hint, and the container's own header
/// decides the rest. Entries differ only in the encodings they advertise.
#[derive(Clone, Copy, Debug)]
pub struct SymphoniaBackend {
    encodings: &'static [&'static str],
}

impl SymphoniaBackend {
    /// Creates a backend advertising `encodings` in registry listings.
    #[must_use]
    pub const fn new(encodings: &'static [&'static str]) -> Self {
        Self { encodings }
    }
}

impl Backend for SymphoniaBackend {
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
        if request.mode != Mode::Read {
            return Err(CodecError::Unsupported("encoding"));
        }

        let file = File::open(request.path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path_extension(request.path) {
            hint.with_extension(ext.trim_start_matches('.'));
        }

        let probed = get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format = probed.format;
        let codecs = get_codecs();

        // Prefer the default track; otherwise take the first track we can decode.
        let (decoder, track_id) = format
            .default_track()
            .and_then(|track| {
                codecs
                    .make(&track.codec_params, &DecoderOptions::default())
                    .ok()
                    .map(|d| (d, track.id))
            })
            .or_else(|| {
                format.tracks().iter().find_map(|track| {
                    codecs
                        .make(&track.codec_params, &DecoderOptions::default())
                        .ok()
                        .map(|d| (d, track.id))
                })
            })
            .ok_or(CodecError::NoTrack)?;

        let params = decoder.codec_params();
        let channels = params
            .channels
            .map_or(request.params.channels, |c| c.count() as u32);

        if channels == 0 {
            return Err(CodecError::InvalidParams("stream reports no channels"));
        }

        let info = CodecInfo {
            path: request.path.to_string(),
            type_name: request.type_name.to_string(),
            encoding: codecs
                .get_codec(params.codec)
                .map_or("unknown", |desc| desc.short_name)
                .to_string(),
            mode: Mode::Read,
            rate: params.sample_rate.unwrap_or(request.params.rate),
            channels,
            precision: params.bits_per_sample.unwrap_or(32),
            frames: params.n_frames,
        };

        let codec = SymphoniaSource {
            format: Some(format),
            decoder,
            track_id,
            channels: channels as usize,
            sample_buf: None,
            pending: Vec::new(),
            pending_pos: 0,
            done: false,
        };

        Ok(CodecInstance::new(info, Box::new(codec)))
    }

    fn describe_encodings(&self, _type_name: &str, out: &mut dyn Write) -> IoResult<()> {
        write!(out, "{}", self.encodings.join(" "))
    }
}

struct SymphoniaSource {
    format: Option<Box<dyn FormatReader>>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
    sample_buf: Option<SampleBuffer<f64>>,
    pending: Vec<f64>,
    pending_pos: usize,
    done: bool,
}

impl SymphoniaSource {
    /// Decodes the next packet of our track into `pending`.
    ///
    /// Returns `false` once the stream is exhausted.
    fn refill(&mut self) -> CodecResult<bool> {
        let format = match self.format.as_mut() {
            Some(format) => format,
            None => return Ok(false),
        };

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    self.done = true;
                    return Ok(false);
                },
                Err(SymphError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                },
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Malformed packets are skipped, not fatal.
                Err(SymphError::DecodeError(_)) => continue,
                Err(e) => return Err(e.into()),
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let needed = decoded.capacity() * spec.channels.count();
            if self
                .sample_buf
                .as_ref()
                .map_or(true, |buf| buf.capacity() < needed)
            {
                self.sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }

            if let Some(sample_buf) = self.sample_buf.as_mut() {
                sample_buf.copy_interleaved_ref(decoded);
                self.pending.clear();
                self.pending.extend_from_slice(sample_buf.samples());
                self.pending_pos = 0;
            }

            return Ok(true);
        }
    }
}

impl Codec for SymphoniaSource {
    fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        let want = (buf.len() / self.channels) * self.channels;
        let mut filled = 0;

        while filled < want {
            let available = self.pending.len() - self.pending_pos;
            if available != 0 {
                let n = available.min(want - filled);
                buf[filled..filled + n]
                    .copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + n]);
                filled += n;
                self.pending_pos += n;
                continue;
            }

            if self.done || !self.refill()? {
                break;
            }
        }

        Ok(filled / self.channels)
    }

    fn seek(&mut self, frame: u64) -> CodecResult<u64> {
        let format = self
            .format
            .as_mut()
            .ok_or(CodecError::Unsupported("seek after release"))?;

        let seeked = format.seek(SeekMode::Accurate, SeekTo::TimeStamp {
            ts: frame,
            track_id: self.track_id,
        })?;

        self.decoder.reset();
        self.pending.clear();
        self.pending_pos = 0;
        self.done = false;

        Ok(seeked.actual_ts)
    }

    fn release(&mut self) -> CodecResult<()> {
        self.format = None;
        self.sample_buf = None;
        self.pending = Vec::new();
        Ok(())
    }
}
