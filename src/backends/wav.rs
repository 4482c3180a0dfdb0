use super::{encoding::quantise, Backend, BackendRequest, SampleEncoding};
use crate::{
    codec::{Codec, CodecError, CodecInfo, CodecInstance, CodecResult, Mode},
    constants::DEFAULT_ENCODING,
};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Result as IoResult, Write},
};

const WRITE_ENCODINGS: [SampleEncoding; 5] = [
    SampleEncoding::U8,
    SampleEncoding::S16,
    SampleEncoding::S24,
    SampleEncoding::S32,
    SampleEncoding::Float,
];

/// RIFF/WAVE files, via `hound`.
///
/// Any integer or float PCM file can be read, and its own header overrides the
/// requested rate and channel count. Writes use the requested parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavBackend;

impl Backend for WavBackend {
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
        match request.mode {
            Mode::Read => open_reader(request),
            Mode::Write => open_writer(request),
        }
    }

    fn describe_encodings(&self, _type_name: &str, out: &mut dyn Write) -> IoResult<()> {
        let names: Vec<_> = WRITE_ENCODINGS.iter().map(|e| e.name()).collect();
        write!(out, "{}", names.join(" "))
    }
}

fn encoding_of(spec: WavSpec) -> String {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => SampleEncoding::Float.name().to_string(),
        (SampleFormat::Float, bits) => format!("float{bits}"),
        (SampleFormat::Int, 8) => SampleEncoding::U8.name().to_string(),
        (SampleFormat::Int, bits) => format!("s{bits}"),
    }
}

fn open_reader(request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
    let reader = WavReader::open(request.path)?;
    let spec = reader.spec();

    let info = CodecInfo {
        path: request.path.to_string(),
        type_name: request.type_name.to_string(),
        encoding: encoding_of(spec),
        mode: Mode::Read,
        rate: spec.sample_rate,
        channels: u32::from(spec.channels),
        precision: u32::from(spec.bits_per_sample),
        frames: Some(u64::from(reader.duration())),
    };

    let codec = WavSource {
        channels: usize::from(spec.channels),
        spec,
        reader: Some(reader),
    };

    Ok(CodecInstance::new(info, Box::new(codec)))
}

fn open_writer(request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
    let params = request.params;
    let encoding: SampleEncoding = params
        .encoding
        .as_deref()
        .unwrap_or(DEFAULT_ENCODING)
        .parse()?;

    if !WRITE_ENCODINGS.contains(&encoding) {
        return Err(CodecError::BadEncoding(encoding.name().to_string()));
    }

    let channels = u16::try_from(params.channels)
        .ok()
        .filter(|c| *c != 0)
        .ok_or(CodecError::InvalidParams("channel count must be in 1..=65535"))?;

    if params.rate == 0 {
        return Err(CodecError::InvalidParams("sample rate must be nonzero"));
    }

    let spec = WavSpec {
        channels,
        sample_rate: params.rate,
        bits_per_sample: encoding.bits() as u16,
        sample_format: if encoding.is_float() {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let writer = WavWriter::create(request.path, spec)?;

    let info = CodecInfo {
        path: request.path.to_string(),
        type_name: request.type_name.to_string(),
        encoding: encoding.name().to_string(),
        mode: Mode::Write,
        rate: params.rate,
        channels: params.channels,
        precision: encoding.bits(),
        frames: None,
    };

    let codec = WavSink {
        channels: usize::from(channels),
        spec,
        writer: Some(writer),
    };

    Ok(CodecInstance::new(info, Box::new(codec)))
}

struct WavSource {
    channels: usize,
    spec: WavSpec,
    reader: Option<WavReader<BufReader<File>>>,
}

impl Codec for WavSource {
    fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        let reader = self
            .reader
            .as_mut()
            .ok_or(CodecError::Unsupported("read after release"))?;
        let want = (buf.len() / self.channels) * self.channels;
        let mut n = 0;

        match self.spec.sample_format {
            SampleFormat::Float =>
                for s in reader.samples::<f32>().take(want) {
                    buf[n] = f64::from(s?);
                    n += 1;
                },
            SampleFormat::Int => {
                let scale = f64::from(1_u32 << (self.spec.bits_per_sample - 1));
                for s in reader.samples::<i32>().take(want) {
                    buf[n] = f64::from(s?) / scale;
                    n += 1;
                }
            },
        }

        Ok(n / self.channels)
    }

    fn seek(&mut self, frame: u64) -> CodecResult<u64> {
        let reader = self
            .reader
            .as_mut()
            .ok_or(CodecError::Unsupported("seek after release"))?;
        let target = u32::try_from(frame)
            .unwrap_or(u32::MAX)
            .min(reader.duration());

        reader.seek(target)?;
        Ok(u64::from(target))
    }

    fn release(&mut self) -> CodecResult<()> {
        self.reader = None;
        Ok(())
    }
}

struct WavSink {
    channels: usize,
    spec: WavSpec,
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl Codec for WavSink {
    fn write(&mut self, buf: &[f64]) -> CodecResult<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(CodecError::Unsupported("write after release"))?;
        let frames = buf.len() / self.channels;
        let bits = u32::from(self.spec.bits_per_sample);

        for &s in &buf[..frames * self.channels] {
            match self.spec.sample_format {
                SampleFormat::Float => writer.write_sample(s as f32)?,
                SampleFormat::Int => writer.write_sample(quantise(s, bits))?,
            }
        }

        Ok(frames)
    }

    fn release(&mut self) -> CodecResult<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(CodecError::from),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::CodecParams, test_utils::make_sine};

    #[test]
    fn finalised_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let path = path.to_str().unwrap();
        let params = CodecParams::default().rate(48_000).channels(2).encoding("float");
        let sine = make_sine(480, 2);

        let mut out = WavBackend
            .construct(&BackendRequest {
                type_name: "wav",
                mode: Mode::Write,
                path,
                params: &params,
            })
            .unwrap();
        assert_eq!(out.write(&sine).unwrap(), 480);
        out.destroy();

        // Reader ignores requested parameters in favour of the header.
        let defaults = CodecParams::default();
        let mut input = WavBackend
            .construct(&BackendRequest {
                type_name: "wav",
                mode: Mode::Read,
                path,
                params: &defaults,
            })
            .unwrap();

        let info = input.info().clone();
        assert_eq!(info.rate, 48_000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.encoding, "float");
        assert_eq!(info.frames, Some(480));

        let mut back = vec![0.0; sine.len()];
        assert_eq!(input.read(&mut back).unwrap(), 480);
        for (a, b) in sine.iter().zip(&back) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn sixty_four_bit_float_is_not_writable() {
        let params = CodecParams::default().encoding("double");
        let res = WavBackend.construct(&BackendRequest {
            type_name: "wav",
            mode: Mode::Write,
            path: "unused.wav",
            params: &params,
        });

        assert!(matches!(res, Err(CodecError::BadEncoding(e)) if e == "double"));
    }
}
