use super::{Backend, BackendRequest, SampleEncoding};
use crate::{
    codec::{Codec, CodecError, CodecInfo, CodecInstance, CodecResult, Mode},
    constants::{DEFAULT_ENCODING, IO_BUFFER_FRAMES, IO_BUFFER_MAX_BYTES},
};
use byteorder::{BigEndian, LittleEndian};
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Result as IoResult, Seek, SeekFrom, Write},
};

/// Headerless interleaved PCM.
///
/// Nothing about the stream is stored in the file, so the sample rate, channel
/// count, encoding and byte order must be supplied on both read and write.
/// [`Endian::Default`] is little-endian.
///
/// [`Endian::Default`]: crate::codec::Endian::Default
#[derive(Clone, Copy, Debug, Default)]
pub struct RawBackend;

impl Backend for RawBackend {
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
        let params = request.params;
        let encoding: SampleEncoding = params
            .encoding
            .as_deref()
            .unwrap_or(DEFAULT_ENCODING)
            .parse()?;

        if params.channels == 0 {
            return Err(CodecError::InvalidParams("channel count must be nonzero"));
        }
        if params.rate == 0 {
            return Err(CodecError::InvalidParams("sample rate must be nonzero"));
        }

        let channels = usize::try_from(params.channels)
            .ok()
            .filter(|c| c.checked_mul(encoding.bytes()).is_some())
            .ok_or(CodecError::InvalidParams("frame size overflows usize"))?;

        let layout = Layout {
            encoding,
            big_endian: params.endian.is_big(),
            channels,
        };
        let capacity = layout
            .frame_bytes()
            .saturating_mul(IO_BUFFER_FRAMES)
            .min(IO_BUFFER_MAX_BYTES);

        let (frames, codec): (Option<u64>, Box<dyn Codec>) = match request.mode {
            Mode::Read => {
                let file = File::open(request.path)?;
                let frames = file.metadata()?.len() / layout.frame_bytes() as u64;
                let reader = BufReader::with_capacity(capacity, file);

                (
                    Some(frames),
                    Box::new(RawReader {
                        layout,
                        reader: Some(reader),
                    }),
                )
            },
            Mode::Write => {
                let file = File::create(request.path)?;
                let writer = BufWriter::with_capacity(capacity, file);

                (
                    None,
                    Box::new(RawWriter {
                        layout,
                        writer: Some(writer),
                    }),
                )
            },
        };

        let info = CodecInfo {
            path: request.path.to_string(),
            type_name: request.type_name.to_string(),
            encoding: encoding.name().to_string(),
            mode: request.mode,
            rate: params.rate,
            channels: params.channels,
            precision: encoding.bits(),
            frames,
        };

        Ok(CodecInstance::new(info, codec))
    }

    fn describe_encodings(&self, _type_name: &str, out: &mut dyn Write) -> IoResult<()> {
        let names: Vec<_> = SampleEncoding::ALL.iter().map(|e| e.name()).collect();
        write!(out, "{}", names.join(" "))
    }
}

#[derive(Clone, Copy, Debug)]
struct Layout {
    encoding: SampleEncoding,
    big_endian: bool,
    channels: usize,
}

impl Layout {
    fn frame_bytes(self) -> usize {
        self.encoding.bytes() * self.channels
    }
}

struct RawReader {
    layout: Layout,
    reader: Option<BufReader<File>>,
}

impl Codec for RawReader {
    fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        let layout = self.layout;
        let reader = self
            .reader
            .as_mut()
            .ok_or(CodecError::Unsupported("read after release"))?;

        let mut frames = 0;
        for frame in buf.chunks_exact_mut(layout.channels) {
            for sample in frame.iter_mut() {
                let res = if layout.big_endian {
                    layout.encoding.read_sample::<BigEndian, _>(reader)
                } else {
                    layout.encoding.read_sample::<LittleEndian, _>(reader)
                };

                match res {
                    Ok(s) => *sample = s,
                    // A trailing partial frame is dropped.
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(frames),
                    Err(e) => return Err(e.into()),
                }
            }
            frames += 1;
        }

        Ok(frames)
    }

    fn seek(&mut self, frame: u64) -> CodecResult<u64> {
        let frame_bytes = self.layout.frame_bytes() as u64;
        let reader = self
            .reader
            .as_mut()
            .ok_or(CodecError::Unsupported("seek after release"))?;

        let offset = frame
            .checked_mul(frame_bytes)
            .ok_or(CodecError::InvalidParams("seek target out of range"))?;
        let pos = reader.seek(SeekFrom::Start(offset))?;
        Ok(pos / frame_bytes)
    }

    fn release(&mut self) -> CodecResult<()> {
        self.reader = None;
        Ok(())
    }
}

struct RawWriter {
    layout: Layout,
    writer: Option<BufWriter<File>>,
}

impl Codec for RawWriter {
    fn write(&mut self, buf: &[f64]) -> CodecResult<usize> {
        let layout = self.layout;
        let writer = self
            .writer
            .as_mut()
            .ok_or(CodecError::Unsupported("write after release"))?;

        let mut frames = 0;
        for frame in buf.chunks_exact(layout.channels) {
            for &sample in frame {
                if layout.big_endian {
                    layout
                        .encoding
                        .write_sample::<BigEndian, _>(writer, sample)?;
                } else {
                    layout
                        .encoding
                        .write_sample::<LittleEndian, _>(writer, sample)?;
                }
            }
            frames += 1;
        }

        Ok(frames)
    }

    fn release(&mut self) -> CodecResult<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush().map_err(CodecError::from),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::{CodecParams, Endian},
        test_utils::make_sine,
    };

    fn request<'a>(path: &'a str, mode: Mode, params: &'a CodecParams) -> BackendRequest<'a> {
        BackendRequest {
            type_name: "raw",
            mode,
            path,
            params,
        }
    }

    #[test]
    fn written_samples_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.pcm");
        let path = path.to_str().unwrap();
        let params = CodecParams::default()
            .encoding("s24")
            .endian(Endian::Big)
            .channels(2);
        let sine = make_sine(256, 2);

        let mut out = RawBackend
            .construct(&request(path, Mode::Write, &params))
            .unwrap();
        assert_eq!(out.write(&sine).unwrap(), 256);
        out.destroy();

        let mut input = RawBackend
            .construct(&request(path, Mode::Read, &params))
            .unwrap();
        assert_eq!(input.info().frames, Some(256));
        assert_eq!(input.info().precision, 24);

        let mut back = vec![0.0; sine.len() + 10];
        assert_eq!(input.read(&mut back).unwrap(), 256);
        for (a, b) in sine.iter().zip(&back) {
            assert!((a - b).abs() < 1e-6);
        }
        assert_eq!(input.read(&mut back).unwrap(), 0);

        assert_eq!(input.seek(128).unwrap(), 128);
        assert_eq!(input.read(&mut back).unwrap(), 128);
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let params = CodecParams::default().encoding("mulaw");
        let res = RawBackend.construct(&request("unused.pcm", Mode::Write, &params));

        assert!(matches!(res, Err(CodecError::BadEncoding(e)) if e == "mulaw"));
    }

    #[test]
    fn zero_channels_is_rejected() {
        let params = CodecParams::default().channels(0);
        let res = RawBackend.construct(&request("unused.pcm", Mode::Read, &params));

        assert!(matches!(res, Err(CodecError::InvalidParams(_))));
    }

    #[test]
    fn huge_channel_count_does_not_size_buffers_from_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.raw");
        let params = CodecParams::default()
            .encoding("double")
            .channels(u32::MAX);

        match RawBackend.construct(&request(path.to_str().unwrap(), Mode::Write, &params)) {
            // Not even one frame fits in a short buffer.
            Ok(mut out) => assert_eq!(out.write(&[0.0; 16]).unwrap(), 0),
            Err(e) => assert!(matches!(e, CodecError::InvalidParams(_))),
        }
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.raw");
        let params = CodecParams::default();
        let res = RawBackend.construct(&request(path.to_str().unwrap(), Mode::Read, &params));

        assert!(matches!(res, Err(CodecError::Io(_))));
    }
}
