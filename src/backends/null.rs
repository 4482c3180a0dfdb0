use super::{Backend, BackendRequest};
use crate::codec::{Codec, CodecError, CodecInfo, CodecInstance, CodecResult};
use std::io::{Result as IoResult, Write};

/// A device which reads endless silence and discards everything written to it.
///
/// Useful as a sink when only a pipeline's side effects matter, or as a
/// silent source of fixed rate and channel count.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
        let params = request.params;
        if params.channels == 0 {
            return Err(CodecError::InvalidParams("channel count must be nonzero"));
        }

        let info = CodecInfo {
            path: request.path.to_string(),
            type_name: request.type_name.to_string(),
            encoding: params
                .encoding
                .clone()
                .unwrap_or_else(|| "sample_t".to_string()),
            mode: request.mode,
            rate: params.rate,
            channels: params.channels,
            precision: 64,
            frames: None,
        };

        let codec = NullCodec {
            channels: params.channels as usize,
        };

        Ok(CodecInstance::new(info, Box::new(codec)))
    }

    fn describe_encodings(&self, _type_name: &str, out: &mut dyn Write) -> IoResult<()> {
        write!(out, "<any>")
    }
}

struct NullCodec {
    channels: usize,
}

impl Codec for NullCodec {
    fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        let frames = buf.len() / self.channels;
        for s in &mut buf[..frames * self.channels] {
            *s = 0.0;
        }

        Ok(frames)
    }

    fn write(&mut self, buf: &[f64]) -> CodecResult<usize> {
        Ok(buf.len() / self.channels)
    }

    fn seek(&mut self, frame: u64) -> CodecResult<u64> {
        Ok(frame)
    }

    fn release(&mut self) -> CodecResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecParams, Mode};

    #[test]
    fn reads_silence_in_whole_frames() {
        let params = CodecParams::default().channels(2);
        let mut null = NullBackend
            .construct(&BackendRequest {
                type_name: "null",
                mode: Mode::Read,
                path: "null",
                params: &params,
            })
            .unwrap();

        let mut buf = [1.0; 5];
        assert_eq!(null.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(null.info().frames, None);
    }
}
