#![allow(missing_docs)]

use crate::{
    backends::{Backend, BackendRequest},
    codec::{Codec, CodecError, CodecInfo, CodecInstance, CodecResult, Mode},
};
use parking_lot::Mutex;
use std::{
    f64::consts::PI,
    io::{Result as IoResult, Write},
    sync::Arc,
};

/// Shared record of backend activity, in call order.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    constructs: Arc<Mutex<Vec<String>>>,
    releases: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// `"type:path"` for every construct attempt, successful or not.
    pub fn constructs(&self) -> Vec<String> {
        self.constructs.lock().clone()
    }

    /// Path of every released instance.
    pub fn releases(&self) -> Vec<String> {
        self.releases.lock().clone()
    }
}

pub struct FakeBackend {
    log: CallLog,
    fail: bool,
}

impl FakeBackend {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    /// A backend whose every construct call fails after being recorded.
    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }
}

impl Backend for FakeBackend {
    fn construct(&self, request: &BackendRequest<'_>) -> CodecResult<CodecInstance> {
        self.log
            .constructs
            .lock()
            .push(format!("{}:{}", request.type_name, request.path));

        if self.fail {
            return Err(CodecError::Unsupported("fake"));
        }

        let info = CodecInfo {
            path: request.path.to_string(),
            type_name: request.type_name.to_string(),
            encoding: request
                .params
                .encoding
                .clone()
                .unwrap_or_else(|| "fake".to_string()),
            mode: request.mode,
            rate: request.params.rate,
            channels: request.params.channels,
            precision: 64,
            frames: None,
        };

        let codec = FakeCodec::new(&self.log, request.path, request.params.channels);

        Ok(CodecInstance::new(info, Box::new(codec)))
    }

    fn describe_encodings(&self, _type_name: &str, out: &mut dyn Write) -> IoResult<()> {
        write!(out, "fake")
    }
}

struct FakeCodec {
    log: CallLog,
    name: String,
    channels: usize,
    fail_release: bool,
}

impl FakeCodec {
    fn new(log: &CallLog, name: &str, channels: u32) -> Self {
        Self {
            log: log.clone(),
            name: name.to_string(),
            channels: (channels as usize).max(1),
            fail_release: false,
        }
    }
}

impl Codec for FakeCodec {
    fn read(&mut self, buf: &mut [f64]) -> CodecResult<usize> {
        buf.fill(0.0);
        Ok(buf.len() / self.channels)
    }

    fn write(&mut self, buf: &[f64]) -> CodecResult<usize> {
        Ok(buf.len() / self.channels)
    }

    fn release(&mut self) -> CodecResult<()> {
        self.log.releases.lock().push(self.name.clone());

        if self.fail_release {
            Err(CodecError::Unsupported("release"))
        } else {
            Ok(())
        }
    }
}

fn fake_info(name: &str, mode: Mode) -> CodecInfo {
    CodecInfo {
        path: name.to_string(),
        type_name: "fake".to_string(),
        encoding: "fake".to_string(),
        mode,
        rate: 48_000,
        channels: 1,
        precision: 64,
        frames: None,
    }
}

/// A mono instance which records its release under `name`.
pub fn fake_instance(log: &CallLog, name: &str, mode: Mode) -> CodecInstance {
    CodecInstance::new(fake_info(name, mode), Box::new(FakeCodec::new(log, name, 1)))
}

/// As [`fake_instance`], but whose release reports an error once recorded.
pub fn failing_release_instance(log: &CallLog, name: &str) -> CodecInstance {
    let mut codec = FakeCodec::new(log, name, 1);
    codec.fail_release = true;

    CodecInstance::new(fake_info(name, Mode::Read), Box::new(codec))
}

/// Interleaved 440Hz sine at 48kHz, half scale, identical on every channel.
pub fn make_sine(frames: usize, channels: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(frames * channels);

    for i in 0..frames {
        let sample = 0.5 * (2.0 * PI * 440.0 * (i as f64) / 48_000.0).sin();
        out.extend(std::iter::repeat(sample).take(channels));
    }

    out
}
