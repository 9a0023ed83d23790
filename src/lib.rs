#![doc = include_str!("../readme.md")]

use tracing::{info, warn};

pub mod crc;
pub mod dsp;
pub mod error;
pub mod hdlc;
pub mod message;
pub mod receiver;
pub mod source;

pub use error::{Error, Result};
pub use message::AisMessage;
pub use receiver::{AisReceiver, DECIMATE_FINAL, FRAME_BYTES, FRAME_SAMPLES, SOURCE_RATE};
pub use source::{AsyncFrameSource, FrameSource, RtlTcpGreeting};

/**
 * Synchronous sample source (iterable)
 */
pub enum SampleSource {
    /// File-based capture playback
    File(FrameSource<std::io::BufReader<std::fs::File>>),
    /// Stdin-based pipe input
    Stdin(FrameSource<std::io::BufReader<std::io::Stdin>>),
    /// Live `rtl_tcp` connection
    RtlTcp(FrameSource<std::io::BufReader<std::net::TcpStream>>),
}

impl Iterator for SampleSource {
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SampleSource::File(source) => source.next(),
            SampleSource::Stdin(source) => source.next(),
            SampleSource::RtlTcp(source) => source.next(),
        }
    }
}

impl SampleSource {
    /// Replay a recorded I/Q capture.
    pub fn from_file<P: AsRef<std::path::Path>>(
        path: P,
        frame_samples: usize,
    ) -> std::io::Result<Self> {
        Ok(SampleSource::File(FrameSource::from_file(
            path,
            frame_samples,
        )?))
    }

    /// Read interleaved I/Q bytes from standard input.
    pub fn from_stdin(frame_samples: usize) -> Self {
        SampleSource::Stdin(FrameSource::from_stdin(frame_samples))
    }

    /// Connect to an `rtl_tcp` server and consume its greeting.
    ///
    /// The server is expected to be tuned externally, e.g.
    /// `rtl_tcp -f 162e6 -s 300000 -a 127.0.0.1 -p 2345 -g 48.0`.
    pub fn from_rtl_tcp(addr: &str, port: u16, frame_samples: usize) -> std::io::Result<Self> {
        let mut stream = std::net::TcpStream::connect((addr, port))?;
        match RtlTcpGreeting::read_from(&mut stream)? {
            Some(greeting) => info!(
                tuner_type = greeting.tuner_type,
                gain_count = greeting.tuner_gain_count,
                "connected to rtl_tcp"
            ),
            None => warn!("peer did not send an RTL0 greeting"),
        }
        Ok(SampleSource::RtlTcp(FrameSource::new(
            std::io::BufReader::new(stream),
            frame_samples,
        )))
    }
}
