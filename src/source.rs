//! Sample transport.
//!
//! This module provides functionality to read fixed-size buffers of
//! interleaved unsigned 8-bit I/Q samples from various byte streams:
//! files, standard input, and TCP connections to an `rtl_tcp` server.
//! Both a synchronous iterator interface and an asynchronous
//! [`futures::Stream`] interface are available; the receiver itself is
//! synchronous and blocking, so the async variant exists for hosts
//! that already run an executor.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::io::AsyncRead;

/// Synchronous frame reader: yields buffers of `2 * frame_samples`
/// bytes from any [`Read`].
pub struct FrameSource<R: Read> {
    reader: R,
    frame_bytes: usize,
}

impl<R: Read> FrameSource<R> {
    /// Wrap an arbitrary byte stream. `frame_samples` is the number of
    /// I/Q pairs per yielded buffer; [`crate::FRAME_SAMPLES`] gives
    /// one-second buffers at the nominal rate.
    pub fn new(reader: R, frame_samples: usize) -> Self {
        Self {
            reader,
            frame_bytes: 2 * frame_samples,
        }
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, std::io::Error> {
        let mut buffer = vec![0u8; self.frame_bytes];
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

impl FrameSource<std::io::BufReader<std::fs::File>> {
    /// Open a recorded I/Q capture. A leading `~` is expanded to the
    /// home directory.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        frame_samples: usize,
    ) -> Result<Self, std::io::Error> {
        let path = expanduser(path.as_ref().to_path_buf());
        let file = std::fs::File::open(path)?;
        Ok(Self::new(std::io::BufReader::new(file), frame_samples))
    }
}

impl FrameSource<std::io::BufReader<std::io::Stdin>> {
    pub fn from_stdin(frame_samples: usize) -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), frame_samples)
    }
}

impl FrameSource<std::io::BufReader<std::net::TcpStream>> {
    pub fn from_tcp(addr: &str, port: u16, frame_samples: usize) -> Result<Self, std::io::Error> {
        let stream = std::net::TcpStream::connect((addr, port))?;
        Ok(Self::new(std::io::BufReader::new(stream), frame_samples))
    }
}

impl<R: Read> Iterator for FrameSource<R> {
    type Item = Result<Vec<u8>, std::io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(buffer) => Some(Ok(buffer)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Asynchronous frame reader over any [`AsyncRead`].
///
/// Partially filled frames survive across `poll_next` calls; a partial
/// frame at end of stream is yielded as-is (the receiver handles short
/// final buffers).
pub struct AsyncFrameSource<R: AsyncRead + Unpin> {
    reader: R,
    buffer: Vec<u8>,
    filled: usize,
}

impl<R: AsyncRead + Unpin> AsyncFrameSource<R> {
    pub fn new(reader: R, frame_samples: usize) -> Self {
        Self {
            reader,
            buffer: vec![0u8; 2 * frame_samples],
            filled: 0,
        }
    }
}

impl AsyncFrameSource<tokio::io::BufReader<tokio::fs::File>> {
    pub async fn from_file<P: AsRef<Path>>(
        path: P,
        frame_samples: usize,
    ) -> Result<Self, std::io::Error> {
        let path = expanduser(path.as_ref().to_path_buf());
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(tokio::io::BufReader::new(file), frame_samples))
    }
}

impl AsyncFrameSource<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn from_stdin(frame_samples: usize) -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()), frame_samples)
    }
}

impl AsyncFrameSource<tokio::io::BufReader<tokio::net::TcpStream>> {
    pub async fn from_tcp(
        addr: &str,
        port: u16,
        frame_samples: usize,
    ) -> Result<Self, std::io::Error> {
        let stream = tokio::net::TcpStream::connect((addr, port)).await?;
        Ok(Self::new(tokio::io::BufReader::new(stream), frame_samples))
    }
}

impl<R: AsyncRead + Unpin> Stream for AsyncFrameSource<R> {
    type Item = Result<Vec<u8>, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        while this.filled < this.buffer.len() {
            let mut read_buf = tokio::io::ReadBuf::new(&mut this.buffer[this.filled..]);
            match Pin::new(&mut this.reader).poll_read(cx, &mut read_buf) {
                Poll::Ready(Ok(())) => {
                    let n = read_buf.filled().len();
                    if n == 0 {
                        break; // end of stream
                    }
                    this.filled += n;
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Some(Err(e))),
                Poll::Pending => return Poll::Pending,
            }
        }

        let filled = std::mem::take(&mut this.filled);
        if filled == 0 {
            return Poll::Ready(None);
        }
        let capacity = this.buffer.len();
        let mut frame = std::mem::replace(&mut this.buffer, vec![0u8; capacity]);
        frame.truncate(filled);
        Poll::Ready(Some(Ok(frame)))
    }
}

/// RTL-SDR dongle information sent once by `rtl_tcp` ahead of the
/// sample stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtlTcpGreeting {
    pub tuner_type: u32,
    pub tuner_gain_count: u32,
}

impl RtlTcpGreeting {
    /// Consume the 12-byte `RTL0` banner from `reader`. Returns `None`
    /// when the magic does not match (the peer is not `rtl_tcp`; twelve
    /// sample bytes are lost, which the receiver absorbs).
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>, std::io::Error> {
        let mut banner = [0u8; 12];
        reader.read_exact(&mut banner)?;
        if &banner[..4] != b"RTL0" {
            return Ok(None);
        }
        Ok(Some(Self {
            tuner_type: u32::from_be_bytes([banner[4], banner[5], banner[6], banner[7]]),
            tuner_gain_count: u32::from_be_bytes([banner[8], banner[9], banner[10], banner[11]]),
        }))
    }
}

fn expanduser(path: PathBuf) -> PathBuf {
    if let Some(stripped) = path.to_str().and_then(|p| p.strip_prefix("~"))
        && let Some(home_dir) = dirs::home_dir()
    {
        return home_dir.join(stripped.trim_start_matches('/'));
    }
    path
}
