//! The receive pipeline.
//!
//! [`AisReceiver`] owns the whole working set: four channel scratch
//! buffers sized to one input buffer plus filter look-ahead, one frame
//! buffer, and the list of records decoded from the current buffer.
//! Nothing survives from one input buffer to the next; the vectors are
//! simply overwritten on every sweep.
//!
//! A sweep over one input buffer runs, in order: sample decoding,
//! decimation by 3, channel splitting, decimation to 50 kHz, FM/power
//! demodulation, then per channel (AIS 1 first) a scan loop that
//! locates bursts, recovers frame octets, checks the FCS and unpacks
//! the message fields.

use std::io::Write;

use tracing::{debug, info};

use crate::crc::crc16;
use crate::dsp::{channel, demod, fir};
use crate::error::Result;
use crate::hdlc::{BurstDecoder, HEADER_OCTETS, SYMBOL_RATE, TAIL_GUARD};
use crate::message::{AisMessage, REPORT_HEADER, REPORT_RULE};

/// Source sample rate in Hz.
pub const SOURCE_RATE: usize = 300_000;

/// Samples per input buffer (one second at [`SOURCE_RATE`]).
pub const FRAME_SAMPLES: usize = SOURCE_RATE;

/// Bytes per input buffer (interleaved I/Q).
pub const FRAME_BYTES: usize = 2 * FRAME_SAMPLES;

/// Final decimation factor, 100 kHz -> 50 kHz. The chain also works at
/// 1 or 3; the HDLC timing adapts through the rate it is handed.
pub const DECIMATE_FINAL: usize = 2;

/// Scratch headroom so the last filter windows may read past the
/// logical end of a stage, as the tail-suppressed outputs do.
const LOOKAHEAD_PAD: usize = fir::KERNEL_SPAN + 1;

/// Message body length in octets for a given message ID: ID 5 is 424
/// bits long, every other ID decoded here is 168.
fn body_octets(id: u8) -> usize {
    if id == 5 { 53 } else { 21 }
}

/// The AIS receive pipeline with its reusable working set.
#[derive(Debug)]
pub struct AisReceiver {
    i1: Vec<i32>,
    q1: Vec<i32>,
    i2: Vec<i32>,
    q2: Vec<i32>,
    burst: BurstDecoder,
    messages: Vec<AisMessage>,
}

impl AisReceiver {
    pub fn new() -> Self {
        Self {
            i1: vec![0; FRAME_SAMPLES + LOOKAHEAD_PAD],
            q1: vec![0; FRAME_SAMPLES + LOOKAHEAD_PAD],
            i2: vec![0; FRAME_SAMPLES / 3 + LOOKAHEAD_PAD],
            q2: vec![0; FRAME_SAMPLES / 3 + LOOKAHEAD_PAD],
            burst: BurstDecoder::new(),
            messages: Vec::new(),
        }
    }

    /// Process one buffer of interleaved unsigned 8-bit I/Q samples and
    /// return the records decoded from it, channel 1 first, each in
    /// sample order.
    ///
    /// `buffer` holds at most [`FRAME_BYTES`] bytes; a short final
    /// buffer is fine.
    pub fn process(&mut self, buffer: &[u8]) -> &[AisMessage] {
        self.messages.clear();
        let n = (buffer.len() / 2).min(FRAME_SAMPLES);
        if n == 0 {
            return &self.messages;
        }

        // complex baseband recovery: remove the 128 bias
        for k in 0..n {
            self.i1[k] = buffer[2 * k] as i32 - 128;
            self.q1[k] = buffer[2 * k + 1] as i32 - 128;
        }

        // 300 kHz -> 100 kHz
        let n = n / 3;
        let mut rate = SOURCE_RATE / 3;
        let keep = n.saturating_sub(fir::DECIMATE3_TAIL);
        fir::decimate_in_place(&mut self.i1, 3, &fir::H3, keep);
        fir::decimate_in_place(&mut self.q1, 3, &fir::H3, keep);

        channel::split(&mut self.i1, &mut self.q1, &mut self.i2, &mut self.q2, n);

        // per-channel low-pass and final decimation
        let n = n / DECIMATE_FINAL;
        rate /= DECIMATE_FINAL;
        let keep = n.saturating_sub(fir::DECIMATE_FINAL_TAIL);
        fir::decimate_in_place(&mut self.i1, DECIMATE_FINAL, &fir::H8, keep);
        fir::decimate_in_place(&mut self.q1, DECIMATE_FINAL, &fir::H8, keep);
        fir::decimate_in_place(&mut self.i2, DECIMATE_FINAL, &fir::H8, keep);
        fir::decimate_in_place(&mut self.q2, DECIMATE_FINAL, &fir::H8, keep);

        // power into I, frequency into Q
        demod::demodulate(&mut self.i1, &mut self.q1, n);
        demod::demodulate(&mut self.i2, &mut self.q2, n);

        let t = rate as f64 / SYMBOL_RATE;
        let tail = n.saturating_sub(TAIL_GUARD);
        let Self {
            i1,
            q1,
            i2,
            q2,
            burst,
            messages,
        } = self;
        for (power, freq) in [(&*i1, &*q1), (&*i2, &*q2)] {
            let mut pos = 0usize;
            while pos < tail {
                let (next, frame) = burst.decode(power, freq, n, t, pos);
                if let Some(frame) = frame
                    && let Some(msg) = check_frame(frame)
                {
                    messages.push(msg);
                }
                pos = next;
            }
        }
        &self.messages
    }

    /// Drain `source`, decoding every buffer and writing one line per
    /// record to `sink`, until the source ends.
    ///
    /// The column header and rule are written once up front; output is
    /// flushed after each buffer.
    pub fn run<S, W>(&mut self, source: S, sink: &mut W) -> Result<()>
    where
        S: IntoIterator<Item = std::io::Result<Vec<u8>>>,
        W: Write,
    {
        writeln!(sink, "{}", REPORT_HEADER)?;
        writeln!(sink, "{}", REPORT_RULE)?;
        sink.flush()?;
        let mut buffers = 0u64;
        for buffer in source {
            let buffer = buffer?;
            for msg in self.process(&buffer) {
                writeln!(sink, "{}", msg)?;
            }
            sink.flush()?;
            buffers += 1;
        }
        info!(buffers, "sample source ended");
        Ok(())
    }
}

impl Default for AisReceiver {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate one recovered frame and unpack it.
///
/// The body length follows from the message ID; the FCS sits
/// little-endian right after the body. A frame cut short by a fade or
/// corrupted in flight fails here and is silently dropped.
fn check_frame(frame: &[u8]) -> Option<AisMessage> {
    let payload = frame.get(HEADER_OCTETS..)?;
    if payload.is_empty() {
        return None;
    }
    let len = body_octets(AisMessage::id_of(payload));
    let fcs = payload.get(len..len + 2)?;
    let fcs = u16::from_le_bytes([fcs[0], fcs[1]]);
    if crc16(&payload[..len]) != fcs {
        debug!(expected = fcs, "frame check sequence mismatch");
        return None;
    }
    Some(AisMessage::unpack(&payload[..len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_no_records() {
        let mut rx = AisReceiver::new();
        assert!(rx.process(&[]).is_empty());
    }

    #[test]
    fn test_dc_buffer_no_records() {
        let mut rx = AisReceiver::new();
        let buffer = vec![128u8; FRAME_BYTES];
        assert!(rx.process(&buffer).is_empty());
    }

    #[test]
    fn test_short_buffer_no_records() {
        let mut rx = AisReceiver::new();
        let buffer = vec![128u8; 1000];
        assert!(rx.process(&buffer).is_empty());
    }

    #[test]
    fn test_check_frame_rejects_short_frames() {
        assert!(check_frame(&[]).is_none());
        assert!(check_frame(&[0xAA, 0xAA, 0xAA, 0x7E]).is_none());
        assert!(check_frame(&[0xAA, 0xAA, 0xAA, 0x7E, 0x04, 0x00]).is_none());
    }

    #[test]
    fn test_check_frame_crc_roundtrip() {
        let mut frame = vec![0xAAu8, 0xAA, 0xAA, 0x7E];
        let mut body = [0u8; 21];
        body[0] = 0x04; // ID 1 in the top six bits
        frame.extend_from_slice(&body);
        let fcs = crc16(&body);
        frame.extend_from_slice(&fcs.to_le_bytes());

        let msg = check_frame(&frame).expect("valid frame rejected");
        assert!(matches!(msg, AisMessage::Position { id: 1, .. }));

        // one flipped payload bit must fail the check
        frame[10] ^= 0x20;
        assert!(check_frame(&frame).is_none());
    }

    #[test]
    fn test_run_writes_header_once() {
        let mut rx = AisReceiver::new();
        let mut out = Vec::new();
        rx.run(std::iter::empty(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(REPORT_HEADER));
        assert_eq!(lines.next(), Some(REPORT_RULE));
        assert_eq!(lines.next(), None);
    }
}
