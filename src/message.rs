//! ITU-R M.1371 message field extraction.
//!
//! The validated frame body is treated as a big-endian bit stream: bit
//! offset `b` selects octet `b / 8`, bit position `7 - (b % 8)`. Field
//! offsets below are taken from Recommendation ITU-R M.1371-5, tables
//! 46 (position report), 48 (base station report) and 51 (static and
//! voyage related data).

use std::fmt;

/// Read `width` unsigned bits starting at bit offset `from`, MSB first.
pub(crate) fn bits(payload: &[u8], from: usize, width: usize) -> u32 {
    let mut r = 0u32;
    for b in from..from + width {
        r <<= 1;
        if payload[b >> 3] & (1 << (7 - (b & 7))) != 0 {
            r |= 1;
        }
    }
    r
}

/// Sign-extend a 28-bit longitude field (1/10000 minute, east positive).
fn signed_lon(raw: u32) -> i32 {
    if raw & (1 << 27) != 0 {
        raw as i32 - (1 << 28)
    } else {
        raw as i32
    }
}

/// Sign-extend a 27-bit latitude field (1/10000 minute, north positive).
fn signed_lat(raw: u32) -> i32 {
    if raw & (1 << 26) != 0 {
        raw as i32 - (1 << 27)
    } else {
        raw as i32
    }
}

/// Decode a run of 6-bit characters into the ITU alphabet: values below
/// 32 map to `@A..Z[\]^_`, the rest are ASCII as-is.
fn six_bit_string(payload: &[u8], from: usize, width: usize) -> String {
    (0..width / 6)
        .map(|k| {
            let v = bits(payload, from + 6 * k, 6) as u8;
            char::from(if v < 32 { v + 64 } else { v })
        })
        .collect()
}

/// Minute fractions per degree: geographic fields count 1/10000 minute.
const COORD_SCALE: f64 = 600_000.0;

/// Knots-to-km/h, applied to the raw tenth-of-knot speed field.
const KNOT_TENTH_KMH: f64 = 0.1852;

/// One decoded AIS report.
#[derive(Debug, Clone, PartialEq)]
pub enum AisMessage {
    /// Position report from shipborne mobile equipment (IDs 1, 2, 3)
    Position {
        id: u8,
        mmsi: u32,
        /// Degrees, east positive
        lon: f64,
        /// Degrees, north positive
        lat: f64,
        /// Speed over ground in km/h
        speed: f64,
        /// Course over ground in degrees
        course: f64,
    },
    /// Base station report (ID 4)
    BaseStation {
        mmsi: u32,
        lon: f64,
        lat: f64,
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
    /// Static and voyage related vessel data (ID 5)
    StaticVoyage {
        mmsi: u32,
        /// 7 characters
        callsign: String,
        /// 20 characters
        name: String,
        /// 20 characters
        destination: String,
    },
    /// Any other message ID; carried through without failing the
    /// pipeline.
    Unknown { id: u8, mmsi: u32 },
}

impl AisMessage {
    /// Message ID carried in the first six payload bits.
    pub(crate) fn id_of(payload: &[u8]) -> u8 {
        bits(payload, 0, 6) as u8
    }

    /// Unpack one validated message body.
    ///
    /// `payload` must hold the full body for its message ID (21 octets,
    /// or 53 for ID 5); the caller checks this along with the CRC.
    pub fn unpack(payload: &[u8]) -> AisMessage {
        let id = Self::id_of(payload);
        let mmsi = bits(payload, 8, 30);
        match id {
            1..=3 => AisMessage::Position {
                id,
                mmsi,
                lon: signed_lon(bits(payload, 61, 28)) as f64 / COORD_SCALE,
                lat: signed_lat(bits(payload, 89, 27)) as f64 / COORD_SCALE,
                speed: KNOT_TENTH_KMH * bits(payload, 50, 10) as f64,
                course: bits(payload, 116, 12) as f64 / 10.0,
            },
            4 => AisMessage::BaseStation {
                mmsi,
                lon: signed_lon(bits(payload, 79, 28)) as f64 / COORD_SCALE,
                lat: signed_lat(bits(payload, 107, 27)) as f64 / COORD_SCALE,
                year: bits(payload, 38, 14) as u16,
                month: bits(payload, 52, 4) as u8,
                day: bits(payload, 56, 5) as u8,
                hour: bits(payload, 61, 5) as u8,
                minute: bits(payload, 66, 6) as u8,
                second: bits(payload, 72, 6) as u8,
            },
            5 => AisMessage::StaticVoyage {
                mmsi,
                callsign: six_bit_string(payload, 70, 42),
                name: six_bit_string(payload, 112, 120),
                destination: six_bit_string(payload, 302, 120),
            },
            _ => AisMessage::Unknown { id, mmsi },
        }
    }
}

/// Column header for the line-oriented report output.
pub const REPORT_HEADER: &str = " MID    MMSI      longitude   latitude     speed    course";

/// Rule printed under the header.
pub const REPORT_RULE: &str =
    "-------------------------------------------------------------";

impl fmt::Display for AisMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AisMessage::Position {
                id,
                mmsi,
                lon,
                lat,
                speed,
                course,
            } => write!(
                f,
                " {:2}  {:9}  {:11.6} {:11.6}  {:3.0} km/h   {:5.1}",
                id, mmsi, lon, lat, speed, course
            ),
            AisMessage::BaseStation {
                mmsi,
                lon,
                lat,
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => write!(
                f,
                " {:2}  {:9}  {:11.6} {:11.6}  {}/{}/{}  {:02}:{:02}:{:02} ",
                4, mmsi, lon, lat, year, month, day, hour, minute, second
            ),
            AisMessage::StaticVoyage {
                mmsi,
                callsign,
                name,
                destination,
            } => write!(
                f,
                " {:2}  {:9}  {} << {} >> {}",
                5, mmsi, callsign, name, destination
            ),
            AisMessage::Unknown { id, mmsi } => {
                write!(f, " {:2}  {:9}  Unknown message ID", id, mmsi)
            }
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
