//! Wire format of a single serial frame
//!
//! A frame on the wire is
//!
//! ```text
//! [START_MARKER][len][type][data ...][crc]
//! ```
//!
//! `len` counts everything between itself and the checksum, i.e. the type
//! byte plus the data bytes, so a frame always carries at least one payload
//! byte. The checksum is CRC-8/SMBUS computed over `len` and the counted
//! payload; the start marker is not covered.
//!
//! There is no byte stuffing. While receiving, payload bytes are consumed
//! by count, so a `0x7E` inside data is harmless; the marker only matters
//! when the parser is hunting for a frame boundary after corruption.
use crc::{Crc, CRC_8_SMBUS};
use heapless::Vec;

/// First byte of every frame.
pub const START_MARKER: u8 = 0x7e;

/// Maximum counted payload (type byte + data) - limited by the single
/// length byte.
pub const MAX_PAYLOAD_LENGTH: usize = 255;

/// Start marker + length byte + checksum byte.
pub const FRAME_OVERHEAD: usize = 3;

/// Computed as
///
/// ```ignore - not a test
/// 1 = start marker
/// +
/// 1 = length byte
/// +
/// 255 = longest payload (type byte + 254 data bytes)
/// +
/// 1 = checksum
/// ---
/// 258
/// ```
///
pub const MAX_FRAME_LENGTH: usize = MAX_PAYLOAD_LENGTH + FRAME_OVERHEAD;

pub(crate) const CHECKSUM: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

pub type FrameVec = Vec<u8, MAX_FRAME_LENGTH>;
pub type PayloadVec = Vec<u8, MAX_PAYLOAD_LENGTH>;

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error {
    /// Type byte + data would not fit the single length byte or the
    /// configured receive cap.
    PayloadTooLong(usize),
}

/// Checksum over the length byte and the counted payload.
pub(crate) fn checksum(len: u8, payload: &[u8]) -> u8 {
    let mut digest = CHECKSUM.digest();
    digest.update(&[len]);
    digest.update(payload);
    digest.finalize()
}

/// One decoded message - the type byte split off the counted payload.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pub message_type: u8,
    pub data: PayloadVec,
}

#[cfg(feature = "std")]
impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Frame {{ message_type: {:#04x}, data: {:02x?} }}",
            self.message_type, self.data
        )
    }
}

#[allow(clippy::len_without_is_empty)]
impl Frame {
    pub fn new(message_type: u8, data: &[u8]) -> Result<Self, Error> {
        if data.len() + 1 > MAX_PAYLOAD_LENGTH {
            return Err(Error::PayloadTooLong(data.len()));
        }
        let mut vec = PayloadVec::new();
        vec.extend_from_slice(data)
            .map_err(|_| Error::PayloadTooLong(data.len()))?;
        Ok(Frame {
            message_type,
            data: vec,
        })
    }

    /// Counted payload length (type byte + data).
    pub fn len(&self) -> usize {
        1 + self.data.len()
    }

    /// Encodes the frame into its on-wire byte sequence.
    pub fn encode(&self) -> FrameVec {
        let len = self.len() as u8;
        let mut out = FrameVec::new();
        // capacities line up by construction, extend cannot fail
        out.push(START_MARKER).ok();
        out.push(len).ok();
        out.push(self.message_type).ok();
        out.extend_from_slice(&self.data).ok();

        let mut digest = CHECKSUM.digest();
        digest.update(&out[1..]);
        out.push(digest.finalize()).ok();
        out
    }
}

/// Encodes `message_type` + `data` straight to wire bytes.
pub fn encode(message_type: u8, data: &[u8]) -> Result<FrameVec, Error> {
    Ok(Frame::new(message_type, data)?.encode())
}
