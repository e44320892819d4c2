//! Framing state machine for the receive path
//!
//! [`FrameParser`] eats one byte at a time and walks
//! `AwaitStart -> ReadLength -> ReadPayload -> ReadChecksum`; a complete,
//! checksum-verified frame pops out of [`FrameParser::push`]. The machine is
//! re-entrant across polls - a partial frame simply stays parked in the
//! payload buffer until the remaining bytes arrive.
//!
//! Nothing in here is fatal. A bad checksum or a rejected length byte drops
//! the frame in progress, bumps a counter and returns the machine to
//! hunting for the next start marker (resync). Bytes discarded while
//! hunting are counted too.
use crate::frame::{checksum, Frame, PayloadVec, MAX_PAYLOAD_LENGTH, START_MARKER};

#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
enum State {
    AwaitStart,
    ReadLength,
    ReadPayload,
    ReadChecksum,
}

pub struct FrameParser {
    state: State,
    declared_len: usize,
    payload: PayloadVec,
    max_payload_len: usize,
    frames_decoded: u32,
    checksum_errors: u32,
    oversize_frames: u32,
    discarded_bytes: u32,
}

impl FrameParser {
    /// `max_payload_len` caps the accepted length byte (type byte + data);
    /// values above [`MAX_PAYLOAD_LENGTH`] are clamped to it.
    pub fn new(max_payload_len: usize) -> Self {
        Self {
            state: State::AwaitStart,
            declared_len: 0,
            payload: PayloadVec::new(),
            max_payload_len: max_payload_len.min(MAX_PAYLOAD_LENGTH),
            frames_decoded: 0,
            checksum_errors: 0,
            oversize_frames: 0,
            discarded_bytes: 0,
        }
    }

    /// Feeds one byte into the state machine, returning a frame when this
    /// byte completed one.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::AwaitStart => {
                if byte == START_MARKER {
                    self.state = State::ReadLength;
                } else {
                    self.discarded_bytes = self.discarded_bytes.wrapping_add(1);
                }
                None
            }
            State::ReadLength => {
                let declared = byte as usize;
                if declared == 0 {
                    // a frame always carries a type byte; treat as noise
                    self.discarded_bytes = self.discarded_bytes.wrapping_add(2);
                    self.resync();
                } else if declared > self.max_payload_len {
                    self.oversize_frames = self.oversize_frames.wrapping_add(1);
                    self.resync();
                } else {
                    self.declared_len = declared;
                    self.state = State::ReadPayload;
                }
                None
            }
            State::ReadPayload => {
                // declared_len <= capacity, push cannot fail
                self.payload.push(byte).ok();
                if self.payload.len() == self.declared_len {
                    self.state = State::ReadChecksum;
                }
                None
            }
            State::ReadChecksum => {
                let expected = checksum(self.declared_len as u8, &self.payload);
                if byte != expected {
                    self.checksum_errors = self.checksum_errors.wrapping_add(1);
                    self.resync();
                    return None;
                }
                let message_type = self.payload[0];
                let data = match PayloadVec::from_slice(&self.payload[1..]) {
                    Ok(data) => data,
                    Err(()) => {
                        // can't happen, data is shorter than the buffer it came from
                        self.resync();
                        return None;
                    }
                };
                self.frames_decoded = self.frames_decoded.wrapping_add(1);
                self.resync();
                Some(Frame { message_type, data })
            }
        }
    }

    /// Drops any frame in progress and returns to hunting for a start
    /// marker. Counters are left alone.
    pub fn reset(&mut self) {
        self.resync();
    }

    pub fn reset_counters(&mut self) {
        self.frames_decoded = 0;
        self.checksum_errors = 0;
        self.oversize_frames = 0;
        self.discarded_bytes = 0;
    }

    /// True while a frame is partially received.
    pub fn mid_frame(&self) -> bool {
        self.state != State::AwaitStart
    }

    pub fn frames_decoded(&self) -> u32 {
        self.frames_decoded
    }

    pub fn checksum_errors(&self) -> u32 {
        self.checksum_errors
    }

    pub fn oversize_frames(&self) -> u32 {
        self.oversize_frames
    }

    pub fn discarded_bytes(&self) -> u32 {
        self.discarded_bytes
    }

    fn resync(&mut self) {
        self.state = State::AwaitStart;
        self.declared_len = 0;
        self.payload.clear();
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(MAX_PAYLOAD_LENGTH)
    }
}
