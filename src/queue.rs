//! Bounded send queue with partial-write resume
//!
//! Outbound messages are framed at enqueue time and drained through the
//! transport during [`poll`](crate::component::UsbCommunication::poll). The
//! transport is free to accept fewer bytes than offered (USB FIFO full,
//! host not draining); the queue keeps a cursor into the frame currently
//! going out and picks up exactly where it left off on the next drain -
//! no byte is ever sent twice, none is dropped.
//!
//! A full queue is backpressure, not failure: [`SendQueue::enqueue`]
//! returns [`Error::QueueFull`] and the caller decides whether to retry
//! later or shed the message.
use heapless::Deque;

use crate::frame::{encode, Error as FrameError, FrameVec};
use crate::transport::Transport;

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error {
    /// The queue holds its configured maximum of pending frames.
    QueueFull,
    /// Message didn't fit a single frame.
    PayloadTooLong(usize),
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Error {
        match e {
            FrameError::PayloadTooLong(len) => Error::PayloadTooLong(len),
        }
    }
}

#[cfg(feature = "std")]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Error::QueueFull => write!(f, "Send queue is full, try again after a poll"),
            Error::PayloadTooLong(len) => {
                write!(f, "Message of {} bytes does not fit a single frame", len)
            }
        }
    }
}

pub struct SendQueue<const DEPTH: usize> {
    frames: Deque<FrameVec, DEPTH>,
    /// bytes of the front frame already accepted by the transport
    cursor: usize,
    bytes_sent: u32,
    frames_sent: u32,
}

impl<const DEPTH: usize> SendQueue<DEPTH> {
    pub fn new() -> Self {
        Self {
            frames: Deque::new(),
            cursor: 0,
            bytes_sent: 0,
            frames_sent: 0,
        }
    }

    /// Frames `message_type` + `data` and appends it to the queue.
    pub fn enqueue(&mut self, message_type: u8, data: &[u8]) -> Result<(), Error> {
        let encoded = encode(message_type, data)?;
        self.frames.push_back(encoded).map_err(|_| Error::QueueFull)
    }

    /// Writes queued frames until the transport stops accepting bytes or
    /// the queue runs dry. Returns the number of bytes accepted.
    pub fn drain<T: Transport>(&mut self, transport: &mut T) -> usize {
        let mut total = 0;
        while let Some(frame) = self.frames.front() {
            let pending = &frame[self.cursor..];
            let written = transport.write(pending);
            total += written;
            self.cursor += written;
            if self.cursor == frame.len() {
                self.frames.pop_front();
                self.cursor = 0;
                self.frames_sent = self.frames_sent.wrapping_add(1);
            } else {
                // transport saturated, resume here next poll
                break;
            }
        }
        self.bytes_sent = self.bytes_sent.wrapping_add(total as u32);
        total
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True when the front frame is partially written.
    pub fn mid_frame(&self) -> bool {
        self.cursor != 0
    }

    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u32 {
        self.bytes_sent
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }

    pub fn reset_counters(&mut self) {
        self.bytes_sent = 0;
        self.frames_sent = 0;
    }
}

impl<const DEPTH: usize> Default for SendQueue<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TestTransport;

    #[test]
    fn test_enqueue_and_drain_whole_frame() {
        let mut q = SendQueue::<4>::new();
        let mut t = TestTransport::new();
        q.enqueue(0x01, b"PING").unwrap();
        let sent = q.drain(&mut t);
        assert_eq!(sent, 8);
        assert_eq!(t.outgoing, encode(0x01, b"PING").unwrap().as_slice());
        assert!(q.is_empty());
        assert_eq!(q.frames_sent(), 1);
    }

    #[test]
    fn test_queue_full_is_surfaced_and_harmless() {
        let mut q = SendQueue::<2>::new();
        q.enqueue(0x01, b"a").unwrap();
        q.enqueue(0x02, b"b").unwrap();
        assert_eq!(q.enqueue(0x03, b"c"), Err(Error::QueueFull));
        assert_eq!(q.len(), 2);

        // the two accepted frames drain intact, in order
        let mut t = TestTransport::new();
        q.drain(&mut t);
        let mut expected = Vec::new();
        expected.extend_from_slice(&encode(0x01, b"a").unwrap());
        expected.extend_from_slice(&encode(0x02, b"b").unwrap());
        assert_eq!(t.outgoing, expected);
    }

    #[test]
    fn test_partial_write_resumes_without_duplication() {
        let mut q = SendQueue::<4>::new();
        let mut t = TestTransport::new();
        t.write_limit = 3;
        q.enqueue(0x01, b"PING").unwrap(); // 8 bytes on the wire

        assert_eq!(q.drain(&mut t), 3);
        assert!(q.mid_frame());
        assert_eq!(q.drain(&mut t), 3);
        assert_eq!(q.drain(&mut t), 2);
        assert!(q.is_empty());
        assert_eq!(t.outgoing, encode(0x01, b"PING").unwrap().as_slice());
    }

    #[test]
    fn test_transport_not_ready_leaves_queue_untouched() {
        let mut q = SendQueue::<4>::new();
        let mut t = TestTransport::new();
        t.write_limit = 0;
        q.enqueue(0x01, b"PING").unwrap();
        assert_eq!(q.drain(&mut t), 0);
        assert_eq!(q.len(), 1);
        assert!(!q.mid_frame());
        assert!(t.outgoing.is_empty());
    }

    #[test]
    fn test_payload_too_long_rejected_at_enqueue() {
        let mut q = SendQueue::<4>::new();
        let data = [0u8; crate::frame::MAX_PAYLOAD_LENGTH];
        assert_eq!(
            q.enqueue(0x01, &data),
            Err(Error::PayloadTooLong(data.len()))
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_clear_drops_cursor() {
        let mut q = SendQueue::<4>::new();
        let mut t = TestTransport::new();
        t.write_limit = 2;
        q.enqueue(0x01, b"PING").unwrap();
        q.drain(&mut t);
        assert!(q.mid_frame());
        q.clear();
        assert!(q.is_empty());
        assert!(!q.mid_frame());
    }
}
