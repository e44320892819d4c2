//! Component lifecycle tying transport, framing, queue and dispatch together
//!
//! [`UsbCommunication`] is owned by the firmware and driven from its main
//! loop: `setup()` once (idempotent - a second call resets cleanly),
//! then `poll()` on every pass of the cooperative scheduler. One poll does
//! a bounded unit of work - read at most [`MAX_READ_PER_POLL`] bytes into
//! the framing engine, dispatch any completed frames, then drain whatever
//! the transport will take from the send queue - and returns promptly so
//! other tasks on the device are not starved.
//!
//! No path through `poll` panics or unwinds; every failure mode lands in a
//! [`Stats`] counter or comes back as a `Result` from [`UsbCommunication::send`].
use crate::frame::MAX_PAYLOAD_LENGTH;
use crate::parser::FrameParser;
use crate::queue::{self, SendQueue};
use crate::registry::{self, Handler, HandlerRegistry};
use crate::transport::Transport;

/// Upper bound on bytes pulled from the transport in a single poll.
pub const MAX_READ_PER_POLL: usize = 256;

/// Chunk size for single transport reads, sized to the USB Serial/JTAG
/// FIFO.
const READ_CHUNK: usize = 64;

/// Runtime options. Capacities that shape memory (queue depth, handler
/// slots) are const generics on [`UsbCommunication`] instead.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct Config {
    /// Accepted counted-payload length (type byte + data), both for
    /// incoming frames and for [`UsbCommunication::send`]. Clamped to
    /// [`MAX_PAYLOAD_LENGTH`].
    pub max_payload_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_payload_len: MAX_PAYLOAD_LENGTH,
        }
    }
}

/// Error/progress counters, the only way framing-level failures surface.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct Stats {
    pub frames_received: u32,
    pub frames_sent: u32,
    pub bytes_sent: u32,
    pub checksum_errors: u32,
    pub oversize_frames: u32,
    pub discarded_bytes: u32,
    pub unhandled_types: u32,
}

pub struct UsbCommunication<T, C, const TX_DEPTH: usize, const HANDLERS: usize> {
    transport: T,
    config: Config,
    parser: FrameParser,
    send_queue: SendQueue<TX_DEPTH>,
    registry: HandlerRegistry<C, HANDLERS>,
    unhandled_types: u32,
    activity: bool,
    started: bool,
}

impl<T, C, const TX_DEPTH: usize, const HANDLERS: usize> UsbCommunication<T, C, TX_DEPTH, HANDLERS>
where
    T: Transport,
{
    pub fn new(transport: T, config: Config) -> Self {
        let max_payload_len = config.max_payload_len.min(MAX_PAYLOAD_LENGTH);
        Self {
            transport,
            config: Config { max_payload_len },
            parser: FrameParser::new(max_payload_len),
            send_queue: SendQueue::new(),
            registry: HandlerRegistry::new(),
            unhandled_types: 0,
            activity: false,
            started: false,
        }
    }

    /// Registers `handler` for frames carrying `message_type`. Call during
    /// setup; the table is not touched by [`setup`](Self::setup) or
    /// [`teardown`](Self::teardown), so a lifecycle reset keeps handlers.
    pub fn register_handler(
        &mut self,
        message_type: u8,
        handler: Handler<C>,
    ) -> Result<(), registry::Error> {
        self.registry.register(message_type, handler)
    }

    /// Clears buffers and counters and arms [`poll`](Self::poll).
    /// Idempotent - calling it on a running component is a clean reset.
    pub fn setup(&mut self) {
        self.parser.reset();
        self.parser.reset_counters();
        self.send_queue.clear();
        self.send_queue.reset_counters();
        self.unhandled_types = 0;
        self.activity = false;
        self.started = true;
    }

    /// One bounded unit of work: drain pending input through the framing
    /// engine (dispatching complete frames into `ctx`), then push queued
    /// frames out. No-op before [`setup`](Self::setup) or after
    /// [`teardown`](Self::teardown).
    pub fn poll(&mut self, ctx: &mut C) {
        if !self.started {
            return;
        }

        let mut buf = [0u8; READ_CHUNK];
        let mut budget = MAX_READ_PER_POLL;
        while budget > 0 {
            let want = budget.min(READ_CHUNK);
            let n = self.transport.read(&mut buf[..want]);
            if n == 0 {
                break;
            }
            budget -= n;
            for &byte in &buf[..n] {
                if let Some(frame) = self.parser.push(byte) {
                    self.activity = true;
                    if !self.registry.dispatch(ctx, frame.message_type, &frame.data) {
                        self.unhandled_types = self.unhandled_types.wrapping_add(1);
                    }
                }
            }
        }

        if self.send_queue.drain(&mut self.transport) > 0 {
            self.activity = true;
        }
    }

    /// Frames a message and queues it for transmission on coming polls.
    pub fn send(&mut self, message_type: u8, data: &[u8]) -> Result<(), queue::Error> {
        if data.len() + 1 > self.config.max_payload_len {
            return Err(queue::Error::PayloadTooLong(data.len()));
        }
        self.send_queue.enqueue(message_type, data)
    }

    /// Stops future polls and releases buffered data. Handlers and counters
    /// survive; a later [`setup`](Self::setup) starts fresh.
    pub fn teardown(&mut self) {
        self.started = false;
        self.parser.reset();
        self.send_queue.clear();
    }

    /// Hands the transport back, consuming the component.
    pub fn release(self) -> T {
        self.transport
    }

    /// True if any frame arrived or any byte went out since the last call;
    /// reading clears the flag. Meant for driving an activity indicator.
    pub fn take_activity(&mut self) -> bool {
        let was = self.activity;
        self.activity = false;
        was
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frames waiting in the send queue.
    pub fn pending_tx(&self) -> usize {
        self.send_queue.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        Stats {
            frames_received: self.parser.frames_decoded(),
            frames_sent: self.send_queue.frames_sent(),
            bytes_sent: self.send_queue.bytes_sent(),
            checksum_errors: self.parser.checksum_errors(),
            oversize_frames: self.parser.oversize_frames(),
            discarded_bytes: self.parser.discarded_bytes(),
            unhandled_types: self.unhandled_types,
        }
    }
}
