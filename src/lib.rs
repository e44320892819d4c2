//! Framed message driver for a device's USB Serial/JTAG interface.
//!
//! The peripheral hands us a raw non-blocking byte stream; this crate turns
//! it into discrete typed messages. Incoming bytes are run through a
//! re-entrant framing state machine ([`parser::FrameParser`]) and complete
//! frames are dispatched to handlers registered per message type. Outgoing
//! messages are framed up front and drained through a bounded send queue
//! that survives partial writes.
//!
//! Everything is driven by a cooperative [`component::UsbCommunication::poll`]
//! call - nothing blocks, nothing allocates, and no framing error is fatal:
//! corruption resynchronizes the parser and bumps a counter in
//! [`component::Stats`].

#![cfg_attr(any(not(feature = "std"), not(test)), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod component;
pub mod frame;
pub mod parser;
pub mod queue;
pub mod registry;
pub mod transport;

// include defmt::Format implementations
// we don't want them derive()d in the modules unless defmt-impl feature is set
#[cfg(feature = "defmt-impl")]
pub mod defmt;

// reexport heapless
pub use heapless;
