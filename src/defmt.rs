use defmt::Formatter;

use crate::component::{Config, Stats};
use crate::frame::{Error as FrameError, Frame};
use crate::queue::Error as QueueError;
use crate::registry::Error as RegistryError;

impl defmt::Format for FrameError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            FrameError::PayloadTooLong(len) => {
                defmt::write!(fmt, "PayloadTooLong({=usize})", len)
            }
        }
    }
}

impl defmt::Format for Frame {
    fn format(&self, fmt: Formatter<'_>) {
        defmt::write!(
            fmt,
            "Frame {{ message_type: {=u8:x}, data: {=[u8]:x} }}",
            self.message_type,
            self.data.as_slice()
        )
    }
}

impl defmt::Format for QueueError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            QueueError::QueueFull => defmt::write!(fmt, "QueueFull"),
            QueueError::PayloadTooLong(len) => {
                defmt::write!(fmt, "PayloadTooLong({=usize})", len)
            }
        }
    }
}

impl defmt::Format for RegistryError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            RegistryError::RegistryFull => defmt::write!(fmt, "RegistryFull"),
            RegistryError::AlreadyRegistered(t) => {
                defmt::write!(fmt, "AlreadyRegistered({=u8:x})", t)
            }
        }
    }
}

impl defmt::Format for Config {
    fn format(&self, fmt: Formatter<'_>) {
        defmt::write!(
            fmt,
            "Config {{ max_payload_len: {=usize} }}",
            self.max_payload_len
        )
    }
}

impl defmt::Format for Stats {
    fn format(&self, fmt: Formatter<'_>) {
        defmt::write!(
            fmt,
            "Stats {{ rx: {=u32}, tx: {=u32}, tx_bytes: {=u32}, crc_err: {=u32}, oversize: {=u32}, discarded: {=u32}, unhandled: {=u32} }}",
            self.frames_received,
            self.frames_sent,
            self.bytes_sent,
            self.checksum_errors,
            self.oversize_frames,
            self.discarded_bytes,
            self.unhandled_types
        )
    }
}
