//! Message-type to handler dispatch table
//!
//! Handlers are plain `fn` pointers taking a caller-supplied context, so
//! firmware state threads through dispatch without allocation or dynamic
//! dispatch. The table is meant to be filled once during component setup
//! and left alone afterwards; nothing clears it on a lifecycle reset.
//!
//! `N` is the slot count and must be a power of two (FnvIndexMap
//! requirement).
use heapless::FnvIndexMap;

/// Callback invoked with the caller context and the frame data, type byte
/// already stripped.
pub type Handler<C> = fn(&mut C, &[u8]);

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error {
    /// All `N` slots are taken.
    RegistryFull,
    /// The message type already has a handler.
    AlreadyRegistered(u8),
}

#[cfg(feature = "std")]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Error::RegistryFull => write!(f, "All handler slots are taken"),
            Error::AlreadyRegistered(t) => {
                write!(f, "Message type {:#04x} already has a handler", t)
            }
        }
    }
}

pub struct HandlerRegistry<C, const N: usize> {
    handlers: FnvIndexMap<u8, Handler<C>, N>,
}

impl<C, const N: usize> HandlerRegistry<C, N> {
    pub fn new() -> Self {
        Self {
            handlers: FnvIndexMap::new(),
        }
    }

    pub fn register(&mut self, message_type: u8, handler: Handler<C>) -> Result<(), Error> {
        if self.handlers.contains_key(&message_type) {
            return Err(Error::AlreadyRegistered(message_type));
        }
        self.handlers
            .insert(message_type, handler)
            .map(|_| ())
            .map_err(|_| Error::RegistryFull)
    }

    /// Invokes the handler for `message_type`; returns `false` when none is
    /// registered so the caller can count the dropped payload.
    pub fn dispatch(&self, ctx: &mut C, message_type: u8, data: &[u8]) -> bool {
        match self.handlers.get(&message_type) {
            Some(handler) => {
                handler(ctx, data);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, message_type: u8) -> bool {
        self.handlers.contains_key(&message_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C, const N: usize> Default for HandlerRegistry<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = HandlerRegistry::<Vec<u8>, 4>::new();
        registry
            .register(0x01, |ctx, data| ctx.extend_from_slice(data))
            .unwrap();

        let mut seen = Vec::new();
        assert!(registry.dispatch(&mut seen, 0x01, b"PING"));
        assert_eq!(seen, b"PING");
    }

    #[test]
    fn test_unhandled_type_reported_not_fatal() {
        let registry = HandlerRegistry::<(), 4>::new();
        assert!(!registry.dispatch(&mut (), 0x42, b"dropped"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = HandlerRegistry::<(), 4>::new();
        registry.register(0x01, |_, _| {}).unwrap();
        assert_eq!(
            registry.register(0x01, |_, _| {}),
            Err(Error::AlreadyRegistered(0x01))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_full() {
        let mut registry = HandlerRegistry::<(), 2>::new();
        registry.register(0x01, |_, _| {}).unwrap();
        registry.register(0x02, |_, _| {}).unwrap();
        assert_eq!(
            registry.register(0x03, |_, _| {}),
            Err(Error::RegistryFull)
        );
    }
}
