//! Adapter over the raw USB serial byte stream
//!
//! The driver never talks to hardware directly; it goes through a
//! [`Transport`], a minimal non-blocking seam the firmware implements over
//! its USB Serial/JTAG peripheral. Both directions report "link not ready"
//! as a plain zero count - the poll loop retries next time around, no error
//! type needed at this layer.
/// Non-blocking byte stream under the framing layer.
///
/// Implementations must never block inside [`read`](Transport::read) or
/// [`write`](Transport::write); when the peripheral has nothing pending
/// (or no room), return 0 and let the caller retry on a later poll.
pub trait Transport {
    /// Reads up to `buf.len()` pending bytes, returning how many were
    /// placed at the front of `buf`. 0 means nothing pending.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Writes as much of `bytes` as the link accepts right now, returning
    /// the count taken. 0 means the link is not ready; partial writes are
    /// expected and the caller keeps a cursor.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

/// [`Transport`] over any std `Read + Write` stream (a `serialport` handle
/// on the host side), treating timeouts and would-block as "nothing yet".
#[cfg(feature = "std")]
pub struct StdIoTransport<S> {
    stream: S,
}

#[cfg(feature = "std")]
impl<S> StdIoTransport<S>
where
    S: std::io::Read + std::io::Write,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[cfg(feature = "std")]
impl<S> Transport for StdIoTransport<S>
where
    S: std::io::Read + std::io::Write,
{
    fn read(&mut self, buf: &mut [u8]) -> usize {
        match self.stream.read(buf) {
            Ok(n) => n,
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                0
            }
            Err(_) => 0,
        }
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        match self.stream.write(bytes) {
            Ok(n) => {
                self.stream.flush().ok();
                n
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                0
            }
            Err(_) => 0,
        }
    }
}

/// Scripted in-memory transport used across the crate's tests: incoming
/// bytes are staged with [`feed`](TestTransport::feed), written bytes are
/// captured, and per-call read/write limits model a slow or busy link.
#[cfg(test)]
pub(crate) struct TestTransport {
    pub incoming: std::collections::VecDeque<u8>,
    pub outgoing: Vec<u8>,
    /// max bytes handed out per read() call, `usize::MAX` = unlimited
    pub read_limit: usize,
    /// max bytes accepted per write() call, 0 = link not ready
    pub write_limit: usize,
}

#[cfg(test)]
impl TestTransport {
    pub fn new() -> Self {
        Self {
            incoming: std::collections::VecDeque::new(),
            outgoing: Vec::new(),
            read_limit: crate::frame::MAX_FRAME_LENGTH,
            write_limit: crate::frame::MAX_FRAME_LENGTH,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

#[cfg(test)]
impl Transport for TestTransport {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.read_limit).min(self.incoming.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.incoming.pop_front().unwrap();
        }
        n
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.write_limit);
        self.outgoing.extend_from_slice(&bytes[..n]);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_transport_read_limit() {
        let mut t = TestTransport::new();
        t.read_limit = 2;
        t.feed(&[1, 2, 3, 4, 5]);
        let mut buf = [0u8; 8];
        assert_eq!(t.read(&mut buf), 2);
        assert_eq!(&buf[..2], &[1, 2]);
        assert_eq!(t.read(&mut buf), 2);
        assert_eq!(&buf[..2], &[3, 4]);
        assert_eq!(t.read(&mut buf), 1);
        assert_eq!(t.read(&mut buf), 0);
    }

    #[test]
    fn test_test_transport_write_limit() {
        let mut t = TestTransport::new();
        t.write_limit = 3;
        assert_eq!(t.write(&[9, 8, 7, 6]), 3);
        t.write_limit = 0;
        assert_eq!(t.write(&[6]), 0);
        assert_eq!(t.outgoing, vec![9, 8, 7]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_io_transport_maps_would_block_to_zero() {
        struct Flaky;
        impl std::io::Read for Flaky {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::WouldBlock.into())
            }
        }
        impl std::io::Write for Flaky {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::TimedOut.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut t = StdIoTransport::new(Flaky);
        let mut buf = [0u8; 4];
        assert_eq!(t.read(&mut buf), 0);
        assert_eq!(t.write(&[1, 2]), 0);
    }
}
