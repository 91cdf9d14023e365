//! In-memory serial port stand-in used by the unit tests.

use std::io::{self, Read, Write};

/// Records everything written to it and serves pre-loaded reply bytes.
///
/// Once the reply buffer is drained, reads fail with [`io::ErrorKind::TimedOut`],
/// matching how a real serial port behaves when the instrument stays silent.
#[derive(Default)]
pub struct MockPort {
    written: Vec<u8>,
    reply: Vec<u8>,
    reply_pos: usize,
    read_calls: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the bytes the next reads will return.
    pub fn set_read_data(&mut self, data: &[u8]) {
        self.reply = data.to_vec();
        self.reply_pos = 0;
    }

    /// Everything written to the port so far.
    pub fn written_data(&self) -> &[u8] {
        &self.written
    }

    pub fn clear_written_data(&mut self) {
        self.written.clear();
    }

    /// How many times `read` was called, timeouts included.
    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    pub fn set_read_error(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_write_error(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_calls += 1;
        if self.fail_reads {
            return Err(io::Error::other("simulated read failure"));
        }
        if self.reply_pos >= self.reply.len() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
        }
        let n = buf.len().min(self.reply.len() - self.reply_pos);
        buf[..n].copy_from_slice(&self.reply[self.reply_pos..self.reply_pos + n]);
        self.reply_pos += n;
        Ok(n)
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::other("simulated write failure"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_accumulate() {
        let mut port = MockPort::new();
        port.write_all(b"SEL_A").unwrap();
        port.write_all(b";\n").unwrap();
        assert_eq!(port.written_data(), b"SEL_A;\n");
    }

    #[test]
    fn reads_serve_preloaded_bytes_then_time_out() {
        let mut port = MockPort::new();
        port.set_read_data(b"OK");

        let mut buf = [0u8; 8];
        assert_eq!(port.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"OK");

        let err = port.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(port.read_calls(), 2);
    }

    #[test]
    fn simulated_errors_toggle() {
        let mut port = MockPort::new();
        port.set_write_error(true);
        assert!(port.write(b"x").is_err());
        assert!(port.written_data().is_empty());

        port.set_write_error(false);
        assert!(port.write(b"x").is_ok());

        port.set_read_data(b"y");
        port.set_read_error(true);
        let mut buf = [0u8; 1];
        assert!(port.read(&mut buf).is_err());
    }
}
