//! The byte link the driver talks over.
//!
//! The instrument session holds a boxed [`Transport`] rather than a concrete
//! serial handle, so tests can substitute [`crate::mock_port::MockPort`] and
//! callers with unusual plumbing (USB adapters, pipes) can inject their own.

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::error::{Error, Result};

/// Read timeout configured on the serial port at open time. Not tunable per
/// call; a read that sees nothing within this window yields an empty reply.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Any blocking reader/writer can carry the protocol.
pub trait Transport: Read + Write + Send {}

impl<T: Read + Write + Send> Transport for T {}

/// Open a serial port with the fixed read timeout the PN200 driver expects.
pub fn open_serial(port: &str, baud_rate: u32) -> Result<Box<dyn Transport>> {
    let handle = serialport::new(port, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|source| Error::Transport {
            port: port.to_string(),
            source,
        })?;
    Ok(Box::new(handle))
}

/// Read a single newline-terminated line, byte by byte.
///
/// A timeout before the terminator arrives ends the line early; the caller
/// gets whatever was received, possibly nothing. The instrument is trusted to
/// send ASCII, so lossy decoding never loses real reply content.
pub(crate) fn read_line(link: &mut dyn Transport) -> Result<String> {
    let mut raw = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match link.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                raw.push(byte[0]);
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                break
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(String::from_utf8_lossy(&raw).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_port::MockPort;

    #[test]
    fn reads_one_line_and_stops_at_terminator() {
        let mut port = MockPort::new();
        port.set_read_data(b"CH A READY\nLEFTOVER\n");

        let line = read_line(&mut port).unwrap();
        assert_eq!(line, "CH A READY");
    }

    #[test]
    fn strips_surrounding_whitespace() {
        let mut port = MockPort::new();
        port.set_read_data(b"  OK \r\n");

        let line = read_line(&mut port).unwrap();
        assert_eq!(line, "OK");
    }

    #[test]
    fn timeout_with_no_data_yields_empty_string() {
        let mut port = MockPort::new();

        let line = read_line(&mut port).unwrap();
        assert_eq!(line, "");
    }

    #[test]
    fn timeout_mid_line_returns_partial_reply() {
        let mut port = MockPort::new();
        port.set_read_data(b"PARTIAL");

        let line = read_line(&mut port).unwrap();
        assert_eq!(line, "PARTIAL");
    }

    #[test]
    fn hard_read_error_propagates() {
        let mut port = MockPort::new();
        port.set_read_error(true);

        assert!(read_line(&mut port).is_err());
    }
}
