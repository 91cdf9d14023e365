//! Error types for PN200 communication.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Transport {
        port: String,
        #[source]
        source: serialport::Error,
    },
    /// A command or mode switch was attempted with no open connection.
    #[error("not connected to the instrument")]
    NotConnected,
    /// A voltage or current setpoint was negative or not a finite number.
    #[error("setpoint out of range: {0}")]
    InvalidSetpoint(f64),
    /// The link failed mid-command.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}
