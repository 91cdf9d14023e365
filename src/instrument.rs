use std::thread;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::{self, Transport};

/// Pause after each command write, giving the instrument time to process
/// before we read the reply. Fixed by the protocol, not tunable.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Raw mode-control bytes, sent without a newline and without a reply.
const REMOTE_BYTE: u8 = 0x09;
const LOCAL_BYTE: u8 = 0x01;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Channel {
    #[value(name = "A")]
    A,
    #[value(name = "B")]
    B,
}

impl Channel {
    fn as_mnemonic(self) -> &'static str {
        match self {
            Channel::A => "A",
            Channel::B => "B",
        }
    }

    pub fn label(self) -> &'static str {
        self.as_mnemonic()
    }

    fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

/// Desired state for one output channel.
///
/// `None` for voltage or current means "not programmed": the corresponding
/// `VSET`/`ISET` clause is omitted entirely, which is distinct from
/// programming zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelSettings {
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub enabled: bool,
}

/// Driver session for the Grundig PN200 dual-channel bench supply.
///
/// Owns the serial link and the stored per-channel setpoints. All methods are
/// blocking; the instrument replies with a single ASCII line per command.
pub struct Pn200 {
    link: Option<Box<dyn Transport>>,
    channels: [ChannelSettings; 2],
}

impl Default for Pn200 {
    fn default() -> Self {
        Self::new()
    }
}

impl Pn200 {
    /// Create a session with no open connection. Commands fail with
    /// [`Error::NotConnected`] until [`Self::connect`] succeeds.
    pub fn new() -> Self {
        Self {
            link: None,
            channels: [ChannelSettings::default(); 2],
        }
    }

    /// Create a session and open the serial port in one step.
    ///
    /// Only the link is established; callers that want remote control switch
    /// modes explicitly via [`Self::set_remote`] and
    /// [`Self::set_independent_mode`].
    pub fn open(port: &str, baud_rate: u32) -> Result<Self> {
        let mut session = Self::new();
        session.connect(port, baud_rate)?;
        Ok(session)
    }

    /// Create a session over an already-open link, e.g. a mock port.
    pub fn with_transport(link: Box<dyn Transport>) -> Self {
        Self {
            link: Some(link),
            channels: [ChannelSettings::default(); 2],
        }
    }

    /// Open `port` at `baud_rate` and make it the active link.
    ///
    /// Any existing link is closed first; failures while closing are
    /// swallowed. If the new port cannot be opened the session is left
    /// disconnected and the error surfaces to the caller.
    pub fn connect(&mut self, port: &str, baud_rate: u32) -> Result<()> {
        drop(self.link.take());
        debug!("opening {} at {} baud", port, baud_rate);
        self.link = Some(transport::open_serial(port, baud_rate)?);
        Ok(())
    }

    /// Drop the serial link. Close failures are swallowed, as on reconnect.
    pub fn close(&mut self) {
        drop(self.link.take());
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Send one ASCII command line and return the instrument's reply.
    ///
    /// Writes `command` plus a newline, waits the fixed settle delay, then
    /// reads a single line. The reply is whitespace-trimmed; a silent
    /// instrument yields an empty string once the read times out.
    pub fn send_command(&mut self, command: &str) -> Result<String> {
        let link = self.link.as_mut().ok_or(Error::NotConnected)?;
        debug!("PN200 write -> {}", command);
        link.write_all(format!("{command}\n").as_bytes())?;
        thread::sleep(SETTLE_DELAY);
        let reply = transport::read_line(link.as_mut())?;
        debug!("PN200 reply <- {}", reply);
        Ok(reply)
    }

    /// Hand control to the serial interface (front panel locked out).
    pub fn set_remote(&mut self) -> Result<()> {
        self.write_mode_byte(REMOTE_BYTE)
    }

    /// Return control to the front panel.
    pub fn set_local(&mut self) -> Result<()> {
        self.write_mode_byte(LOCAL_BYTE)
    }

    /// Put the supply in independent mode, where channels A and B are
    /// programmed separately rather than tracking each other.
    pub fn set_independent_mode(&mut self) -> Result<String> {
        self.send_command("OPER_IND")
    }

    /// Push the stored settings for `channel` to the instrument.
    ///
    /// A disabled channel is always forced to `VSET 0`, regardless of what
    /// is stored, so switching off never leaves voltage on the terminals.
    pub fn apply_channel(&mut self, channel: Channel) -> Result<String> {
        let command = build_select_command(channel, &self.channels[channel.index()]);
        self.send_command(&command)
    }

    /// Overwrite the stored voltage and current for `channel` and push the
    /// result. Passing `None` clears the corresponding setpoint. The enabled
    /// flag is left as-is.
    pub fn set_channel(
        &mut self,
        channel: Channel,
        voltage: Option<f64>,
        current: Option<f64>,
    ) -> Result<String> {
        if let Some(volts) = voltage {
            ensure_setpoint(volts)?;
        }
        if let Some(amps) = current {
            ensure_setpoint(amps)?;
        }
        let settings = &mut self.channels[channel.index()];
        settings.voltage = voltage;
        settings.current = current;
        self.apply_channel(channel)
    }

    /// Enable `channel` output and push the stored setpoints.
    pub fn channel_on(&mut self, channel: Channel) -> Result<String> {
        self.channels[channel.index()].enabled = true;
        self.apply_channel(channel)
    }

    /// Disable `channel` output, forcing it to zero volts.
    pub fn channel_off(&mut self, channel: Channel) -> Result<String> {
        self.channels[channel.index()].enabled = false;
        self.apply_channel(channel)
    }

    /// The stored (desired) state for `channel`.
    pub fn channel_settings(&self, channel: Channel) -> &ChannelSettings {
        &self.channels[channel.index()]
    }

    fn write_mode_byte(&mut self, byte: u8) -> Result<()> {
        let link = self.link.as_mut().ok_or(Error::NotConnected)?;
        debug!("PN200 mode byte -> {:#04x}", byte);
        link.write_all(&[byte])?;
        Ok(())
    }
}

/// Format the `SEL_<id>; ...` command for one channel's stored settings.
fn build_select_command(channel: Channel, settings: &ChannelSettings) -> String {
    if !settings.enabled {
        return format!("SEL_{}; VSET 0;", channel.as_mnemonic());
    }
    let mut clauses = vec![format!("SEL_{}", channel.as_mnemonic())];
    if let Some(volts) = settings.voltage {
        clauses.push(format!("VSET {}", format_setpoint(volts)));
    }
    if let Some(amps) = settings.current {
        clauses.push(format!("ISET {}", format_setpoint(amps)));
    }
    format!("{};", clauses.join("; "))
}

/// Render a setpoint the way the instrument expects.
///
/// Whole numbers keep one decimal place (`5.0`, not `5`); everything else is
/// the plain shortest decimal form. Pinned by tests as the compatibility
/// contract for the wire format.
fn format_setpoint(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn ensure_setpoint(value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSetpoint(value))
    }
}
