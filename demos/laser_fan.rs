//! Drive a laser diode on channel A and a cooling fan on channel B.

use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use pn200_control::instrument::{Channel, Pn200};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let port = args.get(1).map(String::as_str).unwrap_or("/dev/ttyUSB0");
    let baud = args
        .get(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(9600u32);

    let mut psu = Pn200::open(port, baud)?;
    psu.set_remote()?;
    psu.set_independent_mode()?;

    // Laser on channel A: 5 V, current-limited to 10 mA.
    psu.set_channel(Channel::A, Some(5.0), Some(0.01))?;
    psu.channel_on(Channel::A)?;

    // Fan on channel B: 12 V, 100 mA.
    psu.set_channel(Channel::B, Some(12.0), Some(0.1))?;
    psu.channel_on(Channel::B)?;

    sleep(Duration::from_secs(5));

    psu.channel_off(Channel::A)?;
    psu.channel_off(Channel::B)?;
    psu.set_local()?;
    psu.close();

    Ok(())
}
