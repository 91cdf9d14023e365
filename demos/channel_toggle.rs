//! Program channel A to 10 V / 1 A, switch it on for a second, then off.

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

    psu.set_channel(Channel::A, Some(10.0), Some(1.0))?;
    psu.channel_on(Channel::A)?;

    sleep(Duration::from_secs(1));

    // channel_off forces VSET 0 regardless of the stored setpoints.
    psu.channel_off(Channel::A)?;
    psu.set_local()?;

    Ok(())
}
