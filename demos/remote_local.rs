//! Mode handshake: take remote control, select independent mode, poke both
//! channels without programming them, and hand control back to the panel.

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
    let reply = psu.set_independent_mode()?;
    println!("OPER_IND reply: {reply:?}");

    // Bare channel selects: nothing programmed, so only SEL_<id>; goes out.
    for channel in [Channel::A, Channel::B] {
        let reply = psu.channel_on(channel)?;
        println!("SEL_{} reply: {reply:?}", channel.label());
        psu.channel_off(channel)?;
    }

    psu.set_local()?;
    Ok(())
}
