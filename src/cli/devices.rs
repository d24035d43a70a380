//! `knack devices` - list capture devices

use anyhow::{Context, Result};
use knack_audio::default_driver;

/// Print the input devices of the default audio host
pub fn run() -> Result<()> {
    let driver = default_driver().context("No audio backend available")?;
    let devices = driver.devices().context("Failed to enumerate devices")?;

    println!("\nCapture devices ({})", driver.name());
    println!("{}", "-".repeat(40));
    if devices.is_empty() {
        println!("  (none)");
    }
    for name in devices {
        println!("  {name}");
    }
    Ok(())
}
