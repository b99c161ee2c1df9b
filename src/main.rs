use std::net::SocketAddr;
use std::time::Duration;

use rppal::i2c::I2c;
use tracing::{error, info};

use mcp9808_rpi::{Mcp9808, RppalBus};

const DEFAULT_ADDR: u8 = 0x18;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let address = match std::env::var("MCP9808_ADDR") {
        Ok(raw) => u8::from_str_radix(raw.trim_start_matches("0x"), 16)?,
        Err(_) => DEFAULT_ADDR,
    };

    let i2c = I2c::with_bus(1)?;
    let mut sensor = Mcp9808::new(RppalBus::new(i2c));
    sensor.begin(address)?;
    info!("mcp9808 ready at {address:#04x}");

    let binding: SocketAddr = "0.0.0.0:9184".parse()?;
    let exporter = prometheus_exporter::start(binding)?;
    let gauge = prometheus_exporter::prometheus::register_gauge!(
        "mcp9808_temperature_celsius",
        "Ambient temperature reported by the MCP9808"
    )?;

    loop {
        let _guard = exporter.wait_duration(POLL_INTERVAL);
        match sensor.read_celsius() {
            Ok(celsius) => {
                gauge.set(celsius as f64);
                info!("ambient {celsius:.4} C");
            }
            Err(err) => error!("temperature read failed: {err}"),
        }
    }
}
