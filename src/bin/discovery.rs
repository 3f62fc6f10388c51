//! List serial ports that may have instruments attached.

use anyhow::Result;
use clap::Parser;
use serialport::SerialPortType;

/// Enumerate candidate serial ports for instrument discovery.
#[derive(Parser)]
#[command(name = "discovery", version)]
struct Args {
    /// Print USB vendor/product details where available
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ports = serialport::available_ports()?;
    if ports.is_empty() {
        println!("no serial ports found");
        return Ok(());
    }

    for port in ports {
        match (&port.port_type, args.verbose) {
            (SerialPortType::UsbPort(info), true) => {
                println!(
                    "{}  usb {:04x}:{:04x}  {}",
                    port.port_name,
                    info.vid,
                    info.pid,
                    info.product.as_deref().unwrap_or("-"),
                );
            }
            (SerialPortType::UsbPort(_), false) => println!("{}  (usb)", port.port_name),
            (_, _) => println!("{}", port.port_name),
        }
    }

    Ok(())
}
