//! Hardware serial transport using serialport

use super::{LineReader, LineSource, PortInfo, ReadOutcome};
use crate::{Result, TossCueError};
use serialport::{SerialPort, SerialPortType};
use std::time::Duration;

/// Enumerate serial devices on this machine
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()
        .map_err(|e| TossCueError::TransportUnavailable(format!("Failed to list ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|port| {
            let description = match port.port_type {
                SerialPortType::UsbPort(usb) => {
                    let parts: Vec<String> = [usb.manufacturer, usb.product]
                        .into_iter()
                        .flatten()
                        .collect();
                    if parts.is_empty() {
                        format!("USB {:04x}:{:04x}", usb.vid, usb.pid)
                    } else {
                        format!("{} (USB)", parts.join(" "))
                    }
                }
                SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                SerialPortType::PciPort => "PCI".to_string(),
                SerialPortType::Unknown => "n/a".to_string(),
            };
            PortInfo::new(port.port_name, description)
        })
        .collect())
}

/// An open serial link framed into lines
pub struct SerialTransport {
    name: String,
    reader: LineReader<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Open `name` at `baud_rate`; reads give up after `timeout`
    pub fn open(name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| {
                TossCueError::TransportUnavailable(format!(
                    "Could not open serial port {}: {}",
                    name, e
                ))
            })?;
        tracing::info!(port = name, baud_rate, "serial port opened");

        Ok(SerialTransport {
            name: name.to_string(),
            reader: LineReader::new(port),
        })
    }

    /// Port identifier
    pub fn name(&self) -> &str {
        &self.name
    }

}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        tracing::info!(port = %self.name, "serial port closed");
    }
}

impl LineSource for SerialTransport {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        self.reader.read_line()
    }
}
