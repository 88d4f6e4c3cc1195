use std::io::{Read, Write};
use std::time::Duration;

use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },
    #[error("failed to enumerate ports: {0}")]
    Enumerate(#[from] serialport::Error),
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A listed port, name plus whatever description the OS offers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortEntry {
    pub name: String,
    pub description: String,
}

impl PortEntry {
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.description)
        }
    }
}

pub fn available_ports() -> Result<Vec<PortEntry>, LinkError> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|p| {
            let description = match p.port_type {
                serialport::SerialPortType::UsbPort(usb) => {
                    usb.product.unwrap_or_default()
                }
                serialport::SerialPortType::PciPort => "PCI".to_string(),
                serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                serialport::SerialPortType::Unknown => String::new(),
            };
            PortEntry {
                name: p.port_name,
                description,
            }
        })
        .collect())
}

/// Open serial connection, 8N1 with no flow control. The short read
/// timeout lets the engine loop poll without blocking a full iteration.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    pub fn open(name: &str, baud: u32) -> Result<Self, LinkError> {
        let port = serialport::new(name, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()
            .map_err(|source| LinkError::Open {
                port: name.to_string(),
                source,
            })?;
        debug!("opened {name} @ {baud} baud");
        Ok(Self {
            port,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes one protocol line, appending the terminator exactly once.
    pub fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.port.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            self.port.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Reads whatever is pending into `buf`; `Ok(0)` when nothing arrived
    /// before the poll timeout.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
