//! Concrete transports: a real serial port and a simulated potentiometer box.

use std::io::{self, Read};
use std::thread;
use std::time::Duration;

use rand::Rng;
use serialport::{ClearBuffer, SerialPort};
use tracing::info;

use crate::config::LinkSettings;
use crate::connection::{Connector, Transport};
use crate::error::LinkError;

// ============================================================================
// SERIAL
// ============================================================================

/// Opens a named serial port, or the first one found when no name is given.
#[derive(Debug, Clone, Default)]
pub struct SerialConnector {
    pub port_name: Option<String>,
}

impl SerialConnector {
    pub fn new(port_name: Option<String>) -> Self {
        Self { port_name }
    }
}

impl Connector for SerialConnector {
    type Port = SerialTransport;

    fn open(&mut self, settings: &LinkSettings) -> Result<SerialTransport, LinkError> {
        let name = match &self.port_name {
            Some(name) => name.clone(),
            None => first_available_port()?,
        };

        let port = serialport::new(&name, settings.baud_rate)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| LinkError::open_failed(&name, e))?;

        info!(port = %name, baud = settings.baud_rate, "serial port opened");
        Ok(SerialTransport { name, port })
    }
}

fn first_available_port() -> Result<String, LinkError> {
    let ports = serialport::available_ports().map_err(|e| LinkError::open_failed("(scan)", e))?;
    ports
        .into_iter()
        .next()
        .map(|p| p.port_name)
        .ok_or(LinkError::NoDevice)
}

pub struct SerialTransport {
    name: String,
    port: Box<dyn SerialPort>,
}

impl Transport for SerialTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }

    fn close(&mut self) -> Result<(), LinkError> {
        // the handle itself is released on drop
        self.port
            .clear(ClearBuffer::All)
            .map_err(|e| LinkError::Close(format!("{}: {e}", self.name)))
    }
}

// ============================================================================
// SIMULATED DEVICE
// ============================================================================

/// Pretends to be the potentiometer box: three wandering readings written as
/// JSON lines and delivered in randomly sized chunks.
#[derive(Debug, Clone)]
pub struct SimulatedConnector {
    pub interval: Duration,
    /// Probability that a sample is preceded by a corrupt line.
    pub glitch_rate: f64,
    pub raw_max: i32,
}

impl Default for SimulatedConnector {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(40),
            glitch_rate: 0.02,
            raw_max: 1023,
        }
    }
}

impl Connector for SimulatedConnector {
    type Port = SimulatedDevice;

    fn open(&mut self, settings: &LinkSettings) -> Result<SimulatedDevice, LinkError> {
        info!(baud = settings.baud_rate, "simulated device attached");
        let mid = f64::from(self.raw_max) / 2.0;
        Ok(SimulatedDevice {
            pots: [mid; 3],
            targets: [mid; 3],
            outbox: Vec::new(),
            interval: self.interval,
            glitch_rate: self.glitch_rate.clamp(0.0, 1.0),
            raw_max: f64::from(self.raw_max),
        })
    }
}

pub struct SimulatedDevice {
    pots: [f64; 3],
    targets: [f64; 3],
    outbox: Vec<u8>,
    interval: Duration,
    glitch_rate: f64,
    raw_max: f64,
}

impl SimulatedDevice {
    fn sample(&mut self) {
        let mut rng = rand::rng();

        for (pot, target) in self.pots.iter_mut().zip(self.targets.iter_mut()) {
            if rng.random_range(0.0..1.0) < 0.02 {
                *target = rng.random_range(0.0..=self.raw_max);
            }
            *pot += (*target - *pot) * 0.1;
        }

        if rng.random_bool(self.glitch_rate) {
            self.outbox.extend_from_slice(b"{\"potentiometer1\":oops\n");
        }

        let line = format!(
            "{{\"potentiometer1\":{},\"potentiometer2\":{},\"potentiometer3\":{}}}\n",
            self.pots[0].round() as i32,
            self.pots[1].round() as i32,
            self.pots[2].round() as i32,
        );
        self.outbox.extend_from_slice(line.as_bytes());
    }
}

impl Transport for SimulatedDevice {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outbox.is_empty() {
            thread::sleep(self.interval);
            self.sample();
        }

        let max = self.outbox.len().min(buf.len());
        if max == 0 {
            return Ok(0);
        }
        let n = rand::rng().random_range(1..=max);
        buf[..n].copy_from_slice(&self.outbox[..n]);
        self.outbox.drain(..n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryLineParser;

    #[test]
    fn simulated_device_streams_parseable_records() {
        let mut connector = SimulatedConnector {
            interval: Duration::from_millis(0),
            glitch_rate: 0.5,
            raw_max: 1023,
        };
        let mut device = connector
            .open(&LinkSettings::default())
            .expect("simulated open never fails");
        let mut parser = TelemetryLineParser::default();
        let mut buf = [0u8; 64];
        let mut records = Vec::new();

        for _ in 0..2000 {
            let n = device.read_chunk(&mut buf).expect("simulated read never fails");
            assert!(n > 0);
            records.extend(parser.push(&buf[..n]));
            if records.len() >= 20 {
                break;
            }
        }

        assert!(records.len() >= 20);
        for record in records {
            for raw in [record.pot1, record.pot2, record.pot3] {
                assert!((0.0..=1023.0).contains(&raw), "raw {raw} out of range");
            }
        }
    }

    #[test]
    fn explicit_port_name_is_used_in_open_errors() {
        let mut connector = SerialConnector::new(Some("/dev/ringdial-does-not-exist".into()));
        match connector.open(&LinkSettings::default()) {
            Err(LinkError::Open { port, .. }) => assert_eq!(port, "/dev/ringdial-does-not-exist"),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("opening a missing port succeeded"),
        }
    }
}
