//! Newline-delimited JSON telemetry from the potentiometer device.
//!
//! Wire format, one record per line:
//!
//! ```text
//! {"potentiometer1":0,"potentiometer2":1023,"potentiometer3":512}\n
//! ```
//!
//! Extra fields are ignored. A line that is not JSON, or lacks any of the three
//! readings, is logged and dropped; the stream carries on with the next line.

use serde::Deserialize;
use tracing::debug;

use crate::angle::raw_to_angle;
use crate::geometry::Ring;

/// One decoded device sample. Readings are nominally whole numbers in
/// `[0, 1023]`, but any JSON number is accepted and none is range checked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TelemetryRecord {
    #[serde(rename = "potentiometer1")]
    pub pot1: f64,
    #[serde(rename = "potentiometer2")]
    pub pot2: f64,
    #[serde(rename = "potentiometer3")]
    pub pot3: f64,
}

impl TelemetryRecord {
    pub const fn new(pot1: f64, pot2: f64, pot3: f64) -> Self {
        Self { pot1, pot2, pot3 }
    }

    /// Raw reading driving `ring`: pot 1 outer, pot 2 middle, pot 3 inner.
    pub fn raw(&self, ring: Ring) -> f64 {
        match ring {
            Ring::Outer => self.pot1,
            Ring::Middle => self.pot2,
            Ring::Inner => self.pot3,
        }
    }

    /// Ring angles implied by this sample, outer to inner.
    pub fn angles(&self, raw_max: f64) -> [(Ring, f64); 3] {
        Ring::ALL.map(|ring| (ring, raw_to_angle(self.raw(ring), raw_max)))
    }

    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Reassembles lines across arbitrarily split chunks.
///
/// One parser lives for one connection; a fresh connection starts from an
/// empty buffer.
#[derive(Debug)]
pub struct TelemetryLineParser {
    pending: Vec<u8>,
    max_line_len: usize,
    discarding: bool,
}

impl Default for TelemetryLineParser {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl TelemetryLineParser {
    pub fn new(max_line_len: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_len,
            discarding: false,
        }
    }

    /// Bytes received after the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Feeds one chunk and returns every record completed by it, in stream
    /// order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<TelemetryRecord> {
        let mut records = Vec::new();
        let mut rest = chunk;

        while let Some(newline) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(newline);
            rest = &tail[1..];

            if self.discarding {
                self.discarding = false;
                self.pending.clear();
                continue;
            }

            self.pending.extend_from_slice(head);
            if let Some(record) = Self::parse_candidate(&self.pending) {
                records.push(record);
            }
            self.pending.clear();
        }

        if !self.discarding {
            self.pending.extend_from_slice(rest);
            if self.pending.len() > self.max_line_len {
                debug!(
                    len = self.pending.len(),
                    max = self.max_line_len,
                    "telemetry line too long, discarding until next newline"
                );
                self.pending.clear();
                self.discarding = true;
            }
        }

        records
    }

    fn parse_candidate(bytes: &[u8]) -> Option<TelemetryRecord> {
        let line = match std::str::from_utf8(bytes) {
            Ok(line) => line.trim(),
            Err(e) => {
                debug!(error = %e, "telemetry line is not UTF-8");
                return None;
            }
        };
        if line.is_empty() {
            return None;
        }

        match TelemetryRecord::parse_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, line, "discarding malformed telemetry line");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_line_yields_record() {
        let mut parser = TelemetryLineParser::default();
        let records =
            parser.push(b"{\"potentiometer1\":0,\"potentiometer2\":1023,\"potentiometer3\":512}\n");
        assert_eq!(records, vec![TelemetryRecord::new(0.0, 1023.0, 512.0)]);
        assert!(parser.pending().is_empty());
    }

    #[test]
    fn partial_line_is_carried_into_next_chunk() {
        let mut parser = TelemetryLineParser::default();
        let first = parser.push(
            b"{\"potentiometer1\":0,\"potentiometer2\":1023,\"potentiometer3\":512}\n{\"potentiometer1\":",
        );
        assert_eq!(first.len(), 1);
        assert_eq!(parser.pending(), b"{\"potentiometer1\":");

        let second = parser.push(b"100,\"potentiometer2\":200,\"potentiometer3\":300}\n");
        assert_eq!(second, vec![TelemetryRecord::new(100.0, 200.0, 300.0)]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut parser = TelemetryLineParser::default();
        let records = parser.push(
            b"not json\n{\"potentiometer1\":1}\n\n   \n{\"potentiometer1\":1,\"potentiometer2\":2,\"potentiometer3\":3}\n",
        );
        assert_eq!(records, vec![TelemetryRecord::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn extra_fields_and_whitespace_are_tolerated() {
        let mut parser = TelemetryLineParser::default();
        let records = parser.push(
            b"  {\"potentiometer3\":3,\"button\":true,\"potentiometer1\":1,\"potentiometer2\":2} \r\n",
        );
        assert_eq!(records, vec![TelemetryRecord::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn non_numeric_readings_are_rejected() {
        let mut parser = TelemetryLineParser::default();
        let records = parser
            .push(b"{\"potentiometer1\":\"1\",\"potentiometer2\":2,\"potentiometer3\":3}\n");
        assert!(records.is_empty());
        let records =
            parser.push(b"{\"potentiometer1\":null,\"potentiometer2\":2,\"potentiometer3\":3}\n");
        assert!(records.is_empty());
    }

    #[test]
    fn any_json_number_is_a_reading() {
        let mut parser = TelemetryLineParser::default();
        let records = parser.push(
            b"{\"potentiometer1\":512.0,\"potentiometer2\":0,\"potentiometer3\":0}\n\
              {\"potentiometer1\":511.5,\"potentiometer2\":-4,\"potentiometer3\":1e2}\n\
              {\"potentiometer1\":3000000000,\"potentiometer2\":0,\"potentiometer3\":0}\n",
        );
        assert_eq!(
            records,
            vec![
                TelemetryRecord::new(512.0, 0.0, 0.0),
                TelemetryRecord::new(511.5, -4.0, 100.0),
                TelemetryRecord::new(3_000_000_000.0, 0.0, 0.0),
            ]
        );

        // fractional and oversized readings map through unchanged
        let [(_, half), _, _] = records[1].angles(1023.0);
        assert!((half - (511.5 / 1023.0 * 360.0 - 180.0)).abs() < 1e-9);
        let [(_, huge), _, _] = records[2].angles(1023.0);
        assert!(huge > 1_000_000.0);
    }

    #[test]
    fn multibyte_character_split_across_chunks_survives() {
        let mut parser = TelemetryLineParser::default();
        let line = "{\"potentiometer1\":1,\"potentiometer2\":2,\"potentiometer3\":3,\"tag\":\"é\"}\n";
        let bytes = line.as_bytes();
        let split = line.find('é').map(|i| i + 1).unwrap_or(0);
        assert!(parser.push(&bytes[..split]).is_empty());
        assert_eq!(parser.push(&bytes[split..]), vec![TelemetryRecord::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn invalid_utf8_line_is_dropped() {
        let mut parser = TelemetryLineParser::default();
        let mut chunk = vec![0xff, 0xfe, b'\n'];
        chunk.extend_from_slice(b"{\"potentiometer1\":4,\"potentiometer2\":5,\"potentiometer3\":6}\n");
        assert_eq!(parser.push(&chunk), vec![TelemetryRecord::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn overlong_line_is_discarded_until_newline() {
        let mut parser = TelemetryLineParser::new(16);
        assert!(parser.push(&[b'x'; 20]).is_empty());
        assert!(parser.pending().is_empty());
        // tail of the oversized line, then a good one
        let records = parser
            .push(b"yyyy\n{\"potentiometer1\":7,\"potentiometer2\":8,\"potentiometer3\":9}\n");
        assert_eq!(records, vec![TelemetryRecord::new(7.0, 8.0, 9.0)]);
    }

    #[test]
    fn record_maps_pots_to_rings() {
        let record = TelemetryRecord::new(0.0, 1023.0, 2046.0);
        let angles = record.angles(1023.0);
        assert_eq!(angles[0], (Ring::Outer, -180.0));
        assert_eq!(angles[1], (Ring::Middle, 180.0));
        assert_eq!(angles[2], (Ring::Inner, 540.0));
    }
}
