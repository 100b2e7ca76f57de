use std::time::Duration;

use bon::Builder;

use crate::geometry::DialGeometry;
use crate::options::DialData;

/// Ring boundaries as fractions of the dial radius.
///
/// A point farther than `outer * r` from the centre is on the outer ring,
/// farther than `middle * r` on the middle ring, farther than `inner * r` on
/// the inner ring; anything closer is dead space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingThresholds {
    pub outer: f64,
    pub middle: f64,
    pub inner: f64,
}

impl Default for RingThresholds {
    fn default() -> Self {
        Self {
            outer: 0.70,
            middle: 0.45,
            inner: 0.15,
        }
    }
}

/// Serial link parameters handed to a [`crate::connection::Connector`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSettings {
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub max_line_len: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            read_timeout: Duration::from_millis(50),
            max_line_len: 4096,
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct DialConfig {
    #[builder(default = "Ring Dial".to_string())]
    pub title: String,

    // Hit-testing
    #[builder(default = 25.0)]
    pub activation_radius: f64,
    #[builder(default)]
    pub thresholds: RingThresholds,

    // Options
    #[builder(default = DEFAULT_DIAL_DATA.clone())]
    pub dial_data: DialData,

    // Telemetry
    #[builder(default = 1023.0)]
    pub raw_max: f64,
    #[builder(default = 9600)]
    pub baud_rate: u32,
    #[builder(default = Duration::from_millis(50))]
    pub read_timeout: Duration,
    #[builder(default = 4096)]
    pub max_line_len: usize,

    // Window
    #[builder(default = 373)]
    pub window_size: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Per-frame easing for rings that are not being dragged.
    #[builder(default = 0.25)]
    pub ease_factor: f64,

    // Tick marks per ring, outer to inner
    #[builder(default = [56, 32, 10])]
    pub tick_counts: [usize; 3],
}

impl Default for DialConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DialConfig {
    pub fn geometry(&self) -> DialGeometry {
        DialGeometry::new(self.activation_radius, self.thresholds)
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            baud_rate: self.baud_rate,
            read_timeout: self.read_timeout,
            max_line_len: self.max_line_len,
        }
    }
}

/// Stock option table shared by every dial that does not supply its own.
pub static DEFAULT_DIAL_DATA: std::sync::LazyLock<DialData> =
    std::sync::LazyLock::new(DialData::stock);
