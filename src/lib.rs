// ============================================================================
// CRATE OVERVIEW
// ============================================================================

//! A three-ring rotary filter dial.
//!
//! Each ring can be turned by dragging it, or driven by a serial device that
//! streams three potentiometer readings as JSON lines. Every ring's rotation
//! selects one labelled option, and the `{outer, middle, inner}` selection is
//! published after every change.
//!
//! ```no_run
//! use ringdial::{DialApp, DialConfig, SimulatedConnector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DialConfig::builder().title("Ring Dial".to_string()).build();
//!     DialApp::new(config, SimulatedConnector::default()).run()?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// CORE
// ============================================================================

pub mod angle;
pub mod config;
pub mod connection;
pub mod dial;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod options;
pub mod session;
pub mod telemetry;
pub mod transport;

// ============================================================================
// PRESENTATION
// ============================================================================

pub mod app;
pub mod render;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use angle::{normalize_360, pointer_angle, raw_to_angle};
pub use app::DialApp;
pub use config::{DialConfig, LinkSettings, RingThresholds, DEFAULT_DIAL_DATA};
pub use connection::{ConnectionManager, ConnectionState, Connector, Transport};
pub use dial::Dial;
pub use error::{DialError, LinkError};
pub use geometry::{DialBounds, DialGeometry, Hit, Point, Ring};
pub use interaction::{DragState, PointerOutcome, RingAngles, RingInteraction};
pub use options::{resolve_option, DialData, DialOption, FilterSelection};
pub use session::{DialSession, PressResult};
pub use telemetry::{TelemetryLineParser, TelemetryRecord};
pub use transport::{SerialConnector, SerialTransport, SimulatedConnector, SimulatedDevice};
