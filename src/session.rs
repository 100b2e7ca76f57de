//! Ties the dial to its telemetry link.

use tracing::{debug, error, warn};

use crate::config::DialConfig;
use crate::connection::{ConnectionManager, ConnectionState, Connector};
use crate::dial::Dial;
use crate::error::LinkError;
use crate::geometry::{DialBounds, Point, Ring};
use crate::interaction::PointerOutcome;

/// What the host should do after a press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressResult {
    /// A ring is now being dragged; the host should capture the pointer.
    Dragging(Ring),
    /// The centre button was hit and the link toggled.
    Toggled,
    Missed,
}

pub struct DialSession<C: Connector> {
    dial: Dial,
    link: ConnectionManager<C>,
}

impl<C: Connector> DialSession<C> {
    pub fn new(config: &DialConfig, connector: C) -> Self {
        Self {
            dial: Dial::new(config),
            link: ConnectionManager::new(connector, config.link_settings()),
        }
    }

    pub fn dial(&self) -> &Dial {
        &self.dial
    }

    pub fn dial_mut(&mut self) -> &mut Dial {
        &mut self.dial
    }

    pub fn link(&self) -> &ConnectionManager<C> {
        &self.link
    }

    pub fn connection_state(&self) -> &ConnectionState {
        self.link.state()
    }

    pub fn press(&mut self, bounds: Option<&DialBounds>, point: Point) -> PressResult {
        match self.dial.pointer_down(bounds, point) {
            PointerOutcome::Activated => {
                self.toggle();
                PressResult::Toggled
            }
            PointerOutcome::DragStarted { ring, .. } => PressResult::Dragging(ring),
            PointerOutcome::Missed => PressResult::Missed,
        }
    }

    pub fn drag(&mut self, bounds: Option<&DialBounds>, point: Point) {
        self.dial.pointer_move(bounds, point);
    }

    pub fn release(&mut self) -> Option<Ring> {
        self.dial.pointer_up()
    }

    /// Connects when no transport is held, disconnects otherwise.
    pub fn toggle(&mut self) {
        if self.link.has_session() {
            self.disconnect();
        } else if let Err(e) = self.link.connect() {
            report_connect_failure(&e);
        }
    }

    pub fn connect(&mut self) {
        if let Err(e) = self.link.connect() {
            report_connect_failure(&e);
        }
    }

    /// Tears the link down and zeroes every ring, whatever state it was in.
    pub fn disconnect(&mut self) -> Option<Ring> {
        self.link.disconnect();
        self.dial.reset()
    }

    /// Applies every telemetry record received since the last call, oldest
    /// first. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let records = self.link.poll();
        for record in &records {
            self.dial.apply_telemetry(record);
        }
        if !records.is_empty() && self.dial.active_ring().is_some() {
            debug!(count = records.len(), "telemetry overrode an active drag");
        }
        records.len()
    }
}

/// The state already carries the message; this only picks how loudly to log.
fn report_connect_failure(e: &LinkError) {
    if e.is_recoverable() {
        warn!(error = %e, "connect failed, press the button to retry");
    } else {
        error!(error = %e, "telemetry link unavailable");
    }
}
