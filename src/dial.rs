//! The dial as seen by its host: three rings, their options and the filter
//! output.
//!
//! Every angle change, whether from a drag or from telemetry, re-resolves the
//! active options and pushes the resulting [`FilterSelection`] to every
//! subscriber. Nothing is debounced.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::trace;

use crate::config::DialConfig;
use crate::geometry::{DialBounds, Point, Ring};
use crate::interaction::{PointerOutcome, RingAngles, RingInteraction};
use crate::options::{resolve_option, DialData, FilterSelection};
use crate::telemetry::TelemetryRecord;

pub struct Dial {
    interaction: RingInteraction,
    data: DialData,
    raw_max: f64,
    subscribers: Vec<Sender<FilterSelection>>,
}

impl Dial {
    pub fn new(config: &DialConfig) -> Self {
        Self {
            interaction: RingInteraction::new(config.geometry()),
            data: config.dial_data.clone(),
            raw_max: config.raw_max,
            subscribers: Vec::new(),
        }
    }

    /// Receives a selection after every angle change.
    pub fn subscribe(&mut self) -> Receiver<FilterSelection> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn data(&self) -> &DialData {
        &self.data
    }

    pub fn angles(&self) -> &RingAngles {
        self.interaction.angles()
    }

    pub fn angle(&self, ring: Ring) -> f64 {
        self.interaction.angle(ring)
    }

    pub fn active_ring(&self) -> Option<Ring> {
        self.interaction.active()
    }

    pub fn selection(&self) -> FilterSelection {
        let angles = self.interaction.angles();
        let resolve = |ring| resolve_option(angles.get(ring), self.data.options(ring)).cloned();
        FilterSelection {
            outer: resolve(Ring::Outer),
            middle: resolve(Ring::Middle),
            inner: resolve(Ring::Inner),
        }
    }

    pub fn pointer_down(&mut self, bounds: Option<&DialBounds>, point: Point) -> PointerOutcome {
        let outcome = self.interaction.pointer_down(bounds, point);
        if matches!(outcome, PointerOutcome::DragStarted { .. }) {
            self.publish();
        }
        outcome
    }

    pub fn pointer_move(&mut self, bounds: Option<&DialBounds>, point: Point) -> Option<(Ring, f64)> {
        let moved = self.interaction.pointer_move(bounds, point);
        if moved.is_some() {
            self.publish();
        }
        moved
    }

    pub fn pointer_up(&mut self) -> Option<Ring> {
        self.interaction.pointer_up()
    }

    /// Overwrites one ring regardless of any drag in progress.
    pub fn set_angle(&mut self, ring: Ring, angle: f64) {
        self.interaction.set_angle(ring, angle);
        self.publish();
    }

    /// Drives all three rings from one device sample.
    pub fn apply_telemetry(&mut self, record: &TelemetryRecord) {
        for (ring, angle) in record.angles(self.raw_max) {
            self.interaction.set_angle(ring, angle);
        }
        trace!(?record, "telemetry applied");
        self.publish();
    }

    /// Zeroes all rings and drops any drag. Returns the ring that was being
    /// dragged.
    pub fn reset(&mut self) -> Option<Ring> {
        let released = self.interaction.reset();
        self.publish();
        released
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let selection = self.selection();
        self.subscribers
            .retain(|tx| tx.send(selection.clone()).is_ok());
    }
}
