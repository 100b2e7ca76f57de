//! Exclusive-ring drag state machine.
//!
//! At most one ring receives pointer moves at a time. Telemetry writes go
//! straight to [`RingInteraction::set_angle`] and are never gated by the drag
//! state; whichever write lands last for a ring wins.

use tracing::{debug, trace};

use crate::geometry::{DialBounds, DialGeometry, Hit, Point, Ring};

/// Current rotation of every ring, in unwrapped degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingAngles([f64; 3]);

impl RingAngles {
    pub const fn new(outer: f64, middle: f64, inner: f64) -> Self {
        Self([outer, middle, inner])
    }

    pub fn get(&self, ring: Ring) -> f64 {
        self.0[ring.index()]
    }

    pub fn set(&mut self, ring: Ring, angle: f64) {
        self.0[ring.index()] = angle;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ring, f64)> + '_ {
        Ring::ALL.into_iter().map(|ring| (ring, self.get(ring)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Ring),
}

/// Result of a pointer or touch press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// The centre button was hit; the caller decides what toggling means.
    Activated,
    DragStarted { ring: Ring, angle: f64 },
    Missed,
}

#[derive(Debug, Clone)]
pub struct RingInteraction {
    geometry: DialGeometry,
    state: DragState,
    angles: RingAngles,
}

impl RingInteraction {
    pub fn new(geometry: DialGeometry) -> Self {
        Self {
            geometry,
            state: DragState::Idle,
            angles: RingAngles::default(),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// The ring currently being dragged, if any.
    pub fn active(&self) -> Option<Ring> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(ring) => Some(ring),
        }
    }

    pub fn angles(&self) -> &RingAngles {
        &self.angles
    }

    pub fn angle(&self, ring: Ring) -> f64 {
        self.angles.get(ring)
    }

    pub fn pointer_down(&mut self, bounds: Option<&DialBounds>, point: Point) -> PointerOutcome {
        match self.geometry.hit_test(bounds, point) {
            Hit::ActivationButton => {
                self.state = DragState::Idle;
                debug!("activation button pressed");
                PointerOutcome::Activated
            }
            Hit::Ring(ring) => {
                // hit_test only returns a ring for measurable bounds
                let angle = bounds.map_or(0.0, |b| b.angle_of(point));
                self.state = DragState::Dragging(ring);
                self.angles.set(ring, angle);
                debug!(?ring, angle, "drag started");
                PointerOutcome::DragStarted { ring, angle }
            }
            Hit::Nothing => {
                self.state = DragState::Idle;
                PointerOutcome::Missed
            }
        }
    }

    /// Rotates the dragged ring to follow the pointer. Ignored while idle.
    pub fn pointer_move(&mut self, bounds: Option<&DialBounds>, point: Point) -> Option<(Ring, f64)> {
        let DragState::Dragging(ring) = self.state else {
            return None;
        };
        let angle = bounds.map(|b| b.angle_of(point))?;
        self.angles.set(ring, angle);
        trace!(?ring, angle, "drag moved");
        Some((ring, angle))
    }

    /// Release, cancel and input loss all end the drag without moving a ring.
    pub fn pointer_up(&mut self) -> Option<Ring> {
        let released = self.active();
        self.state = DragState::Idle;
        if let Some(ring) = released {
            debug!(?ring, "drag ended");
        }
        released
    }

    /// Unconditional overwrite, independent of the drag state.
    pub fn set_angle(&mut self, ring: Ring, angle: f64) {
        self.angles.set(ring, angle);
    }

    /// Zeroes every ring and ends any drag in progress.
    pub fn reset(&mut self) -> Option<Ring> {
        self.angles = RingAngles::default();
        self.pointer_up()
    }
}
