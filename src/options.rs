//! Discrete labelled options selected by each ring's rotation.

use crate::angle::normalize_360;
use crate::geometry::Ring;

/// A labelled angular segment of a ring.
///
/// `angle` is where the label is drawn. Lookup uses list position instead,
/// see [`resolve_option`].
#[derive(Debug, Clone, PartialEq)]
pub struct DialOption {
    pub label: String,
    pub angle: f64,
}

impl DialOption {
    pub fn new(label: impl Into<String>, angle: f64) -> Self {
        Self {
            label: label.into(),
            angle,
        }
    }
}

/// Ordered option lists, one per ring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialData {
    pub outer: Vec<DialOption>,
    pub middle: Vec<DialOption>,
    pub inner: Vec<DialOption>,
}

impl DialData {
    pub fn options(&self, ring: Ring) -> &[DialOption] {
        match ring {
            Ring::Outer => &self.outer,
            Ring::Middle => &self.middle,
            Ring::Inner => &self.inner,
        }
    }

    /// The stock table: eight outer options at 45° spacing, middle and inner
    /// rings unpopulated.
    pub fn stock() -> Self {
        let outer = [
            ("keep me engaged", 90.0),
            ("update me", 45.0),
            ("educate me", 0.0),
            ("give me perspective", -45.0),
            ("divert me", -90.0),
            ("inspire me", -135.0),
            ("connect me", -180.0),
            ("help me", 135.0),
        ]
        .into_iter()
        .map(|(label, angle)| DialOption::new(label, angle))
        .collect();

        Self {
            outer,
            middle: Vec::new(),
            inner: Vec::new(),
        }
    }
}

/// Circular nearest-segment lookup.
///
/// The options are assumed to sit at `i * 360 / len` in list order; each
/// segment is centred on its option, and an angle exactly on a boundary
/// belongs to the upper segment.
pub fn resolve_option(angle: f64, options: &[DialOption]) -> Option<&DialOption> {
    if options.is_empty() {
        return None;
    }

    let count = options.len();
    let segment = 360.0 / count as f64;
    let normalized = normalize_360(angle);
    let index = ((segment / 2.0 + normalized) / segment).floor() as usize % count;

    options.get(index)
}

/// The active option of every ring, as handed to the content filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub outer: Option<DialOption>,
    pub middle: Option<DialOption>,
    pub inner: Option<DialOption>,
}

impl FilterSelection {
    pub fn get(&self, ring: Ring) -> Option<&DialOption> {
        match ring {
            Ring::Outer => self.outer.as_ref(),
            Ring::Middle => self.middle.as_ref(),
            Ring::Inner => self.inner.as_ref(),
        }
    }
}
