// ============================================================================
// DIAL RENDERING
// ============================================================================
//
// Software rasteriser for the three-ring dial, drawing straight into the RGBA
// frame owned by `pixels`.

use crate::geometry::Ring;
use crate::options::{resolve_option, DialData};

/// Color representation for dial elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const BACKGROUND: Color = Color::new(0x12, 0x12, 0x14);
const RING_FILL: [Color; 3] = [
    Color::new(0x2a, 0x2a, 0x2e),
    Color::new(0x33, 0x33, 0x38),
    Color::new(0x3c, 0x3c, 0x42),
];
const RING_ACTIVE: Color = Color::new(0x4a, 0x4a, 0x52);
const TICK: Color = Color::new(0x9a, 0x9a, 0x9a);
const INDICATOR: Color = Color::new(0x7b, 0x7b, 0x7b);
const MARKER: Color = Color::new(0x6a, 0x6a, 0x6a);
const MARKER_ACTIVE: Color = Color::new(0xf0, 0xf0, 0xf0);
const BUTTON: Color = Color::new(0x7b, 0x7b, 0x7b);
const GLOW_CONNECTED: Color = Color::new(43, 123, 189);
const GLOW_DISCONNECTED: Color = Color::new(0xff, 0x00, 0x00);

/// Outer edge of each ring as a fraction of the dial radius.
const RING_EDGE: [f64; 3] = [1.0, 0.70, 0.40];
const TICK_LENGTH: f64 = 8.0;
const INDICATOR_HALF_SPAN: f64 = 22.5;

pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }
}

/// Displayed rotation of one ring, eased towards the real angle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingNeedle {
    pos: f64,
    target: f64,
}

impl RingNeedle {
    pub fn set_target(&mut self, angle: f64) {
        self.target = angle;
    }

    /// Dragged rings follow the pointer exactly; others glide.
    pub fn update(&mut self, snap: bool, factor: f64) {
        if snap {
            self.pos = self.target;
        } else {
            self.pos = lerp(self.pos, self.target, factor);
        }
    }

    pub fn pos(&self) -> f64 {
        self.pos
    }
}

/// Everything the renderer needs for one frame.
pub struct DialView<'a> {
    pub angles: [f64; 3],
    pub active: Option<Ring>,
    pub connected: bool,
    pub data: &'a DialData,
    pub tick_counts: [usize; 3],
    pub activation_radius: f64,
}

pub fn render_dial(canvas: &mut Canvas, view: &DialView) {
    canvas.clear(BACKGROUND);

    let cx = canvas.width as f64 / 2.0;
    let cy = canvas.height as f64 / 2.0;
    let radius = canvas.width.min(canvas.height) as f64 / 2.0 - 2.0;

    for ring in Ring::ALL {
        let i = ring.index();
        let r = radius * RING_EDGE[i];
        let fill = if view.active == Some(ring) {
            RING_ACTIVE
        } else {
            RING_FILL[i]
        };
        draw_disc(canvas, cx, cy, r, fill);

        let count = view.tick_counts[i];
        for t in 0..count {
            let angle = (360.0 / count as f64 * t as f64 + view.angles[i]).to_radians();
            let (x0, y0) = polar(cx, cy, r - 2.0 - TICK_LENGTH, angle);
            let (x1, y1) = polar(cx, cy, r - 2.0, angle);
            draw_thick_line_aa(canvas, x0, y0, x1, y1, 2.0, TICK);
        }

        draw_option_markers(canvas, cx, cy, r, ring, view);
    }

    for sign in [-1.0, 1.0] {
        let (x1, y1) = polar(cx, cy, radius, (sign * INDICATOR_HALF_SPAN).to_radians());
        draw_thick_line_aa(canvas, cx, cy, x1, y1, 3.0, INDICATOR);
    }

    let glow = if view.connected {
        GLOW_CONNECTED
    } else {
        GLOW_DISCONNECTED
    };
    draw_disc(canvas, cx, cy, view.activation_radius, glow);
    draw_disc(canvas, cx, cy, view.activation_radius - 3.0, BUTTON);
}

/// One dot per option, placed where its label would sit, brightest for the
/// resolved option.
fn draw_option_markers(canvas: &mut Canvas, cx: f64, cy: f64, r: f64, ring: Ring, view: &DialView) {
    let options = view.data.options(ring);
    let ring_angle = view.angles[ring.index()];
    let active = resolve_option(ring_angle, options);
    let marker_radius = r - TICK_LENGTH - 14.0;

    for option in options {
        // option angles are measured clockwise from 12 o'clock
        let angle = (option.angle - 90.0 + ring_angle).to_radians();
        let (x, y) = polar(cx, cy, marker_radius, angle);
        if active.is_some_and(|a| a == option) {
            draw_disc(canvas, x, y, 6.0, MARKER_ACTIVE);
        } else {
            draw_disc(canvas, x, y, 4.0, MARKER);
        }
    }
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + angle.cos() * r, cy + angle.sin() * r)
}

fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(canvas: &mut Canvas, x: usize, y: usize, color: Color, alpha: f32) {
    if x >= canvas.width || y >= canvas.height {
        return;
    }
    let idx = (y * canvas.width + x) * 4;
    let Some(dst) = canvas.frame.get_mut(idx..idx + 4) else {
        return;
    };
    let a = alpha.clamp(0.0, 1.0);
    let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    let out = [
        blend(color.r, dst[0]),
        blend(color.g, dst[1]),
        blend(color.b, dst[2]),
        0xff,
    ];
    dst.copy_from_slice(&out);
}

fn draw_thick_line_aa(canvas: &mut Canvas, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
    let pad = thickness.ceil() + 1.0;
    let min_x = (x0.min(x1) - pad).floor().max(0.0) as i64;
    let max_x = (x0.max(x1) + pad).ceil() as i64;
    let min_y = (y0.min(y1) - pad).floor().max(0.0) as i64;
    let max_y = (y0.max(y1) + pad).ceil() as i64;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 - x0;
            let py = y as f64 - y0;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = (lx - x as f64).hypot(ly - y as f64);
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)) as f32;
            if aa > 0.01 {
                set_pixel(canvas, x as usize, y as usize, color, aa);
            }
        }
    }
}

fn draw_disc(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let min_x = (cx - radius - 1.0).floor().max(0.0) as i64;
    let max_x = (cx + radius + 1.0).ceil() as i64;
    let min_y = (cy - radius - 1.0).floor().max(0.0) as i64;
    let max_y = (cy + radius + 1.0).ceil() as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = (x as f64 - cx).hypot(y as f64 - cy);
            let aa = if dist > radius {
                1.0 - (dist - radius).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                set_pixel(canvas, x as usize, y as usize, color, aa as f32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * width + x) * 4;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    fn view(data: &DialData, connected: bool) -> DialView<'_> {
        DialView {
            angles: [0.0; 3],
            active: None,
            connected,
            data,
            tick_counts: [56, 32, 10],
            activation_radius: 25.0,
        }
    }

    #[test]
    fn centre_button_reflects_connection() {
        let data = DialData::stock();
        let (w, h) = (200, 200);
        let mut frame = vec![0u8; w * h * 4];

        render_dial(&mut Canvas::new(&mut frame, w, h), &view(&data, false));
        // the glow ring sits just inside the button edge
        assert_eq!(pixel(&frame, w, 100 + 23, 100), [0xff, 0x00, 0x00, 0xff]);

        render_dial(&mut Canvas::new(&mut frame, w, h), &view(&data, true));
        assert_eq!(pixel(&frame, w, 100 + 23, 100), [43, 123, 189, 0xff]);
        assert_eq!(pixel(&frame, w, 100, 100), [0x7b, 0x7b, 0x7b, 0xff]);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let (w, h) = (10, 10);
        let mut frame = vec![0u8; w * h * 4];
        let mut canvas = Canvas::new(&mut frame, w, h);
        draw_disc(&mut canvas, 50.0, 50.0, 20.0, MARKER);
        draw_thick_line_aa(&mut canvas, -20.0, -20.0, 30.0, 30.0, 3.0, TICK);
        assert_eq!(frame.len(), w * h * 4);
    }

    #[test]
    fn needle_snaps_or_eases() {
        let mut needle = RingNeedle::default();
        needle.set_target(100.0);
        needle.update(false, 0.25);
        assert!((needle.pos() - 25.0).abs() < 1e-9);
        needle.update(true, 0.25);
        assert_eq!(needle.pos(), 100.0);
    }
}
