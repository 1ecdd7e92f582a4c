//! Ambient traffic drawn around the board.
//!
//! Each decoration loops through four legs: travel out, turn, travel back,
//! turn back. Positions are fractions of the viewport so the paths survive
//! terminal resizes. Decorations never read or touch game state.

use crate::fb::{FrameBuffer, Style};

/// Quadratic ease-in-out on `0.0..=1.0`.
pub fn ease_quad_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationSpec {
    pub name: &'static str,
    /// Start point as `(x, y)` viewport fractions.
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub out_secs: f32,
    pub turn_secs: f32,
    pub back_secs: f32,
    pub turn_back_secs: f32,
    pub sprite_out: &'static str,
    pub sprite_back: &'static str,
}

impl DecorationSpec {
    pub const AIRCRAFT: DecorationSpec = DecorationSpec {
        name: "aircraft",
        from: (0.05, 0.06),
        to: (0.95, 0.06),
        out_secs: 8.0,
        turn_secs: 2.0,
        back_secs: 8.0,
        turn_back_secs: 2.0,
        sprite_out: "=-=>",
        sprite_back: "<=-=",
    };

    pub const COUPE: DecorationSpec = DecorationSpec {
        name: "coupe",
        from: (0.95, 0.94),
        to: (0.05, 0.94),
        out_secs: 20.0,
        turn_secs: 1.0,
        back_secs: 10.0,
        turn_back_secs: 2.0,
        sprite_out: "<o=o",
        sprite_back: "o=o>",
    };

    pub const ROADSTER: DecorationSpec = DecorationSpec {
        name: "roadster",
        from: (0.05, 0.97),
        to: (0.95, 0.97),
        out_secs: 9.5,
        turn_secs: 2.0,
        back_secs: 8.0,
        turn_back_secs: 2.0,
        sprite_out: "o-o>",
        sprite_back: "<o-o",
    };

    pub fn cycle_secs(&self) -> f32 {
        self.out_secs + self.turn_secs + self.back_secs + self.turn_back_secs
    }
}

/// Where a decoration is at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// `0.0` faces the outbound direction, `1.0` the return direction.
    pub heading: f32,
}

#[derive(Debug, Clone)]
pub struct Decoration {
    spec: DecorationSpec,
    elapsed: f32,
}

impl Decoration {
    pub fn new(spec: DecorationSpec) -> Self {
        Self { spec, elapsed: 0.0 }
    }

    pub fn spec(&self) -> &DecorationSpec {
        &self.spec
    }

    pub fn update(&mut self, delta_secs: f32) {
        if !delta_secs.is_finite() || delta_secs <= 0.0 {
            return;
        }
        let cycle = self.spec.cycle_secs();
        if cycle <= 0.0 {
            return;
        }
        self.elapsed = (self.elapsed + delta_secs) % cycle;
    }

    pub fn pose(&self) -> Pose {
        let s = &self.spec;
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        let along = |t: f32| Pose {
            x: lerp(s.from.0, s.to.0, t),
            y: lerp(s.from.1, s.to.1, t),
            heading: 0.0,
        };
        let progress = |t: f32, secs: f32| {
            if secs > 0.0 {
                ease_quad_in_out(t / secs)
            } else {
                1.0
            }
        };

        let mut t = self.elapsed;
        if t < s.out_secs {
            return along(progress(t, s.out_secs));
        }
        t -= s.out_secs;
        if t < s.turn_secs {
            return Pose {
                heading: progress(t, s.turn_secs),
                ..along(1.0)
            };
        }
        t -= s.turn_secs;
        if t < s.back_secs {
            return Pose {
                heading: 1.0,
                ..along(1.0 - progress(t, s.back_secs))
            };
        }
        t -= s.back_secs;
        Pose {
            heading: 1.0 - progress(t, s.turn_back_secs),
            ..along(0.0)
        }
    }

    pub fn sprite(&self, pose: &Pose) -> &'static str {
        if pose.heading < 0.5 {
            self.spec.sprite_out
        } else {
            self.spec.sprite_back
        }
    }

    pub fn draw_into(&self, fb: &mut FrameBuffer, style: Style) {
        let pose = self.pose();
        let sprite = self.sprite(&pose);
        let len = sprite.chars().count() as f32;
        let span_w = (fb.width() as f32 - len).max(0.0);
        let x = (pose.x * span_w).round().max(0.0) as u16;
        let y = (pose.y * fb.height().saturating_sub(1) as f32).round().max(0.0) as u16;
        fb.put_str(x, y, sprite, style);
    }
}

/// The default set: one aircraft overhead and two cars below.
pub fn default_decorations() -> Vec<Decoration> {
    [
        DecorationSpec::AIRCRAFT,
        DecorationSpec::COUPE,
        DecorationSpec::ROADSTER,
    ]
    .into_iter()
    .map(Decoration::new)
    .collect()
}
