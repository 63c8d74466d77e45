use kurbo::Vec2;

use crate::model::{Animation, AnimationName};

/// Blur radius for the glow shadow, in logical pixels.
pub const GLOW_BLUR_RADIUS: f64 = 20.0;

/// Seconds a fade-in takes to reach full opacity.
const FADE_IN_SECS: f64 = 2.0;
/// Vertical travel of fadeInUp, in logical pixels.
const FADE_IN_UP_RISE: f64 = 50.0;
/// Seconds per revealed character in the typewriter animation.
const TYPEWRITER_SECS_PER_CHAR: f64 = 0.1;

/// Effective transform/opacity/text-reveal state for one element at one
/// instant.
///
/// Composed with the element's authored values by the renderer: opacity is
/// multiplied, the offset is added to the position, the scale is applied
/// uniformly about the element's center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimState {
    pub opacity_factor: f64,
    pub offset: Vec2,
    pub scale: f64,
    pub glow_radius: Option<f64>,
    /// Character count revealed so far; `None` means the full text.
    pub visible_chars: Option<usize>,
}

impl AnimState {
    pub fn identity() -> Self {
        Self {
            opacity_factor: 1.0,
            offset: Vec2::ZERO,
            scale: 1.0,
            glow_radius: None,
            visible_chars: None,
        }
    }
}

/// Evaluate an animation directive at `t` seconds since the scene became
/// visible.
///
/// Pure and restartable: the same `t` always yields the same state, with no
/// accumulator hiding between calls. Entrance animations saturate and stay
/// at their final state; looping ones wrap on their cycle length.
pub fn evaluate(animation: Option<&Animation>, t: f64) -> AnimState {
    let Some(animation) = animation else {
        return AnimState::identity();
    };
    let t = if t.is_finite() { t.max(0.0) } else { 0.0 };

    match animation.name {
        AnimationName::None => AnimState::identity(),
        AnimationName::FadeIn => AnimState {
            opacity_factor: fade_factor(t),
            ..AnimState::identity()
        },
        AnimationName::FadeInUp => {
            let factor = fade_factor(t);
            AnimState {
                opacity_factor: factor,
                offset: Vec2::new(0.0, -(1.0 - factor) * FADE_IN_UP_RISE),
                ..AnimState::identity()
            }
        }
        AnimationName::Bounce => {
            let phase = (t % 2.0) / 2.0;
            AnimState {
                scale: 1.0 + (phase * std::f64::consts::PI).sin() * 0.1,
                ..AnimState::identity()
            }
        }
        AnimationName::Glow => AnimState {
            glow_radius: Some(GLOW_BLUR_RADIUS),
            ..AnimState::identity()
        },
        AnimationName::Typewriter => AnimState {
            visible_chars: Some((t / TYPEWRITER_SECS_PER_CHAR).floor() as usize),
            ..AnimState::identity()
        },
        AnimationName::Pulse => AnimState {
            scale: 0.8 + 0.2 * (t * 2.0).sin(),
            ..AnimState::identity()
        },
    }
}

fn fade_factor(t: f64) -> f64 {
    (t / FADE_IN_SECS).clamp(0.0, 1.0)
}
