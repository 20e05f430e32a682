//! Digit wheel capability.
//!
//! The counter only ever asks a wheel to scroll to a digit (animated or not)
//! and advances it with frame time. `RollingWheel` is the reference model used
//! by the wasm adapter and tests; hosts with native widgets implement
//! [`DigitWheel`] themselves.

use serde::{Deserialize, Serialize};

use crate::animation::{lerp_f32, AnimationCurve};

/// Timing shared by all wheels of one counter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WheelStyle {
    pub scroll_duration: f32,
    pub curve: AnimationCurve,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            scroll_duration: 0.6,
            curve: AnimationCurve::default(),
        }
    }
}

pub trait DigitWheel {
    /// Target `digit` (0..=9). `animated == false` snaps immediately.
    fn scroll_to(&mut self, digit: u8, animated: bool);
    /// Advance any running scroll by `dt` seconds.
    fn advance(&mut self, dt: f32);
    /// Digit the wheel is heading to (or resting on).
    fn digit(&self) -> u8;
    /// Fractional digit currently in view, e.g. 3.5 halfway between 3 and 4.
    fn scroll_position(&self) -> f32;
    fn is_scrolling(&self) -> bool;
    fn apply_style(&mut self, style: &WheelStyle);
}

/// Creates wheels for newly allocated slots.
pub trait WheelFactory {
    type Wheel: DigitWheel;
    fn create(&mut self, style: &WheelStyle) -> Self::Wheel;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Scroll {
    from: f32,
    elapsed: f32,
}

/// Wheel that interpolates its scroll position toward the target digit.
#[derive(Clone, Debug, PartialEq)]
pub struct RollingWheel {
    style: WheelStyle,
    digit: u8,
    position: f32,
    scroll: Option<Scroll>,
}

impl RollingWheel {
    pub fn new(style: WheelStyle) -> Self {
        Self {
            style,
            digit: 0,
            position: 0.0,
            scroll: None,
        }
    }
}

impl DigitWheel for RollingWheel {
    fn scroll_to(&mut self, digit: u8, animated: bool) {
        let digit = digit.min(9);
        if !animated || self.style.scroll_duration <= 0.0 {
            self.digit = digit;
            self.position = digit as f32;
            self.scroll = None;
            return;
        }
        if digit == self.digit && self.scroll.is_none() {
            return;
        }
        // Restart from wherever the wheel is now.
        self.scroll = Some(Scroll {
            from: self.position,
            elapsed: 0.0,
        });
        self.digit = digit;
    }

    fn advance(&mut self, dt: f32) {
        let Some(scroll) = self.scroll.as_mut() else {
            return;
        };
        if dt.is_finite() && dt > 0.0 {
            scroll.elapsed += dt;
        }
        let t = (scroll.elapsed / self.style.scroll_duration).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.position = self.digit as f32;
            self.scroll = None;
        } else {
            self.position = lerp_f32(scroll.from, self.digit as f32, self.style.curve.ease(t));
        }
    }

    fn digit(&self) -> u8 {
        self.digit
    }

    fn scroll_position(&self) -> f32 {
        self.position
    }

    fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    fn apply_style(&mut self, style: &WheelStyle) {
        self.style = *style;
        if self.style.scroll_duration <= 0.0 && self.scroll.is_some() {
            self.position = self.digit as f32;
            self.scroll = None;
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RollingWheelFactory;

impl WheelFactory for RollingWheelFactory {
    type Wheel = RollingWheel;

    fn create(&mut self, style: &WheelStyle) -> RollingWheel {
        RollingWheel::new(*style)
    }
}
