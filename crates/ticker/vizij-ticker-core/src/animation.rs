//! Animation batches and easing curves.
//!
//! A batch is one atomic set of (position, opacity) transitions with a single
//! duration, a single curve and at most one completion callback. The counter
//! keeps exactly one batch in flight; a new update drops the old batch after
//! its sampled values have already been written back, which is what gives the
//! "stop without reverting" behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::BatchId;
use crate::layout::ElementKey;

/// Completion callback fired once when a batch runs to its natural end.
pub type Completion = Box<dyn FnOnce()>;

/// Timing curve applied to batch progress (and to wheel scrolling).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCurve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// Cubic-bezier control points (x1, y1, x2, y2).
    Bezier([f32; 4]),
}

impl AnimationCurve {
    /// Control points for this curve, CSS conventions.
    pub fn control_points(&self) -> [f32; 4] {
        match self {
            AnimationCurve::Linear => [0.0, 0.0, 1.0, 1.0],
            AnimationCurve::EaseIn => [0.42, 0.0, 1.0, 1.0],
            AnimationCurve::EaseOut => [0.0, 0.0, 0.58, 1.0],
            AnimationCurve::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            AnimationCurve::Bezier(ctrl) => *ctrl,
        }
    }

    /// Map linear progress `t` in [0,1] to eased progress.
    pub fn ease(&self, t: f32) -> f32 {
        let [x1, y1, x2, y2] = self.control_points();
        bezier_ease_t(t, x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2)
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x bezier by binary search, then evaluate y.
#[inline]
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One element's move/fade inside a batch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub key: ElementKey,
    pub from_x: f32,
    pub to_x: f32,
    pub from_opacity: f32,
    pub to_opacity: f32,
}

impl Transition {
    /// (x, opacity) at eased progress `e`.
    #[inline]
    pub fn sample(&self, e: f32) -> (f32, f32) {
        (
            lerp_f32(self.from_x, self.to_x, e),
            lerp_f32(self.from_opacity, self.to_opacity, e),
        )
    }

    pub fn is_noop(&self) -> bool {
        self.from_x == self.to_x && self.from_opacity == self.to_opacity
    }
}

/// The in-flight batch. Dropping it without calling [`AnimationBatch::complete`]
/// discards the callback unfired.
pub struct AnimationBatch {
    id: BatchId,
    duration: f32,
    curve: AnimationCurve,
    elapsed: f32,
    transitions: Vec<Transition>,
    on_complete: Option<Completion>,
}

impl fmt::Debug for AnimationBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationBatch")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .field("curve", &self.curve)
            .field("elapsed", &self.elapsed)
            .field("transitions", &self.transitions.len())
            .field("has_completion", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimationBatch {
    pub fn new(
        id: BatchId,
        duration: f32,
        curve: AnimationCurve,
        transitions: Vec<Transition>,
        on_complete: Option<Completion>,
    ) -> Self {
        Self {
            id,
            duration: if duration.is_finite() {
                duration.max(0.0)
            } else {
                0.0
            },
            curve,
            elapsed: 0.0,
            transitions,
            on_complete,
        }
    }

    #[inline]
    pub fn id(&self) -> BatchId {
        self.id
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Linear progress in [0,1]; zero-duration batches are always complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        }
    }

    /// Current (key, x, opacity) for every transition.
    pub fn sample(&self) -> impl Iterator<Item = (ElementKey, f32, f32)> + '_ {
        let e = if self.is_finished() {
            1.0
        } else {
            self.curve.ease(self.progress())
        };
        self.transitions.iter().map(move |tr| {
            let (x, o) = tr.sample(e);
            (tr.key, x, o)
        })
    }

    /// Natural completion: fire the callback (if any) exactly once.
    pub fn complete(mut self) {
        if let Some(cb) = self.on_complete.take() {
            cb();
        }
    }

    /// Supersede: the callback is dropped unfired.
    pub fn cancel(mut self) {
        if self.on_complete.take().is_some() {
            log::debug!("batch {:?} superseded; completion dropped", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SlotId;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tr(from: f32, to: f32) -> Transition {
        Transition {
            key: ElementKey::Digit(SlotId(0)),
            from_x: from,
            to_x: to,
            from_opacity: 0.0,
            to_opacity: 1.0,
        }
    }

    #[test]
    fn curves_hit_endpoints() {
        for c in [
            AnimationCurve::Linear,
            AnimationCurve::EaseIn,
            AnimationCurve::EaseOut,
            AnimationCurve::EaseInOut,
            AnimationCurve::Bezier([0.25, 0.1, 0.25, 1.0]),
        ] {
            assert_eq!(c.ease(0.0), 0.0);
            assert_eq!(c.ease(1.0), 1.0);
        }
        assert!((AnimationCurve::Linear.ease(0.3) - 0.3).abs() < 1e-6);
        assert!((AnimationCurve::EaseInOut.ease(0.5) - 0.5).abs() < 1e-3);
        assert!(AnimationCurve::EaseIn.ease(0.25) < 0.25);
        assert!(AnimationCurve::EaseOut.ease(0.25) > 0.25);
    }

    #[test]
    fn batch_samples_and_completes_once() {
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let mut batch = AnimationBatch::new(
            BatchId(7),
            1.0,
            AnimationCurve::Linear,
            vec![tr(0.0, 10.0)],
            Some(Box::new(move || f.set(f.get() + 1))),
        );
        batch.advance(0.5);
        let (_, x, o) = batch.sample().next().unwrap();
        assert!((x - 5.0).abs() < 1e-4);
        assert!((o - 0.5).abs() < 1e-4);
        assert!(!batch.is_finished());
        batch.advance(2.0);
        assert!(batch.is_finished());
        assert_eq!(batch.elapsed(), 1.0);
        batch.complete();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancel_drops_callback() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let batch = AnimationBatch::new(
            BatchId(0),
            1.0,
            AnimationCurve::EaseOut,
            vec![tr(0.0, 1.0)],
            Some(Box::new(move || f.set(true))),
        );
        batch.cancel();
        assert!(!fired.get());
    }

    #[test]
    fn zero_duration_is_finished_at_target() {
        let batch = AnimationBatch::new(
            BatchId(1),
            0.0,
            AnimationCurve::EaseInOut,
            vec![tr(3.0, 9.0)],
            None,
        );
        assert!(batch.is_finished());
        let (_, x, o) = batch.sample().next().unwrap();
        assert_eq!(x, 9.0);
        assert_eq!(o, 1.0);
    }

    #[test]
    fn curve_json_shape() {
        let c: AnimationCurve = serde_json::from_str("\"ease_out\"").unwrap();
        assert_eq!(c, AnimationCurve::EaseOut);
        let b: AnimationCurve = serde_json::from_str(r#"{"bezier":[0.1,0.2,0.3,0.4]}"#).unwrap();
        assert_eq!(b, AnimationCurve::Bezier([0.1, 0.2, 0.3, 0.4]));
    }
}
