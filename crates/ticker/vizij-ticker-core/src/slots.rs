//! Digit slot reconciliation.
//!
//! [`plan_slots`] is the pure diff: growth adds slots at the most significant
//! end, shrinkage retires slots from the same end, and surviving slots keep
//! their identity positionally from the least significant end.
//! [`SlotArena`] applies a diff and owns retiring slots, each of which fades on
//! its own clock and is detached when its fade ends, independent of any batch.

use crate::animation::{lerp_f32, AnimationCurve};
use crate::ids::{IdAllocator, SlotId};
use crate::layout::ElementState;
use crate::wheel::{DigitWheel, WheelFactory, WheelStyle};

/// Slot bound to its target index in the new sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotTarget {
    pub index: usize,
    pub slot: SlotId,
    pub digit: u8,
}

/// Add/remove/retarget plan for one update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotDiff {
    pub created: Vec<SlotTarget>,
    pub retired: Vec<SlotId>,
    pub retargeted: Vec<SlotTarget>,
    /// Final slot order, most significant first.
    pub order: Vec<SlotId>,
}

/// Diff the current slot order against the new digit sequence.
pub fn plan_slots(current: &[SlotId], digits: &[u8], ids: &mut IdAllocator) -> SlotDiff {
    let n = digits.len();
    let m = current.len();
    let mut diff = SlotDiff {
        order: Vec::with_capacity(n),
        ..Default::default()
    };

    let kept = if n >= m {
        for (index, digit) in digits.iter().take(n - m).enumerate() {
            let slot = ids.alloc_slot();
            diff.created.push(SlotTarget {
                index,
                slot,
                digit: *digit,
            });
            diff.order.push(slot);
        }
        current
    } else {
        diff.retired.extend_from_slice(&current[..m - n]);
        &current[m - n..]
    };

    let offset = n - kept.len();
    for (j, slot) in kept.iter().enumerate() {
        let index = offset + j;
        diff.retargeted.push(SlotTarget {
            index,
            slot: *slot,
            digit: digits[index],
        });
        diff.order.push(*slot);
    }
    diff
}

#[derive(Debug)]
pub struct Slot<W> {
    pub id: SlotId,
    pub wheel: W,
    pub element: ElementState,
}

/// Independent fade-out timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub curve: AnimationCurve,
}

impl Fade {
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    pub fn is_done(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    pub fn opacity(&self) -> f32 {
        if self.is_done() {
            return 0.0;
        }
        let t = self.curve.ease(self.elapsed / self.duration);
        lerp_f32(self.from, 0.0, t)
    }
}

#[derive(Debug)]
pub struct RetiringSlot<W> {
    pub slot: Slot<W>,
    pub fade: Fade,
}

#[derive(Debug)]
pub struct SlotArena<W> {
    active: Vec<Slot<W>>,
    retiring: Vec<RetiringSlot<W>>,
}

impl<W> Default for SlotArena<W> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            retiring: Vec::new(),
        }
    }
}

impl<W: DigitWheel> SlotArena<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active slot ids, most significant first.
    pub fn ids(&self) -> Vec<SlotId> {
        self.active.iter().map(|s| s.id).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> &[Slot<W>] {
        &self.active
    }

    pub fn retiring(&self) -> &[RetiringSlot<W>] {
        &self.retiring
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot<W>> {
        self.active.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Slot<W>> {
        self.active.iter_mut().find(|s| s.id == id)
    }

    /// Apply `diff`. New wheels snap to their digit (they fade in rather than
    /// scroll); survivors scroll. Returns slots detached immediately, which
    /// happens when there is no fade to run.
    pub fn apply<F>(
        &mut self,
        diff: &SlotDiff,
        factory: &mut F,
        style: &WheelStyle,
        animated: bool,
        fade_duration: f32,
    ) -> Vec<SlotId>
    where
        F: WheelFactory<Wheel = W>,
    {
        let mut old = std::mem::take(&mut self.active);
        let mut detached = Vec::new();

        for id in &diff.retired {
            if let Some(pos) = old.iter().position(|s| s.id == *id) {
                let slot = old.remove(pos);
                if animated && fade_duration > 0.0 {
                    let from = slot.element.opacity;
                    self.retiring.push(RetiringSlot {
                        slot,
                        fade: Fade {
                            from,
                            elapsed: 0.0,
                            duration: fade_duration,
                            curve: style.curve,
                        },
                    });
                } else {
                    detached.push(*id);
                }
            }
        }

        let mut next = Vec::with_capacity(diff.order.len());
        for t in &diff.created {
            let mut wheel = factory.create(style);
            wheel.scroll_to(t.digit, false);
            next.push(Slot {
                id: t.slot,
                wheel,
                element: ElementState::fresh(),
            });
        }
        for t in &diff.retargeted {
            if let Some(pos) = old.iter().position(|s| s.id == t.slot) {
                let mut slot = old.remove(pos);
                slot.wheel.scroll_to(t.digit, animated);
                next.push(slot);
            }
        }
        // Anything left over wasn't named by the diff; detach it outright.
        detached.extend(old.into_iter().map(|s| s.id));
        self.active = next;
        detached
    }

    /// Advance wheels and retiring fades. Returns slots whose fade finished.
    pub fn advance(&mut self, dt: f32) -> Vec<SlotId> {
        for s in &mut self.active {
            s.wheel.advance(dt);
        }
        let mut detached = Vec::new();
        self.retiring.retain_mut(|r| {
            r.slot.wheel.advance(dt);
            r.fade.advance(dt);
            r.slot.element.opacity = r.fade.opacity();
            if r.fade.is_done() {
                detached.push(r.slot.id);
                false
            } else {
                true
            }
        });
        detached
    }

    pub fn apply_style(&mut self, style: &WheelStyle) {
        for s in &mut self.active {
            s.wheel.apply_style(style);
        }
        for r in &mut self.retiring {
            r.slot.wheel.apply_style(style);
        }
    }

    /// Drop everything, retiring slots included.
    pub fn clear(&mut self) -> Vec<SlotId> {
        let mut ids: Vec<SlotId> = self.active.drain(..).map(|s| s.id).collect();
        ids.extend(self.retiring.drain(..).map(|r| r.slot.id));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::RollingWheelFactory;

    fn ids_of(v: &[u32]) -> Vec<SlotId> {
        v.iter().copied().map(SlotId).collect()
    }

    #[test]
    fn growth_prepends_new_slots() {
        let mut alloc = IdAllocator::new();
        let current = vec![alloc.alloc_slot(), alloc.alloc_slot(), alloc.alloc_slot()];
        let diff = plan_slots(&current, &[1, 0, 0, 0], &mut alloc);
        assert_eq!(diff.created.len(), 1);
        assert_eq!(
            diff.created[0],
            SlotTarget {
                index: 0,
                slot: SlotId(3),
                digit: 1
            }
        );
        assert!(diff.retired.is_empty());
        assert_eq!(diff.order, ids_of(&[3, 0, 1, 2]));
        assert_eq!(diff.retargeted[0].index, 1);
        assert_eq!(diff.retargeted[0].slot, SlotId(0));
    }

    #[test]
    fn shrink_retires_leading_slots() {
        let mut alloc = IdAllocator::new();
        let current = ids_of(&[0, 1, 2, 3]);
        let diff = plan_slots(&current, &[4, 2], &mut alloc);
        assert_eq!(diff.retired, ids_of(&[0, 1]));
        assert!(diff.created.is_empty());
        assert_eq!(diff.order, ids_of(&[2, 3]));
        assert_eq!(diff.retargeted[1].digit, 2);
    }

    #[test]
    fn equal_counts_only_retarget() {
        let mut alloc = IdAllocator::new();
        let current = ids_of(&[5, 6]);
        let diff = plan_slots(&current, &[9, 9], &mut alloc);
        assert!(diff.created.is_empty() && diff.retired.is_empty());
        assert_eq!(diff.order, current);
    }

    #[test]
    fn arena_fades_retired_slots_independently() {
        let mut alloc = IdAllocator::new();
        let mut factory = RollingWheelFactory;
        let style = WheelStyle::default();
        let mut arena = SlotArena::new();

        let grow = plan_slots(&[], &[1, 2, 3], &mut alloc);
        assert!(arena.apply(&grow, &mut factory, &style, true, 0.5).is_empty());
        for s in arena.active.iter_mut() {
            s.element.opacity = 1.0;
        }
        assert_eq!(arena.len(), 3);

        let shrink = plan_slots(&arena.ids(), &[7], &mut alloc);
        assert!(arena.apply(&shrink, &mut factory, &style, true, 0.5).is_empty());
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.retiring().len(), 2);

        assert!(arena.advance(0.25).is_empty());
        let mid = arena.retiring()[0].slot.element.opacity;
        assert!(mid > 0.0 && mid < 1.0);
        let done = arena.advance(0.25);
        assert_eq!(done, ids_of(&[0, 1]));
        assert!(arena.retiring().is_empty());
        assert_eq!(arena.active()[0].wheel.digit(), 7);
    }

    #[test]
    fn non_animated_shrink_detaches_immediately() {
        let mut alloc = IdAllocator::new();
        let mut factory = RollingWheelFactory;
        let style = WheelStyle::default();
        let mut arena = SlotArena::new();
        let grow = plan_slots(&[], &[1, 2], &mut alloc);
        arena.apply(&grow, &mut factory, &style, false, 0.3);
        let shrink = plan_slots(&arena.ids(), &[5], &mut alloc);
        let detached = arena.apply(&shrink, &mut factory, &style, false, 0.3);
        assert_eq!(detached, ids_of(&[0]));
        assert!(arena.retiring().is_empty());
    }
}
