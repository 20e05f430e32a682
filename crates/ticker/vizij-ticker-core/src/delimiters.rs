//! Group delimiter planning and the delimiter pool.
//!
//! Positions are indices into the whole-number digits counted from the left:
//! a delimiter at `p` is drawn immediately before whole digit `p`, which leaves
//! `W - p` digits (a multiple of the group size) to its right.

use crate::animation::AnimationCurve;
use crate::layout::ElementState;
use crate::slots::Fade;

/// Compute delimiter positions for `whole_len` digits grouped by `group_size`.
///
/// Returned ascending. No delimiter ever precedes the leading digit.
pub fn plan_delimiters(whole_len: usize, group_size: usize) -> Vec<usize> {
    if whole_len == 0 || group_size == 0 {
        return Vec::new();
    }
    let mut count = whole_len / group_size;
    if whole_len % group_size == 0 {
        count -= 1;
    }
    if count == 0 {
        return Vec::new();
    }
    let mut positions: Vec<usize> = (1..=count).map(|i| whole_len - i * group_size).collect();
    positions.reverse();
    positions
}

/// Pool of delimiter elements keyed only by count.
///
/// Positions are reassigned fresh on every update; no element keeps a stable
/// mapping to a particular group boundary. The first `len()` elements are
/// active; the ones after them are fading out and are popped off the tail as
/// their fades finish.
#[derive(Debug, Default)]
pub struct DelimiterPool {
    items: Vec<PooledDelimiter>,
    active: usize,
}

#[derive(Clone, Copy, Debug)]
struct PooledDelimiter {
    element: ElementState,
    fade: Option<Fade>,
}

/// How the pool changed on the last resize.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolChange {
    pub added: usize,
    /// Retiring elements pulled back into service.
    pub reclaimed: usize,
    pub retired: usize,
    /// Indices dropped outright (no fade to run).
    pub detached: Vec<u32>,
}

impl DelimiterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active delimiters.
    #[inline]
    pub fn len(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    #[inline]
    pub fn retiring_len(&self) -> usize {
        self.items.len() - self.active
    }

    /// Resize the active set to `count`.
    ///
    /// Growth reclaims retiring elements before creating fresh (unplaced,
    /// transparent) ones. Shrinking starts a fade on the surplus when `fade`
    /// carries a positive duration and drops it immediately otherwise.
    pub fn resize(&mut self, count: usize, fade: Option<(f32, AnimationCurve)>) -> PoolChange {
        let mut change = PoolChange::default();
        if count >= self.active {
            let reclaim = (count - self.active).min(self.retiring_len());
            for item in &mut self.items[self.active..self.active + reclaim] {
                item.fade = None;
            }
            change.reclaimed = reclaim;
            change.added = count - self.active - reclaim;
            self.items.extend((0..change.added).map(|_| PooledDelimiter {
                element: ElementState::fresh(),
                fade: None,
            }));
        } else {
            change.retired = self.active - count;
            match fade {
                Some((duration, curve)) if duration > 0.0 => {
                    for item in &mut self.items[count..self.active] {
                        item.fade = Some(Fade {
                            from: item.element.opacity,
                            elapsed: 0.0,
                            duration,
                            curve,
                        });
                    }
                }
                _ => {
                    change.detached = (count..self.items.len()).map(|i| i as u32).collect();
                    self.items.truncate(count);
                }
            }
        }
        self.active = count;
        change
    }

    /// Advance retiring fades. Returns indices detached this step.
    pub fn advance(&mut self, dt: f32) -> Vec<u32> {
        for item in &mut self.items[self.active..] {
            if let Some(fade) = item.fade.as_mut() {
                fade.advance(dt);
                item.element.opacity = fade.opacity();
            }
        }
        // Only the tail is popped so indices of the remaining elements hold.
        let mut detached = Vec::new();
        while self.items.len() > self.active
            && self
                .items
                .last()
                .is_some_and(|d| d.fade.map_or(true, |f| f.is_done()))
        {
            self.items.pop();
            detached.push(self.items.len() as u32);
        }
        detached
    }

    /// Element at `index`, active or retiring.
    pub fn get(&self, index: usize) -> Option<&ElementState> {
        self.items.get(index).map(|d| &d.element)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ElementState> {
        self.items.get_mut(index).map(|d| &mut d.element)
    }

    pub fn is_retiring(&self, index: usize) -> bool {
        index >= self.active && index < self.items.len()
    }

    /// Every attached element, active first.
    pub fn iter(&self) -> impl Iterator<Item = &ElementState> {
        self.items.iter().map(|d| &d.element)
    }

    /// Drop everything. Returns the detached indices.
    pub fn clear(&mut self) -> Vec<u32> {
        let detached = (0..self.items.len()).map(|i| i as u32).collect();
        self.items.clear();
        self.active = 0;
        detached
    }
}
