//! Counter: owns the authoritative value, the slot/delimiter pools and the
//! in-flight batch, and runs the parse → truncate → diff → plan → sequence
//! pipeline on every value or config change.
//!
//! State machine:
//! - Idle --set_value--> (reconcile, synchronous) --> Animating(batch)
//! - Animating --update reaches the end--> Idle (completion fires)
//! - Animating --set_value--> batch superseded, reconcile again, Animating(new batch)
//! - Animating --stop_animations--> Idle (no completion, fading sign detached)
//!
//! Non-animated updates build a zero-length batch that completes before
//! `set_value` returns.

use std::fmt;

use crate::animation::{AnimationBatch, Completion, Transition};
use crate::config::{GradientStops, TickerConfig};
use crate::delimiters::{plan_delimiters, DelimiterPool};
use crate::error::TickerError;
use crate::ids::{BatchId, IdAllocator, SlotId};
use crate::layout::{
    build_entries, sequence, ElementKey, ElementState, GlyphMetrics, Layout, LayoutPlan, Size,
};
use crate::outputs::{ElementFrame, TickerEvent, TickerOutputs, WheelFrame};
use crate::slots::{plan_slots, SlotArena};
use crate::truncate::truncate_decimals;
use crate::value::{format_number, parse_value, DisplayValue};
use crate::wheel::{DigitWheel, WheelFactory, WheelStyle};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Animating(BatchId),
}

/// A decoration glyph (prefix, sign, separator, suffix).
#[derive(Clone, Debug)]
struct Glyph {
    text: String,
    element: ElementState,
    /// Fading out; detached when the current batch completes.
    retiring: bool,
}

impl Glyph {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            element: ElementState::fresh(),
            retiring: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Decorations {
    prefix: Option<Glyph>,
    sign: Option<Glyph>,
    separator: Option<Glyph>,
    suffix: Option<Glyph>,
}

/// Text of a glyph that should take up space in the layout.
fn visible_text(g: &Option<Glyph>) -> Option<&str> {
    g.as_ref()
        .filter(|g| !g.retiring && !g.text.is_empty())
        .map(|g| g.text.as_str())
}

/// Lazily create a persistent glyph once `text` is non-empty; afterwards only
/// its text changes.
fn sync_persistent(slot: &mut Option<Glyph>, text: &str) {
    match slot {
        Some(g) => text.clone_into(&mut g.text),
        None if !text.is_empty() => *slot = Some(Glyph::new(text)),
        None => {}
    }
}

pub struct Counter<F: WheelFactory, M: GlyphMetrics> {
    cfg: TickerConfig,
    factory: F,
    metrics: M,
    ids: IdAllocator,

    // Authoritative input and what it resolved to.
    source: String,
    value: DisplayValue,
    decimal_places: usize,
    delimiter_positions: Vec<usize>,

    // Pools
    slots: SlotArena<F::Wheel>,
    delimiters: DelimiterPool,
    decorations: Decorations,

    batch: Option<AnimationBatch>,
    layout: Layout,

    pending: Vec<TickerEvent>,
    outputs: TickerOutputs,
}

impl<F: WheelFactory, M: GlyphMetrics> fmt::Debug for Counter<F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("source", &self.source)
            .field("value", &self.value)
            .field("decimal_places", &self.decimal_places)
            .field("slots", &self.slots.ids())
            .field("retiring", &self.slots.retiring().len())
            .field("delimiters", &self.delimiter_positions)
            .field("batch", &self.batch)
            .finish()
    }
}

impl<F: WheelFactory, M: GlyphMetrics> Counter<F, M> {
    /// Build a counter showing `initial` without animation.
    ///
    /// Fails if the config is invalid or `initial` has no digits.
    pub fn new(cfg: TickerConfig, factory: F, metrics: M, initial: &str) -> Result<Self, TickerError> {
        cfg.validate()?;
        if parse_value(initial, &cfg.separator).is_empty() {
            return Err(TickerError::EmptyValue {
                input: initial.to_string(),
            });
        }
        let mut counter = Self {
            cfg,
            factory,
            metrics,
            ids: IdAllocator::new(),
            source: initial.to_string(),
            value: DisplayValue::default(),
            decimal_places: 0,
            delimiter_positions: Vec::new(),
            slots: SlotArena::new(),
            delimiters: DelimiterPool::new(),
            decorations: Decorations::default(),
            batch: None,
            layout: Layout::default(),
            pending: Vec::new(),
            outputs: TickerOutputs::default(),
        };
        counter.reconcile(false, None);
        Ok(counter)
    }

    /// Show `value`. Supersedes any in-flight batch; `on_complete` fires once
    /// iff the new batch runs to its end.
    pub fn set_value(&mut self, value: &str, animated: bool, on_complete: Option<Completion>) {
        value.clone_into(&mut self.source);
        self.reconcile(animated, on_complete);
    }

    /// Format `value` with the configured precision and separator, then show it.
    pub fn set_number(&mut self, value: f64, animated: bool, on_complete: Option<Completion>) {
        let text = format_number(value, self.cfg.decimal_places, &self.cfg.separator);
        self.set_value(&text, animated, on_complete);
    }

    /// Stop the in-flight batch where it is. No completion fires.
    ///
    /// A sign that was fading out is detached, since no batch will finish
    /// its fade. Retiring slots and delimiters keep fading on their own clock.
    pub fn stop_animations(&mut self) {
        if let Some(batch) = self.batch.take() {
            self.pending.push(TickerEvent::BatchStopped { batch: batch.id() });
            batch.cancel();
        }
        self.detach_retiring_sign();
    }

    /// Discard every pooled element and rebuild from the last value, unanimated.
    /// Use after host styling (font, metrics) changes.
    pub fn reset_layout(&mut self) {
        self.stop_animations();
        for slot in self.slots.clear() {
            self.pending.push(TickerEvent::SlotDetached { slot });
        }
        for index in self.delimiters.clear() {
            self.pending.push(TickerEvent::DelimiterDetached { index });
        }
        self.decorations = Decorations::default();
        self.pending.push(TickerEvent::LayoutReset);
        self.reconcile(false, None);
    }

    /// Replace the config and re-lay out the current value without animation.
    pub fn set_config(&mut self, cfg: TickerConfig) -> Result<(), TickerError> {
        cfg.validate()?;
        self.cfg = cfg;
        let style = self.wheel_style();
        self.slots.apply_style(&style);
        self.reconcile(false, None);
        Ok(())
    }

    /// Edit a copy of the config; applied only if it validates.
    pub fn update_config<U>(&mut self, edit: U) -> Result<(), TickerError>
    where
        U: FnOnce(&mut TickerConfig),
    {
        let mut cfg = self.cfg.clone();
        edit(&mut cfg);
        self.set_config(cfg)
    }

    /// Replace glyph metrics; geometry is rebuilt from scratch.
    pub fn set_metrics(&mut self, metrics: M) {
        self.metrics = metrics;
        self.reset_layout();
    }

    /// Advance wheels, retiring fades and the in-flight batch by `dt` seconds
    /// and return this frame's outputs.
    pub fn update(&mut self, dt: f32) -> &TickerOutputs {
        self.outputs.clear();

        for slot in self.slots.advance(dt) {
            self.pending.push(TickerEvent::SlotDetached { slot });
        }
        for index in self.delimiters.advance(dt) {
            self.pending.push(TickerEvent::DelimiterDetached { index });
        }

        if let Some(mut batch) = self.batch.take() {
            batch.advance(dt);
            self.write_samples(&batch);
            log::trace!(
                "batch {:?} at {:.3}/{:.3}s",
                batch.id(),
                batch.elapsed(),
                batch.duration()
            );
            if batch.is_finished() {
                self.finish_batch(batch);
            } else {
                self.batch = Some(batch);
            }
        }

        self.outputs.elements = self.frames();
        self.outputs.wheels = self.wheel_frames();
        self.outputs.events.append(&mut self.pending);
        self.outputs.size = self.intrinsic_size();
        self.outputs.gradient = self.gradient();
        &self.outputs
    }

    pub fn state(&self) -> CounterState {
        match &self.batch {
            Some(b) => CounterState::Animating(b.id()),
            None => CounterState::Idle,
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.cfg
    }

    /// Last string handed to `set_value` (or produced by `set_number`).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Value after parsing and decimal truncation.
    pub fn value(&self) -> &DisplayValue {
        &self.value
    }

    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.ids()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn retiring_slot_count(&self) -> usize {
        self.slots.retiring().len()
    }

    pub fn wheel(&self, slot: SlotId) -> Option<&F::Wheel> {
        self.slots.get(slot).map(|s| &s.wheel)
    }

    pub fn delimiter_positions(&self) -> &[usize] {
        &self.delimiter_positions
    }

    /// Target layout of the last reconciliation.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Content size: extent of the rightmost laid-out element.
    pub fn intrinsic_size(&self) -> Size {
        self.layout.size
    }

    pub fn gradient(&self) -> GradientStops {
        self.cfg.gradient.effective()
    }

    /// Current state of an attached element, if any.
    pub fn element(&self, key: ElementKey) -> Option<ElementState> {
        match key {
            ElementKey::Prefix => self.decorations.prefix.as_ref().map(|g| g.element),
            ElementKey::Sign => self.decorations.sign.as_ref().map(|g| g.element),
            ElementKey::Separator => self.decorations.separator.as_ref().map(|g| g.element),
            ElementKey::Suffix => self.decorations.suffix.as_ref().map(|g| g.element),
            ElementKey::Delimiter(i) => self.delimiters.get(i as usize).copied(),
            ElementKey::Digit(id) => self.slots.get(id).map(|s| s.element).or_else(|| {
                self.slots
                    .retiring()
                    .iter()
                    .find(|r| r.slot.id == id)
                    .map(|r| r.slot.element)
            }),
        }
    }

    /// The in-flight batch, if any.
    pub fn batch(&self) -> Option<&AnimationBatch> {
        self.batch.as_ref()
    }

    fn wheel_style(&self) -> WheelStyle {
        WheelStyle {
            scroll_duration: self.cfg.scroll_duration,
            curve: self.cfg.curve,
        }
    }

    fn element_mut(&mut self, key: ElementKey) -> Option<&mut ElementState> {
        let d = &mut self.decorations;
        match key {
            ElementKey::Prefix => d.prefix.as_mut().map(|g| &mut g.element),
            ElementKey::Sign => d.sign.as_mut().map(|g| &mut g.element),
            ElementKey::Separator => d.separator.as_mut().map(|g| &mut g.element),
            ElementKey::Suffix => d.suffix.as_mut().map(|g| &mut g.element),
            ElementKey::Delimiter(i) => self.delimiters.get_mut(i as usize),
            ElementKey::Digit(id) => self.slots.get_mut(id).map(|s| &mut s.element),
        }
    }

    fn write_samples(&mut self, batch: &AnimationBatch) {
        for (key, x, opacity) in batch.sample() {
            if let Some(el) = self.element_mut(key) {
                el.x = x;
                el.opacity = opacity;
            }
        }
    }

    fn finish_batch(&mut self, batch: AnimationBatch) {
        self.write_samples(&batch);
        self.detach_retiring_sign();
        self.pending
            .push(TickerEvent::BatchCompleted { batch: batch.id() });
        batch.complete();
    }

    fn detach_retiring_sign(&mut self) {
        if self.decorations.sign.as_ref().is_some_and(|g| g.retiring) {
            self.decorations.sign = None;
            self.pending.push(TickerEvent::SignDetached);
        }
    }

    /// The synchronous half of an update: parse, truncate, diff, plan,
    /// sequence, then submit one batch.
    fn reconcile(&mut self, animated: bool, on_complete: Option<Completion>) {
        if let Some(old) = self.batch.take() {
            log::debug!("superseding batch {:?}", old.id());
            self.pending
                .push(TickerEvent::BatchSuperseded { batch: old.id() });
            old.cancel();
        }

        let parsed = parse_value(&self.source, &self.cfg.separator);
        let truncated = truncate_decimals(&parsed, self.cfg.decimal_places);
        let value = truncated.value;
        let whole_len = value.whole_len();
        let fraction_len = value.fraction_len();

        // Slots
        let style = self.wheel_style();
        let diff = plan_slots(&self.slots.ids(), &value.digits, &mut self.ids);
        let detached = self.slots.apply(
            &diff,
            &mut self.factory,
            &style,
            animated,
            self.cfg.slide_duration,
        );
        for slot in detached {
            self.pending.push(TickerEvent::SlotDetached { slot });
        }

        // Delimiters
        let grouping = self.cfg.grouping();
        let positions = match grouping {
            Some((_, group)) => plan_delimiters(whole_len, group),
            None => Vec::new(),
        };
        let fade = animated.then_some((self.cfg.slide_duration, self.cfg.curve));
        let change = self.delimiters.resize(positions.len(), fade);
        for &index in &change.detached {
            self.pending.push(TickerEvent::DelimiterDetached { index });
        }

        // Decorations
        sync_persistent(&mut self.decorations.prefix, self.cfg.prefix_text());
        sync_persistent(&mut self.decorations.suffix, self.cfg.suffix_text());
        if fraction_len > 0 {
            sync_persistent(&mut self.decorations.separator, &self.cfg.separator);
        } else if let Some(sep) = self.decorations.separator.as_mut() {
            self.cfg.separator.clone_into(&mut sep.text);
        }
        if value.negative {
            match self.decorations.sign.as_mut() {
                Some(g) => {
                    g.retiring = false;
                    self.cfg.sign.clone_into(&mut g.text);
                }
                None => self.decorations.sign = Some(Glyph::new(&self.cfg.sign)),
            }
        } else if let Some(g) = self.decorations.sign.as_mut() {
            g.retiring = true;
        }

        // Sequence
        let d = &self.decorations;
        let plan = LayoutPlan {
            prefix: visible_text(&d.prefix),
            sign: visible_text(&d.sign),
            slots: &diff.order,
            whole_len,
            delimiter: grouping.map(|(text, _)| text),
            delimiter_positions: &positions,
            separator: if fraction_len > 0 {
                visible_text(&d.separator)
            } else {
                None
            },
            suffix: visible_text(&d.suffix),
        };
        let layout = sequence(&build_entries(&plan, &self.metrics));

        // Transitions: laid-out elements move/fade in, the rest fade out in place.
        let mut transitions = Vec::with_capacity(layout.placements.len() + 4);
        for p in &layout.placements {
            if let Some(el) = self.element_mut(p.key) {
                el.width = p.width;
                if !el.placed {
                    el.x = p.x;
                    el.placed = true;
                }
                transitions.push(Transition {
                    key: p.key,
                    from_x: el.x,
                    to_x: p.x,
                    from_opacity: el.opacity,
                    to_opacity: 1.0,
                });
            }
        }
        for key in [
            ElementKey::Prefix,
            ElementKey::Sign,
            ElementKey::Separator,
            ElementKey::Suffix,
        ] {
            if layout.get(key).is_some() {
                continue;
            }
            if let Some(el) = self.element_mut(key) {
                if !el.placed {
                    el.opacity = 0.0;
                    continue;
                }
                transitions.push(Transition {
                    key,
                    from_x: el.x,
                    to_x: el.x,
                    from_opacity: el.opacity,
                    to_opacity: 0.0,
                });
            }
        }
        transitions.retain(|t| !t.is_noop());

        let duration = if animated {
            self.cfg.slide_duration
        } else {
            0.0
        };
        let id = self.ids.alloc_batch();
        log::debug!(
            "reconcile {:?}: {} digits ({} created, {} retired), {} delimiters ({} added, {} retired), batch {:?} {}s",
            self.source,
            value.len(),
            diff.created.len(),
            diff.retired.len(),
            positions.len(),
            change.added + change.reclaimed,
            change.retired,
            id,
            duration
        );

        self.value = value;
        self.decimal_places = truncated.decimal_places;
        self.delimiter_positions = positions;
        self.layout = layout;

        let batch = AnimationBatch::new(id, duration, self.cfg.curve, transitions, on_complete);
        self.pending.push(TickerEvent::BatchStarted {
            batch: id,
            duration: batch.duration(),
        });
        if batch.is_finished() {
            self.finish_batch(batch);
        } else {
            self.batch = Some(batch);
        }
    }

    fn frames(&self) -> Vec<ElementFrame> {
        let mut frames = Vec::new();
        let glyph = |key: ElementKey, g: &Option<Glyph>| {
            g.as_ref().map(|g| ElementFrame {
                key,
                x: g.element.x,
                width: g.element.width,
                opacity: g.element.opacity,
                text: Some(g.text.clone()),
            })
        };
        let d = &self.decorations;
        frames.extend(glyph(ElementKey::Prefix, &d.prefix));
        frames.extend(glyph(ElementKey::Sign, &d.sign));
        let delimiter_text = self.cfg.delimiter.clone().unwrap_or_default();
        for (i, el) in self.delimiters.iter().enumerate() {
            frames.push(ElementFrame {
                key: ElementKey::Delimiter(i as u32),
                x: el.x,
                width: el.width,
                opacity: el.opacity,
                text: Some(delimiter_text.clone()),
            });
        }
        let digit = |id: SlotId, el: &ElementState| ElementFrame {
            key: ElementKey::Digit(id),
            x: el.x,
            width: el.width,
            opacity: el.opacity,
            text: None,
        };
        frames.extend(self.slots.active().iter().map(|s| digit(s.id, &s.element)));
        frames.extend(
            self.slots
                .retiring()
                .iter()
                .map(|r| digit(r.slot.id, &r.slot.element)),
        );
        frames.extend(glyph(ElementKey::Separator, &d.separator));
        frames.extend(glyph(ElementKey::Suffix, &d.suffix));
        frames
    }

    fn wheel_frames(&self) -> Vec<WheelFrame> {
        let frame = |id: SlotId, w: &F::Wheel, retiring: bool| WheelFrame {
            slot: id,
            digit: w.digit(),
            position: w.scroll_position(),
            scrolling: w.is_scrolling(),
            retiring,
        };
        self.slots
            .active()
            .iter()
            .map(|s| frame(s.id, &s.wheel, false))
            .chain(
                self.slots
                    .retiring()
                    .iter()
                    .map(|r| frame(r.slot.id, &r.slot.wheel, true)),
            )
            .collect()
    }
}
