//! Per-frame output contract.
//!
//! Outputs carry every attached element's current geometry plus wheel scroll
//! state, and a separate list of lifecycle events. Adapters (WASM, native
//! views) apply the frames to their widgets and forward events.

use serde::{Deserialize, Serialize};

use crate::config::GradientStops;
use crate::ids::{BatchId, SlotId};
use crate::layout::{ElementKey, Size};

/// Geometry and text of one attached element this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementFrame {
    pub key: ElementKey,
    pub x: f32,
    pub width: f32,
    pub opacity: f32,
    /// Glyph text for decorations and delimiters; digits carry `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Scroll state of one digit wheel this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WheelFrame {
    pub slot: SlotId,
    pub digit: u8,
    pub position: f32,
    pub scrolling: bool,
    pub retiring: bool,
}

/// Discrete lifecycle signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TickerEvent {
    BatchStarted { batch: BatchId, duration: f32 },
    BatchCompleted { batch: BatchId },
    BatchSuperseded { batch: BatchId },
    BatchStopped { batch: BatchId },
    SlotDetached { slot: SlotId },
    DelimiterDetached { index: u32 },
    SignDetached,
    LayoutReset,
}

/// Outputs returned by `Counter::update()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerOutputs {
    #[serde(default)]
    pub elements: Vec<ElementFrame>,
    #[serde(default)]
    pub wheels: Vec<WheelFrame>,
    #[serde(default)]
    pub events: Vec<TickerEvent>,
    pub size: Size,
    pub gradient: GradientStops,
}

impl TickerOutputs {
    #[inline]
    pub fn clear(&mut self) {
        self.elements.clear();
        self.wheels.clear();
        self.events.clear();
    }

    pub fn element(&self, key: ElementKey) -> Option<&ElementFrame> {
        self.elements.iter().find(|e| e.key == key)
    }
}
