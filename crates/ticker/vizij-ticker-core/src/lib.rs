//! Vizij Ticker Core (engine-agnostic)
//!
//! Value-to-layout engine for a rolling digit counter: a numeric string is
//! parsed into digits, truncated to the configured decimal places, diffed
//! against the digit slots already on screen, grouped with delimiters and laid
//! out left to right. All resulting moves and fades are submitted as one
//! cancelable animation batch that the host advances with `Counter::update(dt)`.
//!
//! Pixels, fonts and the digit wheel widget itself belong to the host; they
//! come in through the [`GlyphMetrics`] and [`DigitWheel`]/[`WheelFactory`]
//! traits.

pub mod animation;
pub mod config;
pub mod counter;
pub mod delimiters;
pub mod error;
pub mod ids;
pub mod layout;
pub mod outputs;
pub mod slots;
pub mod truncate;
pub mod value;
pub mod wheel;

// Re-exports for consumers (adapters)
pub use animation::{AnimationBatch, AnimationCurve, Completion, Transition};
pub use config::{GradientConfig, GradientStops, TickerConfig};
pub use counter::{Counter, CounterState};
pub use delimiters::{plan_delimiters, DelimiterPool};
pub use error::TickerError;
pub use ids::{BatchId, SlotId};
pub use layout::{ElementKey, ElementState, GlyphMetrics, Layout, MonospaceMetrics, Placement, Size};
pub use outputs::{ElementFrame, TickerEvent, TickerOutputs, WheelFrame};
pub use slots::{plan_slots, SlotArena, SlotDiff, SlotTarget};
pub use truncate::{truncate_decimals, Truncated};
pub use value::{format_number, parse_value, DisplayValue};
pub use wheel::{DigitWheel, RollingWheel, RollingWheelFactory, WheelFactory, WheelStyle};

/// Counter wired to the reference wheel model.
pub type RollingCounter<M = MonospaceMetrics> = Counter<RollingWheelFactory, M>;
