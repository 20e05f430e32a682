//! Counter configuration.
//!
//! Every field has a default so hosts can send partial JSON objects.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationCurve;
use crate::error::TickerError;

/// Configuration for value formatting, grouping and animation timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Decimal separator recognised by the parser and drawn between whole and fractional digits.
    pub separator: String,
    /// Glyph text shown for negative values.
    pub sign: String,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Group delimiter text (e.g. ","). `None` or empty disables grouping.
    pub delimiter: Option<String>,
    /// Digits per delimiter group; 0 disables grouping.
    pub group_size: usize,
    /// 0 = auto (keep parsed fractional digits), otherwise the maximum kept.
    pub decimal_places: usize,
    /// Seconds a wheel takes to scroll between digits.
    pub scroll_duration: f32,
    /// Seconds a layout batch takes to slide/fade elements.
    pub slide_duration: f32,
    pub curve: AnimationCurve,
    pub gradient: GradientConfig,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            sign: "-".to_string(),
            prefix: None,
            suffix: None,
            delimiter: None,
            group_size: 0,
            decimal_places: 0,
            scroll_duration: 0.6,
            slide_duration: 0.3,
            curve: AnimationCurve::default(),
            gradient: GradientConfig::default(),
        }
    }
}

impl TickerConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, TickerError> {
        let cfg: TickerConfig =
            serde_json::from_str(json).map_err(|e| TickerError::ConfigJson(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), TickerError> {
        if self.separator.is_empty() {
            return Err(TickerError::EmptySeparator);
        }
        for (field, value) in [
            ("scroll_duration", self.scroll_duration),
            ("slide_duration", self.slide_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TickerError::InvalidDuration { field, value });
            }
        }
        Ok(())
    }

    /// Delimiter text and group size when grouping is enabled.
    pub fn grouping(&self) -> Option<(&str, usize)> {
        match self.delimiter.as_deref() {
            Some(d) if !d.is_empty() && self.group_size > 0 => Some((d, self.group_size)),
            _ => None,
        }
    }

    pub(crate) fn prefix_text(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    pub(crate) fn suffix_text(&self) -> &str {
        self.suffix.as_deref().unwrap_or("")
    }
}

/// Gradient fade stops as a fraction of the counter's extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub horizontal_stop: Option<f32>,
    pub vertical_stop: Option<f32>,
}

/// Stops that passed validation; `None` means that mask is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientStops {
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
}

impl GradientConfig {
    /// A stop must lie in (0, 0.5): each edge fades over at most half the extent.
    pub fn effective(&self) -> GradientStops {
        GradientStops {
            horizontal: valid_stop("horizontal", self.horizontal_stop),
            vertical: valid_stop("vertical", self.vertical_stop),
        }
    }
}

fn valid_stop(axis: &str, stop: Option<f32>) -> Option<f32> {
    let s = stop?;
    if s.is_finite() && s > 0.0 && s < 0.5 {
        Some(s)
    } else {
        log::warn!("{axis} gradient stop {s} outside (0, 0.5); gradient disabled");
        None
    }
}
