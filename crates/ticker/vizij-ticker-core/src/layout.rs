//! Element geometry: keys, per-element state, glyph measurement and the
//! left-to-right sequencer.
//!
//! Order is fixed: prefix, sign, whole digits interleaved with delimiters
//! (most significant first), separator, fractional digits, suffix.

use serde::{Deserialize, Serialize};

use crate::ids::SlotId;

/// Identity of one positioned element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ElementKey {
    Prefix,
    Sign,
    /// Index into the delimiter pool, not a stable identity.
    Delimiter(u32),
    Digit(SlotId),
    Separator,
    Suffix,
}

/// Width/height in host units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Current horizontal origin, width and opacity of an element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementState {
    pub x: f32,
    pub width: f32,
    pub opacity: f32,
    /// False until the element has been given its first position. Unplaced
    /// elements materialize at their target instead of sliding in.
    pub placed: bool,
}

impl ElementState {
    pub fn fresh() -> Self {
        Self {
            x: 0.0,
            width: 0.0,
            opacity: 0.0,
            placed: false,
        }
    }
}

impl Default for ElementState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Measures glyph content. Supplied by the host (fonts are its business).
pub trait GlyphMetrics {
    /// Size of a run of text (prefix, suffix, sign, separator, delimiter).
    fn text_size(&self, text: &str) -> Size;
    /// Size of one digit wheel cell.
    fn digit_size(&self) -> Size;
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn text_size(&self, text: &str) -> Size {
        (**self).text_size(text)
    }
    fn digit_size(&self) -> Size {
        (**self).digit_size()
    }
}

/// Fixed-advance metrics: every char is `advance` wide.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 10.0,
            line_height: 20.0,
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn text_size(&self, text: &str) -> Size {
        Size::new(text.chars().count() as f32 * self.advance, self.line_height)
    }

    fn digit_size(&self) -> Size {
        Size::new(self.advance, self.line_height)
    }
}

/// One element in display order with its measured size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEntry {
    pub key: ElementKey,
    pub size: Size,
}

/// Computed target for one element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub key: ElementKey,
    pub x: f32,
    pub width: f32,
}

/// Placements plus the content extent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub size: Size,
}

impl Layout {
    pub fn get(&self, key: ElementKey) -> Option<&Placement> {
        self.placements.iter().find(|p| p.key == key)
    }
}

/// Inputs for [`build_entries`]; slots are already ordered most significant first.
#[derive(Clone, Debug)]
pub struct LayoutPlan<'a> {
    pub prefix: Option<&'a str>,
    pub sign: Option<&'a str>,
    pub slots: &'a [SlotId],
    pub whole_len: usize,
    pub delimiter: Option<&'a str>,
    pub delimiter_positions: &'a [usize],
    pub separator: Option<&'a str>,
    pub suffix: Option<&'a str>,
}

/// Expand a plan into display-ordered, measured entries.
pub fn build_entries<M: GlyphMetrics>(plan: &LayoutPlan<'_>, metrics: &M) -> Vec<LayoutEntry> {
    let mut entries =
        Vec::with_capacity(plan.slots.len() + plan.delimiter_positions.len() + 4);
    if let Some(p) = plan.prefix.filter(|p| !p.is_empty()) {
        entries.push(LayoutEntry {
            key: ElementKey::Prefix,
            size: metrics.text_size(p),
        });
    }
    if let Some(s) = plan.sign {
        entries.push(LayoutEntry {
            key: ElementKey::Sign,
            size: metrics.text_size(s),
        });
    }
    let digit = metrics.digit_size();
    let whole_len = plan.whole_len.min(plan.slots.len());
    let delimiter_size = plan.delimiter.map(|d| metrics.text_size(d));
    let mut next_delim = 0usize;
    for (i, slot) in plan.slots[..whole_len].iter().enumerate() {
        if let Some(size) = delimiter_size {
            if plan.delimiter_positions.get(next_delim) == Some(&i) {
                entries.push(LayoutEntry {
                    key: ElementKey::Delimiter(next_delim as u32),
                    size,
                });
                next_delim += 1;
            }
        }
        entries.push(LayoutEntry {
            key: ElementKey::Digit(*slot),
            size: digit,
        });
    }
    if let Some(sep) = plan.separator {
        entries.push(LayoutEntry {
            key: ElementKey::Separator,
            size: metrics.text_size(sep),
        });
    }
    for slot in &plan.slots[whole_len..] {
        entries.push(LayoutEntry {
            key: ElementKey::Digit(*slot),
            size: digit,
        });
    }
    if let Some(s) = plan.suffix.filter(|s| !s.is_empty()) {
        entries.push(LayoutEntry {
            key: ElementKey::Suffix,
            size: metrics.text_size(s),
        });
    }
    entries
}

/// Accumulate x strictly left to right with no gaps.
pub fn sequence(entries: &[LayoutEntry]) -> Layout {
    let mut x = 0.0f32;
    let mut height = 0.0f32;
    let mut placements = Vec::with_capacity(entries.len());
    for e in entries {
        placements.push(Placement {
            key: e.key,
            x,
            width: e.size.width,
        });
        x += e.size.width;
        height = height.max(e.size.height);
    }
    Layout {
        placements,
        size: Size::new(x, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(n: u32) -> Vec<SlotId> {
        (0..n).map(SlotId).collect()
    }

    #[test]
    fn interleaves_delimiters_and_separator() {
        let ids = slots(5);
        let plan = LayoutPlan {
            prefix: Some("$"),
            sign: Some("-"),
            slots: &ids,
            whole_len: 4,
            delimiter: Some(","),
            delimiter_positions: &[1],
            separator: Some("."),
            suffix: Some("k"),
        };
        let entries = build_entries(&plan, &MonospaceMetrics::default());
        let keys: Vec<ElementKey> = entries.iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![
                ElementKey::Prefix,
                ElementKey::Sign,
                ElementKey::Digit(SlotId(0)),
                ElementKey::Delimiter(0),
                ElementKey::Digit(SlotId(1)),
                ElementKey::Digit(SlotId(2)),
                ElementKey::Digit(SlotId(3)),
                ElementKey::Separator,
                ElementKey::Digit(SlotId(4)),
                ElementKey::Suffix,
            ]
        );
        let layout = sequence(&entries);
        assert_eq!(layout.size, Size::new(100.0, 20.0));
        assert_eq!(layout.get(ElementKey::Suffix).unwrap().x, 90.0);
    }

    #[test]
    fn empty_decorations_are_skipped() {
        let ids = slots(1);
        let plan = LayoutPlan {
            prefix: Some(""),
            sign: None,
            slots: &ids,
            whole_len: 1,
            delimiter: None,
            delimiter_positions: &[],
            separator: None,
            suffix: None,
        };
        let layout = sequence(&build_entries(&plan, &MonospaceMetrics::default()));
        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.placements[0].x, 0.0);
    }

    #[test]
    fn element_key_json_shape() {
        let j = serde_json::to_value(ElementKey::Digit(SlotId(3))).unwrap();
        assert_eq!(j, serde_json::json!({ "kind": "digit", "id": 3 }));
        let p = serde_json::to_value(ElementKey::Prefix).unwrap();
        assert_eq!(p, serde_json::json!({ "kind": "prefix" }));
    }
}
