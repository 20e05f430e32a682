//! DisplayValue and the value parser.
//!
//! Parsing never fails: anything that isn't a digit, the configured separator
//! or a leading minus sign is dropped.

use serde::{Deserialize, Serialize};

/// Parsed digits plus sign and decimal-point metadata.
///
/// Invariants: every entry of `digits` is in 0..=9 and
/// `decimal_index <= digits.len()` when present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValue {
    pub digits: Vec<u8>,
    pub negative: bool,
    /// Number of whole digits before the separator, if a separator was seen.
    pub decimal_index: Option<usize>,
}

impl DisplayValue {
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Count of digits left of the separator.
    pub fn whole_len(&self) -> usize {
        self.decimal_index
            .map(|i| i.min(self.digits.len()))
            .unwrap_or(self.digits.len())
    }

    pub fn fraction_len(&self) -> usize {
        self.digits.len() - self.whole_len()
    }

    pub fn whole_digits(&self) -> &[u8] {
        &self.digits[..self.whole_len()]
    }

    pub fn fraction_digits(&self) -> &[u8] {
        &self.digits[self.whole_len()..]
    }

    /// Render back to text: sign, whole digits, separator (if any), fraction.
    pub fn render(&self, separator: &str) -> String {
        let mut out = String::with_capacity(self.digits.len() + separator.len() + 1);
        if self.negative {
            out.push('-');
        }
        for (i, d) in self.digits.iter().enumerate() {
            if self.decimal_index == Some(i) {
                out.push_str(separator);
            }
            out.push(char::from(b'0' + d));
        }
        if self.decimal_index == Some(self.digits.len()) {
            out.push_str(separator);
        }
        out
    }
}

#[inline]
fn is_minus(c: char) -> bool {
    c == '-' || c == '\u{2212}'
}

/// Parse `input` into a [`DisplayValue`].
///
/// Only the last occurrence of `separator` marks the decimal point; a minus
/// sign counts only when it appears before the first digit.
pub fn parse_value(input: &str, separator: &str) -> DisplayValue {
    let sep_at = if separator.is_empty() {
        None
    } else {
        input.rfind(separator)
    };

    let mut value = DisplayValue::default();
    let mut iter = input.char_indices().peekable();
    while let Some((pos, c)) = iter.next() {
        if Some(pos) == sep_at {
            value.decimal_index = Some(value.digits.len());
            // Skip the remaining chars of a multi-char separator.
            let end = pos + separator.len();
            while matches!(iter.peek(), Some((p, _)) if *p < end) {
                iter.next();
            }
            continue;
        }
        if let Some(d) = c.to_digit(10) {
            value.digits.push(d as u8);
        } else if is_minus(c) && value.digits.is_empty() && value.decimal_index.is_none() {
            value.negative = true;
        }
    }
    value
}

/// Format a float to the fixed-precision text the parser expects.
///
/// `decimal_places == 0` uses the shortest representation that round-trips;
/// otherwise exactly that many fractional digits. Non-finite input becomes "0".
pub fn format_number(value: f64, decimal_places: usize, separator: &str) -> String {
    if !value.is_finite() {
        log::warn!("non-finite value {value} rendered as 0");
        return "0".to_string();
    }
    // Normalise -0.0 so it doesn't show a sign.
    let value = if value == 0.0 { 0.0 } else { value };
    let text = if decimal_places == 0 {
        format!("{value}")
    } else {
        format!("{value:.decimal_places$}")
    };
    if separator == "." {
        text
    } else {
        text.replace('.', separator)
    }
}
