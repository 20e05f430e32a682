//! Decimal-place policy.
//!
//! Excess fractional digits are dropped, not rounded, and short fractions are
//! never zero-padded.

use crate::value::DisplayValue;

/// Output of [`truncate_decimals`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Truncated {
    pub value: DisplayValue,
    /// Effective fractional digit count used by slots, delimiters and layout.
    pub decimal_places: usize,
}

/// Apply `decimal_places` (0 = auto) to a parsed value.
pub fn truncate_decimals(value: &DisplayValue, decimal_places: usize) -> Truncated {
    let parsed = value.fraction_len();
    if decimal_places == 0 || parsed <= decimal_places {
        return Truncated {
            value: value.clone(),
            decimal_places: parsed,
        };
    }
    let keep = value.whole_len() + decimal_places;
    let mut out = value.clone();
    out.digits.truncate(keep);
    Truncated {
        value: out,
        decimal_places,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse_value;

    #[test]
    fn auto_keeps_parsed_fraction() {
        let t = truncate_decimals(&parse_value("1.23456", "."), 0);
        assert_eq!(t.value.digits, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(t.decimal_places, 5);
    }

    #[test]
    fn drops_excess_without_rounding() {
        let t = truncate_decimals(&parse_value("9.999", "."), 2);
        assert_eq!(t.value.digits, vec![9, 9, 9]);
        assert_eq!(t.value.decimal_index, Some(1));
        assert_eq!(t.decimal_places, 2);
    }

    #[test]
    fn never_pads() {
        let t = truncate_decimals(&parse_value("4.5", "."), 3);
        assert_eq!(t.value.digits, vec![4, 5]);
        assert_eq!(t.decimal_places, 1);
        let whole = truncate_decimals(&parse_value("12", "."), 2);
        assert_eq!(whole.decimal_places, 0);
    }

    #[test]
    fn idempotent() {
        for input in ["0.123456", "-98.7", "100", "3.14159"] {
            for dp in 0..4 {
                let once = truncate_decimals(&parse_value(input, "."), dp);
                let twice = truncate_decimals(&once.value, dp);
                assert_eq!(once, twice, "input={input} dp={dp}");
            }
        }
    }
}
