//! Cross-field min <= max validation

use super::fields::RangePair;
use crate::form::FormState;

/// True when both ends are filled and min > max. Open-ended or unparsable
/// ranges never count as errors.
pub fn pair_has_error(form: &FormState, pair: &RangePair) -> bool {
    let min = form.value(pair.min_key);
    let max = form.value(pair.max_key);
    if min.is_empty() || max.is_empty() {
        return false;
    }
    match (min.as_f64(), max.as_f64()) {
        (Some(min), Some(max)) => min > max,
        _ => false,
    }
}

/// First pair with min > max, if any.
pub fn first_violation<'a>(form: &FormState, pairs: &'a [RangePair]) -> Option<&'a RangePair> {
    pairs.iter().find(|pair| pair_has_error(form, pair))
}

pub fn is_valid(form: &FormState, pairs: &[RangePair]) -> bool {
    match first_violation(form, pairs) {
        Some(pair) => {
            tracing::debug!("Range {} > {} rejected", pair.min_key, pair.max_key);
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::fields::RANGE_PAIRS;

    const LOT: RangePair = RangePair {
        min_key: "min_lot_area",
        max_key: "max_lot_area",
    };

    fn form(pairs: &[(&str, &str)]) -> FormState {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_min_greater_than_max_fails() {
        let f = form(&[("min_lot_area", "500"), ("max_lot_area", "300")]);
        assert!(pair_has_error(&f, &LOT));
        assert!(!is_valid(&f, &[LOT]));
    }

    #[test]
    fn test_min_less_or_equal_passes() {
        assert!(is_valid(&form(&[("min_lot_area", "500"), ("max_lot_area", "5000")]), &[LOT]));
        assert!(is_valid(&form(&[("min_lot_area", "500"), ("max_lot_area", "500")]), &[LOT]));
    }

    #[test]
    fn test_open_ended_ranges_pass() {
        assert!(is_valid(&form(&[("min_lot_area", "500"), ("max_lot_area", "")]), &[LOT]));
        assert!(is_valid(&form(&[("max_lot_area", "300")]), &[LOT]));
        assert!(is_valid(&FormState::new(), RANGE_PAIRS));
    }

    #[test]
    fn test_compares_numerically_not_lexically() {
        let f = form(&[("min_lot_area", "9"), ("max_lot_area", "10")]);
        assert!(is_valid(&f, &[LOT]));
    }

    #[test]
    fn test_unparsable_values_do_not_fail() {
        let f = form(&[("min_lot_area", "lots"), ("max_lot_area", "300")]);
        assert!(is_valid(&f, &[LOT]));
    }

    #[test]
    fn test_first_violation_reports_pair() {
        let f = form(&[
            ("min_year_built", "2010"),
            ("max_year_built", "1990"),
            ("totalSF_min_bsmt", "900"),
            ("totalSF_max_bsmt", "100"),
        ]);
        let violation = first_violation(&f, RANGE_PAIRS).unwrap();
        assert_eq!(violation.min_key, "min_year_built");
    }
}
