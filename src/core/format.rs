//! Number formatting helpers shared by the aggregator and the renderers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero to `dp` places and pins the scale, so `5.1`
/// rounded to two places displays as `5.10`.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Formats a number the way `pt-BR` locales do: `.` groups thousands, `,`
/// separates decimals, at most three fraction digits with trailing zeros dropped.
pub fn format_pt_br(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(dec("5.1234"), 2).to_string(), "5.12");
        assert_eq!(round_to(dec("5.125"), 2).to_string(), "5.13");
        assert_eq!(round_to(dec("5.1"), 2).to_string(), "5.10");
        assert_eq!(round_to(dec("10"), 2).to_string(), "10.00");
        assert_eq!(round_to(dec("-0.005"), 2).to_string(), "-0.01");
    }

    #[test]
    fn test_round_to_one_place() {
        assert_eq!(round_to(dec("355.2"), 1).to_string(), "355.2");
        assert_eq!(round_to(dec("65.4321"), 1).to_string(), "65.4");
    }

    #[test]
    fn test_format_pt_br() {
        assert_eq!(format_pt_br(dec("128500")), "128.500");
        assert_eq!(format_pt_br(dec("130245.12")), "130.245,12");
        assert_eq!(format_pt_br(dec("999")), "999");
        assert_eq!(format_pt_br(dec("1000")), "1.000");
        assert_eq!(format_pt_br(dec("1234567.8915")), "1.234.567,892");
        assert_eq!(format_pt_br(dec("12.500")), "12,5");
        assert_eq!(format_pt_br(dec("-4321.5")), "-4.321,5");
        assert_eq!(format_pt_br(Decimal::ZERO), "0");
    }
}
