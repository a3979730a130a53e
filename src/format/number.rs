//! en-us number formatting
//!
//! Mirrors `Intl.NumberFormat("en-us", options)` for the subset of options the
//! type configuration uses: decimal and percent styles, fraction-digit bounds
//! and thousands grouping.
//!
//! Rounding works on the shortest decimal representation of the value and
//! resolves ties away from zero, as ICU does.

use super::options::{FormatOptions, NumberStyle};

/// Fraction digits used by the decimal style when none are configured.
const DEFAULT_MAX_FRACTION_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    percent: bool,
    min_fraction: usize,
    max_fraction: usize,
    grouping: bool,
}

impl NumberFormat {
    pub fn new(options: &FormatOptions) -> Self {
        let percent = options.style == Some(NumberStyle::Percent);
        let min_fraction = options.minimum_fraction_digits.map_or(0, usize::from);
        let default_max = if percent { 0 } else { DEFAULT_MAX_FRACTION_DIGITS };
        let max_fraction = options
            .maximum_fraction_digits
            .map_or(default_max.max(min_fraction), usize::from)
            .max(min_fraction);

        Self {
            percent,
            min_fraction,
            max_fraction,
            grouping: options.use_grouping.unwrap_or(true),
        }
    }

    pub fn format(&self, value: f64) -> String {
        let suffix = if self.percent { "%" } else { "" };

        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{sign}∞{suffix}");
        }

        let shift = if self.percent { 2 } else { 0 };
        let (int_part, frac_part) = round_half_expand(value.abs(), shift, self.max_fraction);

        let int_part = if self.grouping {
            group_thousands(&int_part)
        } else {
            int_part
        };
        let frac_part = trim_fraction(&frac_part, self.min_fraction);

        let mut out = String::with_capacity(int_part.len() + frac_part.len() + 2);
        if value < 0.0 {
            out.push('-');
        }
        out.push_str(&int_part);
        if !frac_part.is_empty() {
            out.push('.');
            out.push_str(frac_part);
        }
        out.push_str(suffix);
        out
    }
}

/// Round a non-negative value to `prec` fraction digits, ties away from zero.
///
/// `shift` moves the decimal point right before rounding (percent scaling),
/// so `0.285` at shift 2 is exactly `28.5`. Returns the integer and fraction
/// digits, the latter exactly `prec` long.
fn round_half_expand(value: f64, shift: usize, prec: usize) -> (String, String) {
    // `Display` for f64 prints the shortest round-trip digits without an exponent.
    let text = value.to_string();
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let moved = shift.min(frac.len());
    let (into_int, frac) = frac.split_at(moved);
    let mut digits: Vec<u8> = int.bytes().chain(into_int.bytes()).collect();
    digits.extend(std::iter::repeat(b'0').take(shift - moved));
    let mut int_len = digits.len();

    let kept = prec.min(frac.len());
    let (head, tail) = frac.split_at(kept);
    digits.extend(head.bytes());
    digits.extend(std::iter::repeat(b'0').take(prec - kept));

    if tail.bytes().next().is_some_and(|d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            int_len += 1;
        }
    }

    let (int, frac) = digits.split_at(int_len);
    let int = String::from_utf8_lossy(int);
    let int = match int.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    };
    (int, String::from_utf8_lossy(frac).into_owned())
}

/// Drop trailing zeros, keeping at least `min` digits.
fn trim_fraction(frac: &str, min: usize) -> &str {
    let significant = frac.trim_end_matches('0').len();
    let keep = significant.max(min).min(frac.len());
    frac.get(..keep).unwrap_or(frac)
}

/// Insert `,` every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut with_sep = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_sep.push(',');
        }
        with_sep.push(c);
    }
    with_sep.chars().rev().collect()
}
