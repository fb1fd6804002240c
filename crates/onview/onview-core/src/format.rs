//! Number display styles for counters.
//!
//! Output follows en-US conventions: `,` groups thousands, `.` separates
//! decimals, compact notation uses `K`/`M`/`B`/`T`. Rounding is half away
//! from zero.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    /// `1,234.50`
    #[default]
    #[serde(rename = "comma")]
    Grouped,
    /// `1.23K`
    #[serde(rename = "compact")]
    Compact,
    /// `1234.50`
    #[serde(rename = "none")]
    Plain,
}

const COMPACT_UNITS: [(f64, &str); 4] = [(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

impl NumberFormat {
    /// Resolve a `data-count-format` value. Unknown names group thousands.
    pub fn from_name(name: Option<&str>, fallback: NumberFormat) -> NumberFormat {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return fallback;
        };
        match name.to_ascii_lowercase().as_str() {
            "none" => NumberFormat::Plain,
            "compact" => NumberFormat::Compact,
            _ => NumberFormat::Grouped,
        }
    }

    /// Render `value` with exactly `decimals` fraction digits.
    pub fn format(self, value: f64, decimals: u32) -> String {
        match self {
            NumberFormat::Plain => fixed(value, decimals),
            NumberFormat::Grouped => group_thousands(&fixed(value, decimals)),
            NumberFormat::Compact => compact(value, decimals),
        }
    }
}

/// Fixed-point rendering with half-away-from-zero rounding and no `-0`.
fn fixed(value: f64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let mut rounded = (value * factor).round() / factor;
    if !rounded.is_finite() {
        rounded = value;
    }
    if rounded == 0.0 {
        rounded = 0.0;
    }
    format!("{:.*}", decimals as usize, rounded)
}

fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn compact(value: f64, decimals: u32) -> String {
    let magnitude = value.abs();
    let mut unit = COMPACT_UNITS
        .iter()
        .rposition(|(scale, _)| magnitude >= *scale);

    // Rounding can carry into the next unit (999_999 -> "1000K" -> "1M").
    loop {
        let (scale, suffix) = match unit {
            Some(i) => COMPACT_UNITS[i],
            None => (1.0, ""),
        };
        let text = fixed(value / scale, decimals);
        let carried = text
            .trim_start_matches('-')
            .split('.')
            .next()
            .map(|i| i.len() > 3)
            .unwrap_or(false);
        let next = unit.map_or(0, |i| i + 1);
        if carried && next < COMPACT_UNITS.len() {
            unit = Some(next);
            continue;
        }
        return format!("{}{}", group_thousands(&text), suffix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_inserts_separators() {
        let f = NumberFormat::Grouped;
        assert_eq!(f.format(1234.5, 2), "1,234.50");
        assert_eq!(f.format(1234567.0, 0), "1,234,567");
        assert_eq!(f.format(999.0, 0), "999");
        assert_eq!(f.format(-1234.0, 1), "-1,234.0");
        assert_eq!(f.format(-0.0, 0), "0");
        assert_eq!(f.format(2.5, 0), "3");
    }

    #[test]
    fn plain_is_fixed_point() {
        assert_eq!(NumberFormat::Plain.format(1234.5, 2), "1234.50");
        assert_eq!(NumberFormat::Plain.format(0.125, 2), "0.13");
    }

    #[test]
    fn compact_units() {
        let f = NumberFormat::Compact;
        assert_eq!(f.format(950.0, 0), "950");
        assert_eq!(f.format(1234.0, 0), "1K");
        assert_eq!(f.format(1234.0, 2), "1.23K");
        assert_eq!(f.format(2_500_000.0, 1), "2.5M");
        assert_eq!(f.format(999_999.0, 0), "1M");
        assert_eq!(f.format(999.6, 0), "1K");
        assert_eq!(f.format(-4_200_000_000.0, 1), "-4.2B");
        assert_eq!(f.format(3e15, 0), "3,000T");
    }

    #[test]
    fn names() {
        let d = NumberFormat::Grouped;
        assert_eq!(NumberFormat::from_name(Some("NONE"), d), NumberFormat::Plain);
        assert_eq!(NumberFormat::from_name(Some("compact"), d), NumberFormat::Compact);
        assert_eq!(NumberFormat::from_name(Some("fancy"), NumberFormat::Plain), d);
        assert_eq!(NumberFormat::from_name(None, NumberFormat::Plain), NumberFormat::Plain);
    }
}
