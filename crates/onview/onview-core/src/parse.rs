//! Lenient parsers for human-authored attribute values.
//!
//! Nothing in here fails: malformed input resolves to the caller's fallback.

/// Read the longest numeric prefix of `s` (after leading whitespace).
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent, so `"150px"` reads as `150` and `"abc"` reads as nothing.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Read a base-10 integer prefix (`"1600ms"` → 1600, `"1.9"` → 1).
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Parse a time value such as `"150"`, `"150ms"` or `"0.2s"` into milliseconds.
///
/// Absent, empty, non-numeric and non-finite input yields `fallback`.
pub fn parse_time_ms(input: Option<&str>, fallback: f64) -> f64 {
    let raw = match input {
        Some(raw) if !raw.is_empty() => raw,
        _ => return fallback,
    };
    let s = raw.trim().to_ascii_lowercase();

    let (number, scale) = if let Some(head) = s.strip_suffix("ms") {
        (head, 1.0)
    } else if let Some(head) = s.strip_suffix('s') {
        (head, 1000.0)
    } else {
        (s.as_str(), 1.0)
    };

    match parse_float_prefix(number) {
        Some(v) if v.is_finite() => v * scale,
        _ => fallback,
    }
}

/// Resolve a visibility threshold, clamped to `[0, 1]`.
///
/// Missing, blank or non-numeric input yields `default`.
pub fn clamp_threshold(input: Option<&str>, default: f64) -> f64 {
    let trimmed = match input.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return default,
    };
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n.clamp(0.0, 1.0),
        _ => default,
    }
}

/// Number of digits after the first decimal point (`"1234.50"` → 2).
pub fn decimal_places(raw: &str) -> u32 {
    match raw.split_once('.') {
        Some((_, right)) => right.chars().filter(char::is_ascii_digit).count() as u32,
        None => 0,
    }
}

/// Find the first number in free text, tolerating thousands separators.
///
/// Matches the first run of `-?[0-9,]+(\.[0-9]+)?` and strips the commas, so
/// `"$1,234.5k"` reads as `1234.5`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let is_body = |b: u8| b.is_ascii_digit() || b == b',';

    let start = bytes.iter().position(|&b| is_body(b))?;
    let negative = start > 0 && bytes[start - 1] == b'-';
    let mut end = start;
    while end < bytes.len() && is_body(bytes[end]) {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let mut cleaned: String = text[start..end].chars().filter(|c| *c != ',').collect();
    if negative {
        cleaned.insert(0, '-');
    }
    // A run of bare commas has no digits left.
    parse_float_prefix(&cleaned).filter(|v| v.is_finite())
}
