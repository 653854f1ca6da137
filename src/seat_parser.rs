use once_cell::sync::Lazy;
use regex::Regex;

static SEATS_AVAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"seats_avail[^>]*>(\d+)<").expect("seats_avail pattern is valid")
});

static DECIMAL_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d$").expect("digit pattern is valid")
});

/// Pulls the open seat count out of the `seats` HTML fragment, e.g.
/// `<span class="seats_avail_ANTH1140">3</span>` gives `Some(3)`.
///
/// Returns `None` only when the marker is missing. `\d` is Unicode-aware, so
/// any decimal digits count; a run too large for a `u32` saturates.
pub fn parse_seats_avail(seats_html: &str) -> Option<u32> {
    let digits = SEATS_AVAIL_REGEX.captures(seats_html)?.get(1)?;
    let count = digits.as_str()
        .chars()
        .map(decimal_value)
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(d as u64));
    Some(u32::try_from(count).unwrap_or(u32::MAX))
}

// Unicode lays out every set of decimal digits as ten contiguous code points
// starting at zero, so a digit's value is its distance from the start of its run.
fn decimal_value(c: char) -> u32 {
    if let Some(d) = c.to_digit(10) {
        return d;
    }
    let mut zero = c as u32;
    let mut buf = [0u8; 4];
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !DECIMAL_DIGIT_REGEX.is_match(prev.encode_utf8(&mut buf)) {
            break;
        }
        zero -= 1;
    }
    (c as u32 - zero) % 10
}
