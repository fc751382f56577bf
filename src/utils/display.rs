/// Shown in place of the minute count while a field is invalid.
pub const ERROR_LABEL: &str = "Error";
/// Shown in place of the "End at" result while it cannot be computed.
pub const EMPTY_LABEL: &str = "—";
pub const END_AT_PREFIX: &str = "End at:";

/// Group digits in thousands: `1439` -> `1,439`.
pub fn format_minutes(minutes: u32) -> String {
    let digits = minutes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn end_at_line(formatted: Option<&str>) -> String {
    format!("{} {}", END_AT_PREFIX, formatted.unwrap_or(EMPTY_LABEL))
}
