//! Keystroke-time formatting of a time field.

use super::parser::{clean, smart_parse, split_period};
use serde::Serialize;

/// Field content and caret offset (in characters) after a keystroke.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldEdit {
    pub text: String,
    pub caret: usize,
}

/// Reformat `text` after a keystroke.
///
/// Once the input has a digit and either a period marker or three
/// characters, it is replaced by the full parse and the caret is clamped to
/// the new length. Before that only a colon after two bare digits and a
/// space before a trailing marker are inserted, so the caret does not jump
/// while the hour is still being typed.
pub fn auto_format(text: &str, caret: usize) -> FieldEdit {
    let value = clean(text);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let (_, period) = split_period(&value);

    if has_digit && (period.is_some() || value.chars().count() >= 3) {
        if let Some(formatted) = smart_parse(&value) {
            let caret = caret.min(formatted.chars().count());
            return FieldEdit {
                text: formatted,
                caret,
            };
        }
    }

    let mut value = value;
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_digit()) {
        value.push(':');
    }

    if value.chars().count() > 4 && !value.contains(' ') {
        let (body, period) = split_period(&value);
        if period.is_some() {
            let body_len = body.len();
            value.insert(body_len, ' ');
        }
    }

    let caret = value.chars().count();
    FieldEdit { text: value, caret }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digits_get_colon() {
        assert_eq!(
            auto_format("10", 2),
            FieldEdit {
                text: "10:".to_string(),
                caret: 3
            }
        );
    }

    #[test]
    fn test_single_digit_left_alone() {
        assert_eq!(auto_format("9", 1).text, "9");
    }

    #[test]
    fn test_three_chars_trigger_full_parse() {
        let edit = auto_format("930", 3);
        assert_eq!(edit.text, "09:30 AM");
        assert_eq!(edit.caret, 3);
    }

    #[test]
    fn test_marker_triggers_full_parse() {
        let edit = auto_format("7p", 2);
        assert_eq!(edit.text, "07:00 PM");
        assert_eq!(edit.caret, 2);
    }

    #[test]
    fn test_caret_clamped_to_new_length() {
        let edit = auto_format("10:15 pm!!", 40);
        assert_eq!(edit.text, "10:15 PM");
        assert_eq!(edit.caret, 8);
    }

    #[test]
    fn test_space_inserted_before_trailing_marker() {
        assert_eq!(
            auto_format("MMMAM", 5),
            FieldEdit {
                text: "MMM AM".to_string(),
                caret: 6
            }
        );
        assert_eq!(auto_format("MAM", 3).text, "MAM");
        assert_eq!(auto_format("MM AM", 5).text, "MM AM");
    }

    #[test]
    fn test_no_digits_only_cleans() {
        assert_eq!(auto_format("am", 2).text, "AM");
        assert_eq!(auto_format("", 0).text, "");
    }
}
