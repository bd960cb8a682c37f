use crate::common::{
    error::{LedgerError, LedgerResult},
    money::Money,
};

pub const DEFAULT_MAX_LENGTH: usize = 50;
pub const DEFAULT_ELLIPSIS: &str = "...";

/// Width limits applied to transaction and line comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionLimits {
    pub max_length: usize,
    pub ellipsis: String,
}

impl Default for DescriptionLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

/// Accounting amounts carry their side separately, so the magnitude is
/// always stored unsigned.
///
/// # Errors
///
/// `InvalidInput` for the one raw value with no positive counterpart
/// (`i64::MIN` ten-thousandths).
pub fn normalize_amount(value: Money) -> LedgerResult<Money> {
    value
        .checked_abs()
        .ok_or_else(|| LedgerError::InvalidInput(format!("amount {} has no magnitude", value.as_i64())))
}

/// Truncates `text` to whole words that fit in `max_length` characters and
/// appends `ellipsis`.
///
/// Text that already fits is returned unchanged. When even the first word is
/// too long the result is just the ellipsis. The result never exceeds
/// `max_length` plus the length of `ellipsis`.
///
/// # Examples
/// ```
/// use double_entry::common::formatter::normalize_description;
///
/// assert_eq!(normalize_description("short", 50, "..."), "short");
/// assert_eq!(normalize_description("purchase of stock", 11, "..."), "purchase of...");
/// ```
pub fn normalize_description(text: &str, max_length: usize, ellipsis: &str) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    // Each accepted word is prefixed with one space; the leading one is
    // trimmed at the end, so the word budget is `max_length`.
    let mut output = String::new();
    let mut output_len = 0;
    for word in text.split(char::is_whitespace) {
        let word_len = word.chars().count();
        if output_len + word_len > max_length {
            break;
        }
        output.push(' ');
        output.push_str(word);
        output_len += word_len + 1;
    }
    output.push_str(ellipsis);

    output.trim().to_string()
}

pub fn normalize_description_with(text: &str, limits: &DescriptionLimits) -> String {
    normalize_description(text, limits.max_length, &limits.ellipsis)
}
