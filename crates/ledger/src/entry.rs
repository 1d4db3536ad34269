//! Parsing of the "amount description" entry text.

/// Splits entry text on the first whitespace run into the amount token
/// and the remaining description. The description defaults to "".
/// Returns `None` for blank input.
pub fn split_entry(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((amount, rest)) => Some((amount, rest.trim_start())),
        None => Some((trimmed, "")),
    }
}

/// Normalizes a comma decimal separator to a period ("25,50" → "25.50").
/// No numeric validation happens here; the amount is stored as typed.
pub fn normalize_amount(token: &str) -> String {
    token.replace(',', ".")
}
