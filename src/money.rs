use itertools::Itertools;

/// Digit group separator used by `ru-RU` number formatting.
pub const GROUP_SEPARATOR: char = '\u{a0}';

pub fn group_thousands(amount: u64) -> String {
    let reversed = amount
        .to_string()
        .chars()
        .rev()
        .chunks(3)
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .join(&GROUP_SEPARATOR.to_string());
    reversed.chars().rev().collect()
}

/// `10000` with suffix `₽` renders as `10 000 ₽`.
pub fn format_amount(amount: u64, currency: &str) -> String {
    if currency.is_empty() {
        group_thousands(amount)
    } else {
        format!("{} {}", group_thousands(amount), currency)
    }
}
