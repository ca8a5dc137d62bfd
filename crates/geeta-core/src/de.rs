use std::sync::OnceLock;

use regex::Regex;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// First run of ASCII digits in `text`, e.g. `"VERSE 16-18"` -> 16.
pub fn leading_number(text: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static regex"));
    digits.find(text).and_then(|m| m.as_str().parse().ok())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

/// Accepts `12`, `"12"` or `"VERSE 12"`.
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => u32::try_from(n).map_err(de::Error::custom),
        NumberOrString::Text(s) => leading_number(&s)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// A list read one entry at a time. Entries that don't parse are dropped
/// with a warning instead of failing the whole document.
pub(crate) fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("skipping list entry {i}: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::leading_number;

    #[test]
    fn picks_first_digit_run() {
        assert_eq!(leading_number("VERSE 12"), Some(12));
        assert_eq!(leading_number("VERSES 16-18"), Some(16));
        assert_eq!(leading_number("7"), Some(7));
        assert_eq!(leading_number("TEXT"), None);
    }
}
