use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER_IN_SET: Regex = Regex::new(r"\b(\d{1,4}/\d{1,4})\b").unwrap();
    static ref HASH_NUMBER: Regex = Regex::new(r"#(\d{1,4})\b").unwrap();
}

/// Finds a printed card number such as `045/102` inside arbitrary text.
/// A `#25` style number is accepted when no `x/y` form is present and is
/// returned as its digits only.
pub fn find_card_number(text: &str) -> Option<String> {
    NUMBER_IN_SET
        .captures(text)
        .or_else(|| HASH_NUMBER.captures(text))
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_with_set_total() {
        assert_eq!(
            find_card_number("Set: 045/102 Foil"),
            Some("045/102".to_string())
        );
        assert_eq!(find_card_number("58/102"), Some("58/102".to_string()));
    }

    #[test]
    fn test_hash_number() {
        assert_eq!(find_card_number("Promo #25"), Some("25".to_string()));
    }

    #[test]
    fn test_slash_form_wins_over_hash() {
        assert_eq!(
            find_card_number("#7 reprinted as 007/198"),
            Some("007/198".to_string())
        );
    }

    #[test]
    fn test_no_number() {
        assert_eq!(find_card_number("Random text"), None);
        assert_eq!(find_card_number(""), None);
    }
}
