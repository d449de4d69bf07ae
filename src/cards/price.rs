use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FIRST_AMOUNT: Regex = Regex::new(r"\d+\.?\d*").unwrap();
    static ref FROM_PRICE: Regex = Regex::new(r"(?i)from\s*€?\s*(\d+[.,]\d+)").unwrap();
}

/// Turns a Cardmarket price fragment such as `"12,34 €"` into `12.34`.
///
/// Currency signs and (non-breaking) spaces are dropped and the decimal comma
/// becomes a period before the first number is read. Prices with a thousands
/// dot (`1.234,56`) are not supported.
pub fn parse_price(raw: &str) -> Option<f64> {
    let normalized = raw
        .replace(|c: char| matches!(c, '€' | ' ' | '\u{a0}'), "")
        .replace(',', ".");

    FIRST_AMOUNT
        .find(&normalized)
        .and_then(|amount| amount.as_str().parse::<f64>().ok())
}

/// Looks for an English "from €1,23" phrase anywhere in the page text.
pub fn parse_from_price_phrase(page_text: &str) -> Option<f64> {
    FROM_PRICE
        .captures(page_text)
        .and_then(|captures| captures[1].replace(',', ".").parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_euro_comma() {
        assert_eq!(parse_price("€12,34"), Some(12.34));
        assert_eq!(parse_price("12,34 €"), Some(12.34));
        assert_eq!(parse_price("0,02\u{a0}€"), Some(0.02));
    }

    #[test]
    fn test_parse_price_plain_number() {
        assert_eq!(parse_price("1.23"), Some(1.23));
        assert_eq!(parse_price("From 5 €"), Some(5.0));
    }

    #[test]
    fn test_parse_price_without_number() {
        assert_eq!(parse_price("no price here"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("€"), None);
    }

    #[test]
    fn test_from_phrase() {
        assert_eq!(
            parse_from_price_phrase("Available items 120 From €0,45 Price Trend"),
            Some(0.45)
        );
        assert_eq!(parse_from_price_phrase("FROM 3.10"), Some(3.1));
        assert_eq!(parse_from_price_phrase("Price Trend 3,10 €"), None);
    }
}
