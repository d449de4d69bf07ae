use lazy_static::lazy_static;
use regex::Regex;

use crate::cards::{
    card_number::find_card_number, energy_type::EnergyType, ocr_card_data::OcrCardData,
    rarity::Rarity, setname::set_name_from_text,
};

lazy_static! {
    static ref HP_AFTER_NUMBER: Regex = Regex::new(r"(?i)\b(\d{2,3})\s*HP\b").unwrap();
    static ref HP_BEFORE_NUMBER: Regex = Regex::new(r"(?i)\bHP\s*(\d{2,3})\b").unwrap();
    static ref SERIAL_NUMBER: Regex = Regex::new(r"\b([A-Z]{2,4}[-\s]?\d{1,4}[A-Z]?)\b").unwrap();
    static ref NAME_LINE: Regex = Regex::new(r"^[A-Za-z\s\-'.]+$").unwrap();
}

/// Reads card fields out of raw OCR text. Every detector runs on the whole
/// text independently; one missing field never affects another.
pub fn parse_card_text(raw_text: &str) -> OcrCardData {
    let text = raw_text.trim();

    OcrCardData {
        card_name: detect_card_name(raw_text),
        serial_number: detect_serial_number(text),
        set_name: set_name_from_text(text),
        card_number: find_card_number(text),
        rarity: Rarity::detect(text),
        hp: detect_hp(text),
        card_type: EnergyType::detect(text),
    }
}

/// `60 HP` and `HP60` style hit points, the number-first form wins.
pub fn detect_hp(text: &str) -> Option<String> {
    HP_AFTER_NUMBER
        .captures(text)
        .or_else(|| HP_BEFORE_NUMBER.captures(text))
        .map(|captures| captures[1].to_string())
}

/// Set code plus number such as `SVI 063` or `PAL-123a`, returned without spaces.
pub fn detect_serial_number(text: &str) -> Option<String> {
    SERIAL_NUMBER.captures(text).map(|captures| {
        captures[1]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    })
}

/// The longest line made only of letters, spaces, hyphens, apostrophes and
/// periods (3 to 49 bytes). Ties go to the earliest line.
pub fn detect_card_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| (3..50).contains(&line.len()) && NAME_LINE.is_match(line))
        .fold(None, |longest: Option<&str>, line| match longest {
            Some(current) if current.len() >= line.len() => Some(current),
            _ => Some(line),
        })
        .map(str::to_string)
}
