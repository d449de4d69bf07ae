use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    #[serde(rename = "Rare Holo")]
    RareHolo,
    #[serde(rename = "Ultra Rare")]
    UltraRare,
    #[serde(rename = "Secret Rare")]
    SecretRare,
    #[serde(rename = "Rare Rainbow")]
    RareRainbow,
}

lazy_static! {
    // Checked top to bottom, first hit wins. Plain "Rare" sits above the
    // holo/rainbow variants, so "Rare Holo" text reports Rare.
    static ref RARITY_PATTERNS: Vec<(Rarity, Regex)> = vec![
        (Rarity::Common, Regex::new(r"(?i)\bcommon\b|●").unwrap()),
        (Rarity::Uncommon, Regex::new(r"(?i)\buncommon\b|◆").unwrap()),
        (Rarity::Rare, Regex::new(r"(?i)\brare\b|★").unwrap()),
        (Rarity::RareHolo, Regex::new(r"(?i)\b(rare\s+holo|holo\s+rare)\b").unwrap()),
        (Rarity::UltraRare, Regex::new(r"(?i)\b(ultra\s+rare|UR)\b").unwrap()),
        (Rarity::SecretRare, Regex::new(r"(?i)\b(secret\s+rare|SR)\b").unwrap()),
        (Rarity::RareRainbow, Regex::new(r"(?i)\b(rainbow\s+rare|RR)\b").unwrap()),
    ];
}

impl Rarity {
    /// First rarity whose keyword or symbol shows up in `text`.
    pub fn detect(text: &str) -> Option<Rarity> {
        RARITY_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(rarity, _)| *rarity)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::RareHolo => write!(f, "Rare Holo"),
            Rarity::UltraRare => write!(f, "Ultra Rare"),
            Rarity::SecretRare => write!(f, "Secret Rare"),
            Rarity::RareRainbow => write!(f, "Rare Rainbow"),
        }
    }
}
