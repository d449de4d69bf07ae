use serde::{Deserialize, Serialize};

/// Card data scraped from a Cardmarket product page.
///
/// Every text field is empty when its locators missed; `current_price` is
/// `None` when no price could be parsed.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct CardInfo {
    pub card_name: String,
    pub set_name: String,
    pub card_number: String,
    pub rarity: String,
    pub current_price: Option<f64>,
    pub image_url: String,
    #[serde(rename = "cardmarket_url")]
    pub source_url: String,
}

impl CardInfo {
    pub fn is_empty(&self) -> bool {
        self.card_name.is_empty()
            && self.set_name.is_empty()
            && self.card_number.is_empty()
            && self.rarity.is_empty()
            && self.current_price.is_none()
            && self.image_url.is_empty()
    }
}
