use serde::{Deserialize, Serialize};

use super::{cardinfo::CardInfo, ocr_card_data::OcrCardData};
use crate::utilities::constants::DEFAULT_CONDITION;

/// A card stored in a user's collection.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CollectionCard {
    pub id: i64,
    pub user_id: i64,
    pub serial_number: String,
    pub card_name: String,
    pub set_name: String,
    pub card_number: String,
    pub rarity: String,
    pub condition_card: String,
    pub quantity: i64,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub cardmarket_url: String,
    pub image_url: String,
    pub notes: String,
    pub created_at: String,
    pub last_price_update: Option<String>,
}

/// Writable fields of a collection card, used for both inserts and updates.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub user_id: i64,
    pub serial_number: String,
    pub card_name: String,
    pub set_name: String,
    pub card_number: String,
    pub rarity: String,
    pub condition_card: String,
    pub quantity: i64,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub cardmarket_url: String,
    pub image_url: String,
    pub notes: String,
}

impl NewCard {
    pub fn new(user_id: i64, serial_number: &str, card_name: &str) -> Self {
        NewCard {
            user_id,
            serial_number: serial_number.to_string(),
            card_name: card_name.to_string(),
            set_name: "".to_string(),
            card_number: "".to_string(),
            rarity: "".to_string(),
            condition_card: DEFAULT_CONDITION.to_string(),
            quantity: 1,
            purchase_price: None,
            current_price: None,
            cardmarket_url: "".to_string(),
            image_url: "".to_string(),
            notes: "".to_string(),
        }
    }

    pub fn from_card_info(user_id: i64, serial_number: &str, info: &CardInfo) -> Self {
        NewCard {
            set_name: info.set_name.clone(),
            card_number: info.card_number.clone(),
            rarity: info.rarity.clone(),
            current_price: info.current_price,
            cardmarket_url: info.source_url.clone(),
            image_url: info.image_url.clone(),
            ..NewCard::new(user_id, serial_number, &info.card_name)
        }
    }

    /// Uses the OCR serial number when one was read, `fallback_serial` otherwise.
    pub fn from_ocr(user_id: i64, fallback_serial: &str, data: &OcrCardData) -> Self {
        let serial_number = data.serial_number.as_deref().unwrap_or(fallback_serial);
        NewCard {
            set_name: data.set_name.clone().unwrap_or_default(),
            card_number: data.card_number.clone().unwrap_or_default(),
            rarity: data.rarity.map(|r| r.to_string()).unwrap_or_default(),
            ..NewCard::new(
                user_id,
                serial_number,
                data.card_name.as_deref().unwrap_or_default(),
            )
        }
    }
}

impl From<&CollectionCard> for NewCard {
    fn from(card: &CollectionCard) -> Self {
        NewCard {
            user_id: card.user_id,
            serial_number: card.serial_number.clone(),
            card_name: card.card_name.clone(),
            set_name: card.set_name.clone(),
            card_number: card.card_number.clone(),
            rarity: card.rarity.clone(),
            condition_card: card.condition_card.clone(),
            quantity: card.quantity,
            purchase_price: card.purchase_price,
            current_price: card.current_price,
            cardmarket_url: card.cardmarket_url.clone(),
            image_url: card.image_url.clone(),
            notes: card.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::rarity::Rarity;

    #[test]
    fn test_from_card_info_keeps_scraped_fields() {
        let info = CardInfo {
            card_name: "Pikachu".to_string(),
            set_name: "Base Set".to_string(),
            card_number: "58/102".to_string(),
            rarity: "Common".to_string(),
            current_price: Some(1.5),
            image_url: "https://www.cardmarket.com/img/pikachu.jpg".to_string(),
            source_url: "https://www.cardmarket.com/en/Pokemon/Products/Singles/Base-Set/Pikachu"
                .to_string(),
        };

        let card = NewCard::from_card_info(7, "BS-58", &info);

        assert_eq!(card.user_id, 7);
        assert_eq!(card.serial_number, "BS-58");
        assert_eq!(card.card_name, "Pikachu");
        assert_eq!(card.current_price, Some(1.5));
        assert_eq!(card.cardmarket_url, info.source_url);
        assert_eq!(card.condition_card, "Near Mint");
        assert_eq!(card.quantity, 1);
    }

    #[test]
    fn test_from_ocr_prefers_detected_serial() {
        let data = OcrCardData {
            card_name: Some("Charizard".to_string()),
            serial_number: Some("OBF125".to_string()),
            rarity: Some(Rarity::RareHolo),
            ..Default::default()
        };

        let card = NewCard::from_ocr(3, "manual-1", &data);
        assert_eq!(card.serial_number, "OBF125");
        assert_eq!(card.rarity, "Rare Holo");

        let card = NewCard::from_ocr(3, "manual-1", &OcrCardData::default());
        assert_eq!(card.serial_number, "manual-1");
        assert_eq!(card.card_name, "");
    }
}
