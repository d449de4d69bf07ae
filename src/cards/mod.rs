pub mod card_number;
pub mod cardinfo;
pub mod collection_card;
pub mod energy_type;
pub mod ocr_card_data;
pub mod price;
pub mod rarity;
pub mod search_result;
pub mod setname;
