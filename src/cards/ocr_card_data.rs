use serde::{Deserialize, Serialize};

use super::{energy_type::EnergyType, rarity::Rarity};

/// Whatever could be read off a photographed card. Each field is detected on
/// its own, so two fields may come from the same piece of text.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct OcrCardData {
    pub card_name: Option<String>,
    pub serial_number: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub rarity: Option<Rarity>,
    pub hp: Option<String>,
    pub card_type: Option<EnergyType>,
}
