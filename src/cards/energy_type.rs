use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum EnergyType {
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Darkness,
    Metal,
    Fairy,
    Dragon,
    Colorless,
}

impl EnergyType {
    pub const ALL: [EnergyType; 11] = [
        EnergyType::Grass,
        EnergyType::Fire,
        EnergyType::Water,
        EnergyType::Lightning,
        EnergyType::Psychic,
        EnergyType::Fighting,
        EnergyType::Darkness,
        EnergyType::Metal,
        EnergyType::Fairy,
        EnergyType::Dragon,
        EnergyType::Colorless,
    ];

    /// First type, in `ALL` order, whose name appears anywhere in `text`.
    pub fn detect(text: &str) -> Option<EnergyType> {
        let text = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|energy| text.contains(&energy.to_string().to_lowercase()))
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
