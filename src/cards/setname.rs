/// Set code printed on the card and the expansion it stands for.
pub const SET_ABBREVIATIONS: [(&str, &str); 14] = [
    ("SV", "Scarlet & Violet"),
    ("PAL", "Paldea Evolved"),
    ("OBF", "Obsidian Flames"),
    ("MEW", "151"),
    ("PAR", "Paradox Rift"),
    ("SSH", "Sword & Shield"),
    ("BST", "Battle Styles"),
    ("CRE", "Chilling Reign"),
    ("EVS", "Evolving Skies"),
    ("FST", "Fusion Strike"),
    ("BRS", "Brilliant Stars"),
    ("ASR", "Astral Radiance"),
    ("LOR", "Lost Origin"),
    ("SIT", "Silver Tempest"),
];

/// Full set name for the first abbreviation found anywhere in `text`, ignoring case.
pub fn set_name_from_text(text: &str) -> Option<String> {
    let text = text.to_uppercase();
    SET_ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| text.contains(abbreviation))
        .map(|(_, full_name)| full_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_from_code() {
        assert_eq!(
            set_name_from_text("PAR 123/182"),
            Some("Paradox Rift".to_string())
        );
        assert_eq!(set_name_from_text("mew 025"), Some("151".to_string()));
    }

    #[test]
    fn test_table_order() {
        // "SV" comes first in the table even though "PAL" is present too
        assert_eq!(
            set_name_from_text("PAL SV2 Paldea"),
            Some("Scarlet & Violet".to_string())
        );
    }

    #[test]
    fn test_no_set() {
        assert_eq!(set_name_from_text("Pikachu"), None);
    }
}
