use log::debug;
use scraper::{Html, Selector};

use super::{
    absolute_url,
    locator::{first_match, non_empty, Locator},
};
use crate::{
    cards::{
        card_number::find_card_number,
        cardinfo::CardInfo,
        price::{parse_from_price_phrase, parse_price},
    },
    utilities::string_manipulators::collapse_whitespace,
};

const NAME_LOCATORS: [Locator; 4] = [
    Locator::Text("h1[class*='product-name']"),
    Locator::Text("h1[class='title']"),
    Locator::Text("div[class*='product-title'] h1"),
    Locator::Text("h1"),
];

const SET_LOCATORS: [Locator; 3] = [
    Locator::Text("a[href*='/Expansions/'] > span"),
    Locator::Text("div[class*='expansion'] a"),
    Locator::Text("span[class*='expansion-name']"),
];

const NUMBER_LOCATORS: [Locator; 3] = [
    Locator::TextContaining("span", "#"),
    Locator::DefinitionFor("Number"),
    Locator::Text("div[class*='card-number']"),
];

const RARITY_LOCATORS: [Locator; 3] = [
    Locator::DefinitionFor("Rarity"),
    Locator::Text("span[class*='rarity']"),
    Locator::Text("div[class*='rarity']"),
];

const PRICE_LOCATORS: [Locator; 5] = [
    Locator::Text("div[class*='price-container'] span[class*='price']"),
    Locator::Text("dd[class*='price']"),
    Locator::TextContaining("span", "€"),
    Locator::Text("[class*='price-from']"),
    Locator::Text("div[class='info-list-item'] dd"),
];

const IMAGE_LOCATORS: [Locator; 4] = [
    Locator::Attribute("img[class*='product-image']", "src"),
    Locator::Attribute("div[class*='product-image'] img", "src"),
    Locator::Attribute("img[alt*='Pokemon']", "src"),
    Locator::Attribute("meta[property='og:image']", "content"),
];

/// Pulls a [`CardInfo`] out of a Cardmarket product page.
///
/// Every field is looked up on its own. A field whose locators all miss is
/// left empty (or `None` for the price) and the others are still filled.
/// `source_url` is left for the caller to set.
pub fn extract(markup: &str, origin: &str) -> CardInfo {
    let document = Html::parse_document(markup);

    let card_info = CardInfo {
        card_name: extract_card_name(&document),
        set_name: extract_set_name(&document),
        card_number: extract_card_number(&document),
        rarity: extract_rarity(&document),
        current_price: extract_price(&document),
        image_url: extract_image_url(&document, origin),
        source_url: "".to_string(),
    };
    debug!("Extracted {:?}", card_info);
    card_info
}

pub fn extract_card_name(document: &Html) -> String {
    first_match(document, &NAME_LOCATORS, |text| non_empty(&collapse_whitespace(text)))
        .unwrap_or_default()
}

pub fn extract_set_name(document: &Html) -> String {
    first_match(document, &SET_LOCATORS, non_empty).unwrap_or_default()
}

/// Only text carrying a `045/102` or `#45` style number counts as a hit.
pub fn extract_card_number(document: &Html) -> String {
    first_match(document, &NUMBER_LOCATORS, find_card_number).unwrap_or_default()
}

pub fn extract_rarity(document: &Html) -> String {
    first_match(document, &RARITY_LOCATORS, non_empty).unwrap_or_default()
}

/// Tries the price locators first, then an English "from €x" phrase anywhere in the body.
pub fn extract_price(document: &Html) -> Option<f64> {
    first_match(document, &PRICE_LOCATORS, parse_price).or_else(|| {
        let body = Selector::parse("body").ok()?;
        let page_text = document.select(&body).next()?.text().collect::<String>();
        parse_from_price_phrase(&page_text)
    })
}

pub fn extract_image_url(document: &Html, origin: &str) -> String {
    first_match(document, &IMAGE_LOCATORS, non_empty)
        .map(|src| absolute_url(origin, &src))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.cardmarket.com";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_extract_product_page() {
        init();
        let markup = include_str!("../test/cardmarket_product_page.html");

        let card_info = extract(markup, ORIGIN);

        assert_eq!(
            card_info,
            CardInfo {
                card_name: "Pikachu ex".to_string(),
                set_name: "Surging Sparks".to_string(),
                card_number: "057/191".to_string(),
                rarity: "Double Rare".to_string(),
                current_price: Some(1.23),
                image_url: "https://www.cardmarket.com/img/items/6/SSP/791581.jpg".to_string(),
                source_url: "".to_string(),
            }
        );
    }

    #[test]
    fn test_price_falls_back_to_page_text() {
        init();
        let markup = include_str!("../test/cardmarket_fallback_page.html");

        let card_info = extract(markup, ORIGIN);

        assert_eq!(card_info.card_name, "Charizard");
        assert_eq!(card_info.current_price, Some(199.5));
        assert_eq!(card_info.card_number, "4/102");
        assert_eq!(card_info.rarity, "Holo Rare");
        assert_eq!(card_info.set_name, "Base Set");
        assert_eq!(
            card_info.image_url,
            "https://product-images.s3.cardmarket.com/51/BS/4/4.jpg"
        );
    }

    #[test]
    fn test_malformed_markup_gives_empty_card() {
        init();
        for markup in ["", "<<<not html>>>", "<html><body><div></span>", "\u{0}\u{1}"] {
            let card_info = extract(markup, ORIGIN);
            assert!(card_info.is_empty(), "expected empty card for {:?}", markup);
            assert_eq!(card_info, CardInfo::default());
        }
    }

    #[test]
    fn test_card_number_requires_number_pattern() {
        let document =
            Html::parse_document("<div class=\"card-number\">Set: 045/102 Foil</div>");
        assert_eq!(extract_card_number(&document), "045/102");

        let document = Html::parse_document("<div class=\"card-number\">Random text</div>");
        assert_eq!(extract_card_number(&document), "");
    }

    #[test]
    fn test_rejected_number_moves_to_next_locator() {
        let document = Html::parse_document(
            "<span>Rank #top</span><dl><dt>Number</dt><dd>063/198</dd></dl>",
        );
        assert_eq!(extract_card_number(&document), "063/198");
    }

    #[test]
    fn test_name_whitespace_is_collapsed() {
        let document = Html::parse_document("<h1>\n   Mew   ex\n\t </h1>");
        assert_eq!(extract_card_name(&document), "Mew ex");
    }

    #[test]
    fn test_missing_price_stays_absent() {
        let document =
            Html::parse_document("<div class=\"price-container\"><span class=\"price\">N/A</span></div><p>No offers</p>");
        assert_eq!(extract_price(&document), None);
    }

    #[test]
    fn test_one_field_missing_does_not_block_others() {
        let document = Html::parse_document(
            "<h1>Eevee</h1><span class=\"rarity\">Common</span><span>Trend 0,10 €</span>",
        );
        assert_eq!(extract_card_name(&document), "Eevee");
        assert_eq!(extract_rarity(&document), "Common");
        assert_eq!(extract_price(&document), Some(0.1));
        assert_eq!(extract_set_name(&document), "");
        assert_eq!(extract_image_url(&document, ORIGIN), "");
    }
}
