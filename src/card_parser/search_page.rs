use scraper::{Html, Selector};

use super::absolute_url;
use crate::{
    cards::search_result::SearchResult,
    utilities::{
        constants::{CARDMARKET_PRODUCT_PATH, MAX_SEARCH_RESULTS},
        string_manipulators::collapse_whitespace,
    },
};

/// Reads the product rows of a Cardmarket search page, keeping at most the first ten.
/// Rows without a product link are skipped.
pub fn extract_search_results(markup: &str, origin: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(markup);
    let (Ok(row_selector), Ok(link_selector)) = (
        Selector::parse("div[class*='product-row']"),
        Selector::parse(&format!("a[href*='{}']", CARDMARKET_PRODUCT_PATH)),
    ) else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .filter_map(|row| {
            let link = row.select(&link_selector).next()?;
            let href = link.value().attr("href")?.trim();
            Some(SearchResult {
                name: collapse_whitespace(&link.text().collect::<String>()),
                url: absolute_url(origin, href),
            })
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
