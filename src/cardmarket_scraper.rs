use log::{error, info, warn};
use url::Url;

use crate::{
    card_parser::{card_page, search_page::extract_search_results},
    cards::{cardinfo::CardInfo, search_result::SearchResult},
    errors::ScrapeError,
    fetcher::{Fetcher, ProxiedImage},
    utilities::constants::CARDMARKET_SEARCH_PATH,
};

pub struct CardmarketScraper {
    fetcher: Fetcher,
    base_url: String,
}

impl CardmarketScraper {
    pub fn new(base_url: &str, fetcher: Fetcher) -> Self {
        CardmarketScraper {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Scrapes a product page. Fetch failures are returned so the caller can ask
    /// for manual entry; fields that cannot be found are simply left empty.
    pub async fn scrape_card(&self, url: &str) -> Result<CardInfo, ScrapeError> {
        Url::parse(url).map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", url, e)))?;
        info!("Scraping card from {}", url);

        let markup = self.fetcher.fetch(url).await?;
        let card_info = CardInfo {
            source_url: url.to_string(),
            ..card_page::extract(&markup, &self.base_url)
        };

        if card_info.card_name.is_empty() {
            warn!("No card name found on {}", url);
        }
        Ok(card_info)
    }

    /// Current price of a product page, `None` when the page or the price is unavailable.
    pub async fn get_price(&self, url: &str) -> Option<f64> {
        let markup = match self.fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                error!("Could not fetch price from {}: {}", url, e);
                return None;
            }
        };

        let document = scraper::Html::parse_document(&markup);
        let price = card_page::extract_price(&document);
        if price.is_none() {
            warn!("No price found on {}", url);
        }
        price
    }

    /// Searches Cardmarket for a card name. Any failure gives an empty list.
    pub async fn search_card(&self, card_name: &str) -> Vec<SearchResult> {
        let url = format!(
            "{}{}?searchString={}",
            self.base_url,
            CARDMARKET_SEARCH_PATH,
            urlencoding::encode(card_name)
        );
        info!("Searching Cardmarket for '{}'", card_name);

        match self.fetcher.fetch(&url).await {
            Ok(markup) => {
                let results = extract_search_results(&markup, &self.base_url);
                info!("Found {} results for '{}'", results.len(), card_name);
                results
            }
            Err(e) => {
                error!("Search for '{}' failed: {}", card_name, e);
                Vec::new()
            }
        }
    }

    pub async fn proxy_image(&self, url: &str) -> ProxiedImage {
        self.fetcher.fetch_image(url).await
    }
}
