use std::path::Path;

use futures::{stream, StreamExt};
use log::{info, warn};

use crate::{
    cardmarket_scraper::CardmarketScraper,
    cards::collection_card::{CollectionCard, NewCard},
    db::card_repository::CardRepository,
    errors::ScrapeError,
    ocr::card_image_ocr::{CardImageOcr, OcrEngine, OcrResult},
    utilities::constants::PRICE_REFRESH_CONCURRENCY,
};

/// The already authenticated user a request runs for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caller {
    pub user_id: i64,
}

/// A user's card collection: scraped or photographed cards go in, prices get refreshed.
/// Only the owner may change a card.
pub struct CardCollection<R: CardRepository, E: OcrEngine> {
    scraper: CardmarketScraper,
    ocr: CardImageOcr<E>,
    repository: R,
}

impl<R: CardRepository, E: OcrEngine> CardCollection<R, E> {
    pub fn new(scraper: CardmarketScraper, ocr: CardImageOcr<E>, repository: R) -> Self {
        CardCollection {
            scraper,
            ocr,
            repository,
        }
    }

    pub fn scraper(&self) -> &CardmarketScraper {
        &self.scraper
    }

    /// Scrapes `url` into the collection. When the caller already owns a card with
    /// this serial number, its scraped fields are refreshed and quantity, condition,
    /// purchase price and notes are kept.
    pub async fn add_from_marketplace(
        &self,
        caller: Caller,
        url: &str,
        serial_number: &str,
    ) -> Result<CollectionCard, ScrapeError> {
        let card_info = self.scraper.scrape_card(url).await?;
        let scraped = NewCard::from_card_info(caller.user_id, serial_number, &card_info);

        match self
            .repository
            .get_by_serial(serial_number, Some(caller.user_id))?
        {
            Some(existing) => {
                info!("Card {} already collected, refreshing it", serial_number);
                let merged = NewCard {
                    card_name: scraped.card_name,
                    set_name: scraped.set_name,
                    card_number: scraped.card_number,
                    rarity: scraped.rarity,
                    current_price: scraped.current_price,
                    cardmarket_url: scraped.cardmarket_url,
                    image_url: scraped.image_url,
                    ..NewCard::from(&existing)
                };
                self.update_card(caller, existing.id, &merged)
            }
            None => self.insert(&scraped),
        }
    }

    /// Stores what OCR could read from the photo. The OCR result is returned too
    /// so the user can correct it by hand.
    pub fn add_from_image(
        &self,
        caller: Caller,
        image_path: &Path,
        fallback_serial: &str,
    ) -> Result<(CollectionCard, OcrResult), ScrapeError> {
        let ocr_result = self.ocr.process_image(image_path)?;
        let card = self.insert(&NewCard::from_ocr(
            caller.user_id,
            fallback_serial,
            &ocr_result.data,
        ))?;
        Ok((card, ocr_result))
    }

    pub fn update_card(
        &self,
        caller: Caller,
        id: i64,
        fields: &NewCard,
    ) -> Result<CollectionCard, ScrapeError> {
        let existing = self.owned_card(caller, id)?;
        let fields = NewCard {
            user_id: existing.user_id,
            ..fields.clone()
        };
        self.repository.update(id, &fields)?;
        self.repository.get_by_id(id)?.ok_or(ScrapeError::NotFound)
    }

    pub fn delete_card(&self, caller: Caller, id: i64) -> Result<(), ScrapeError> {
        self.owned_card(caller, id)?;
        self.repository.delete(id)?;
        Ok(())
    }

    /// Fetches a fresh price for one card. `Ok(None)` means the price could not be
    /// read and the stored price was left alone.
    pub async fn refresh_price(&self, caller: Caller, id: i64) -> Result<Option<f64>, ScrapeError> {
        let card = self.owned_card(caller, id)?;
        if card.cardmarket_url.is_empty() {
            return Err(ScrapeError::MissingMarketplaceUrl);
        }

        let price = self.scraper.get_price(&card.cardmarket_url).await;
        if let Some(price) = price {
            self.repository.update_price(id, price)?;
            info!("Updated price of card {} to {:.2}", id, price);
        }
        Ok(price)
    }

    /// Refreshes every card of the caller that has a Cardmarket url and returns
    /// how many prices were updated.
    pub async fn refresh_all_prices(&self, caller: Caller) -> Result<usize, ScrapeError> {
        let cards: Vec<CollectionCard> = self
            .repository
            .get_all_by_user(caller.user_id)?
            .into_iter()
            .filter(|card| !card.cardmarket_url.is_empty())
            .collect();
        info!("Refreshing prices of {} cards", cards.len());

        let prices = stream::iter(cards)
            .map(|card| async move {
                let price = self.scraper.get_price(&card.cardmarket_url).await;
                (card.id, price)
            })
            .buffered(PRICE_REFRESH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        let mut updated = 0;
        for (id, price) in prices {
            match price {
                Some(price) => {
                    if self.repository.update_price(id, price)? {
                        updated += 1;
                    }
                }
                None => warn!("Keeping old price for card {}", id),
            }
        }
        Ok(updated)
    }

    /// Sum of `current_price * quantity` over the caller's cards, unpriced cards count as 0.
    pub fn collection_value(&self, caller: Caller) -> Result<f64, ScrapeError> {
        Ok(self
            .repository
            .get_all_by_user(caller.user_id)?
            .iter()
            .map(|card| card.current_price.unwrap_or(0.0) * card.quantity as f64)
            .sum())
    }

    /// Cards of the caller whose name, serial number or set contains `term`.
    pub fn search(&self, caller: Caller, term: &str) -> Result<Vec<CollectionCard>, ScrapeError> {
        Ok(self
            .repository
            .search(term)?
            .into_iter()
            .filter(|card| card.user_id == caller.user_id)
            .collect())
    }

    fn owned_card(&self, caller: Caller, id: i64) -> Result<CollectionCard, ScrapeError> {
        let card = self.repository.get_by_id(id)?.ok_or(ScrapeError::NotFound)?;
        if card.user_id != caller.user_id {
            warn!("User {} tried to change card {} of user {}", caller.user_id, id, card.user_id);
            return Err(ScrapeError::Forbidden);
        }
        Ok(card)
    }

    fn insert(&self, card: &NewCard) -> Result<CollectionCard, ScrapeError> {
        let id = self.repository.create(card)?;
        info!("Added '{}' to the collection of user {}", card.card_name, card.user_id);
        self.repository.get_by_id(id)?.ok_or(ScrapeError::NotFound)
    }
}
