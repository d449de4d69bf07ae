mod card_parser;
mod cardmarket_scraper;
mod cards;
mod collection;
mod db;
mod errors;
mod fetcher;
mod ocr;
mod test;
mod utilities;

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{error, info, warn};

use cardmarket_scraper::CardmarketScraper;
use collection::{CardCollection, Caller};
use db::card_repository::{CardRepository, SqliteCardRepository};
use fetcher::{CookieJar, Fetcher};
use ocr::card_image_ocr::{CardImageOcr, OcrEngine, TesseractEngine};
use utilities::constants::{
    COLLECTION_SEARCH_PREFIX, OCR_RESULT_PREFIX, PROXIED_IMAGE_PREFIX, SCRAPED_CARD_PREFIX,
    SEARCH_RESULTS_PREFIX,
};
use utilities::{config::CONFIG, file_management::save_to_file, string_manipulators::date_time_as_string};

fn output_path(prefix: &str) -> String {
    format!(
        "{}/{}{}.json",
        CONFIG.output_dir,
        prefix,
        date_time_as_string(None, None)
    )
}

async fn scrape_card_and_save_to_file<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
    caller: Caller,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = chrono::prelude::Local::now();
    info!("Starting at {}", start_time);

    let path = output_path(SCRAPED_CARD_PREFIX);
    if CONFIG.serial_number.is_empty() {
        let card_info = collection.scraper().scrape_card(&CONFIG.scrape_url).await?;
        save_to_file(&path, &card_info)?;
    } else {
        let card = collection
            .add_from_marketplace(caller, &CONFIG.scrape_url, &CONFIG.serial_number)
            .await?;
        save_to_file(&path, &card)?;
    }

    let end_time = chrono::prelude::Local::now();
    info!(
        "Scraping {} started at: {}. Finished at: {}. Took: {} seconds. Saved to: {}",
        CONFIG.scrape_url,
        start_time,
        end_time,
        (end_time - start_time).num_seconds(),
        path
    );
    Ok(())
}

async fn search_cards_and_save_to_file<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = chrono::prelude::Local::now();
    info!("Starting at {}", start_time);

    let results = collection.scraper().search_card(&CONFIG.search_query).await;
    let path = output_path(SEARCH_RESULTS_PREFIX);
    save_to_file(&path, &results)?;

    let end_time = chrono::prelude::Local::now();
    info!(
        "Search for '{}' started at: {}. Finished at: {}. Took: {} seconds and with {} results on path: {}",
        CONFIG.search_query,
        start_time,
        end_time,
        (end_time - start_time).num_seconds(),
        results.len(),
        path
    );
    Ok(())
}

fn read_card_image_and_save_to_file<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
    caller: Caller,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = chrono::prelude::Local::now();
    info!("Starting at {}", start_time);

    let fallback_serial = if CONFIG.serial_number.is_empty() {
        format!("ocr-{}", date_time_as_string(None, None))
    } else {
        CONFIG.serial_number.clone()
    };
    let (card, ocr_result) =
        collection.add_from_image(caller, Path::new(&CONFIG.ocr_image_path), &fallback_serial)?;
    let path = output_path(OCR_RESULT_PREFIX);
    save_to_file(&path, &ocr_result)?;

    let end_time = chrono::prelude::Local::now();
    info!(
        "OCR of {} started at: {}. Finished at: {}. Took: {} seconds. Stored as card {} ('{}'), text saved to: {}",
        CONFIG.ocr_image_path,
        start_time,
        end_time,
        (end_time - start_time).num_seconds(),
        card.id,
        card.card_name,
        path
    );
    Ok(())
}

async fn refresh_prices<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
    caller: Caller,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = chrono::prelude::Local::now();
    info!("Starting at {}", start_time);

    let updated = collection.refresh_all_prices(caller).await?;
    let value = collection.collection_value(caller)?;

    let end_time = chrono::prelude::Local::now();
    info!(
        "Price refresh started at: {}. Finished at: {}. Took: {} seconds. Updated {} cards, collection worth € {:.2}",
        start_time,
        end_time,
        (end_time - start_time).num_seconds(),
        updated,
        value
    );
    Ok(())
}

async fn proxy_image_to_file<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = collection.scraper().proxy_image(&CONFIG.proxy_image_url).await;
    if !image.found {
        warn!("Image {} unavailable, saving placeholder", CONFIG.proxy_image_url);
    }

    let extension = image.content_type.rsplit('/').next().unwrap_or("img");
    let path = format!(
        "{}/{}{}.{}",
        CONFIG.output_dir,
        PROXIED_IMAGE_PREFIX,
        date_time_as_string(None, None),
        extension
    );
    fs::create_dir_all(&CONFIG.output_dir)?;
    fs::write(&path, &image.bytes)?;
    info!("Saved {} bytes of {} to {}", image.bytes.len(), CONFIG.proxy_image_url, path);
    Ok(())
}

fn search_collection_and_save_to_file<R: CardRepository, E: OcrEngine>(
    collection: &CardCollection<R, E>,
    caller: Caller,
) -> Result<(), Box<dyn std::error::Error>> {
    let cards = collection.search(caller, &CONFIG.collection_search)?;
    let path = output_path(COLLECTION_SEARCH_PREFIX);
    save_to_file(&path, &cards)?;
    info!(
        "Found {} cards matching '{}' in the collection of user {}, saved to: {}",
        cards.len(),
        CONFIG.collection_search,
        caller.user_id,
        path
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Starting");

    let cookie_jar = CookieJar::load(Path::new(&CONFIG.cookie_jar_path));
    let fetcher = Fetcher::new(
        cookie_jar,
        &CONFIG.cardmarket_base_url,
        Duration::from_secs(CONFIG.scrape_timeout_secs),
        Duration::from_secs(CONFIG.image_timeout_secs),
    )?;
    let scraper = CardmarketScraper::new(&CONFIG.cardmarket_base_url, fetcher);
    let ocr = CardImageOcr::new(TesseractEngine::default(), Path::new(&CONFIG.upload_dir));
    let repository = SqliteCardRepository::open(Path::new(&CONFIG.database_path))?;
    let collection = CardCollection::new(scraper, ocr, repository);
    let caller = Caller {
        user_id: CONFIG.user_id,
    };

    if !CONFIG.scrape_url.is_empty() {
        if let Err(e) = scrape_card_and_save_to_file(&collection, caller).await {
            error!("Failed to scrape {}: {}", CONFIG.scrape_url, e);
        }
    }

    if !CONFIG.search_query.is_empty() {
        if let Err(e) = search_cards_and_save_to_file(&collection).await {
            error!("Failed to search for '{}': {}", CONFIG.search_query, e);
        }
    }

    if !CONFIG.ocr_image_path.is_empty() {
        if let Err(e) = read_card_image_and_save_to_file(&collection, caller) {
            error!("Failed to read card image {}: {}", CONFIG.ocr_image_path, e);
        }
    }

    if !CONFIG.proxy_image_url.is_empty() {
        if let Err(e) = proxy_image_to_file(&collection).await {
            error!("Failed to save image {}: {}", CONFIG.proxy_image_url, e);
        }
    }

    if let Some(id) = CONFIG.refresh_card_id {
        match collection.refresh_price(caller, id).await {
            Ok(Some(price)) => info!("Card {} is now worth € {:.2}", id, price),
            Ok(None) => warn!("No price found for card {}, kept the old one", id),
            Err(e) => error!("Failed to refresh price of card {}: {}", id, e),
        }
    }

    if let Some(id) = CONFIG.delete_card_id {
        match collection.delete_card(caller, id) {
            Ok(()) => info!("Deleted card {}", id),
            Err(e) => error!("Failed to delete card {}: {}", id, e),
        }
    }

    if !CONFIG.collection_search.is_empty() {
        if let Err(e) = search_collection_and_save_to_file(&collection, caller) {
            error!("Failed to search the collection for '{}': {}", CONFIG.collection_search, e);
        }
    }

    if CONFIG.refresh_prices {
        refresh_prices(&collection, caller).await?;
    }

    Ok(())
}
