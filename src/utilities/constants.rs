pub const CARDMARKET_URL: &str = "https://www.cardmarket.com";
pub const CARDMARKET_SEARCH_PATH: &str = "/en/Pokemon/Products/Search";
pub const CARDMARKET_PRODUCT_PATH: &str = "/Pokemon/Products/";

pub const DEFAULT_COOKIE_JAR_PATH: &str = "/tmp/cardmarket_cookies.txt";
pub const DEFAULT_DATABASE_PATH: &str = "pokemon_cards.db";
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_cards";
pub const DEFAULT_UPLOAD_DIR: &str = "/tmp/card_uploads";

pub const SCRAPE_TIMEOUT_SECS: u64 = 30;
pub const IMAGE_TIMEOUT_SECS: u64 = 10;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const PAGE_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
pub const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,nl;q=0.8";

pub const MAX_SEARCH_RESULTS: usize = 10;
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const SCRAPED_CARD_PREFIX: &str = "scraped_card_";
pub const SEARCH_RESULTS_PREFIX: &str = "search_results_";
pub const OCR_RESULT_PREFIX: &str = "ocr_result_";
pub const COLLECTION_SEARCH_PREFIX: &str = "collection_search_";
pub const PROXIED_IMAGE_PREFIX: &str = "proxied_image_";

pub const DEFAULT_CONDITION: &str = "Near Mint";
pub const PRICE_REFRESH_CONCURRENCY: usize = 4;
