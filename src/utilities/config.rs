use std::env;

use log::error;

use super::constants::{
    CARDMARKET_URL, DEFAULT_COOKIE_JAR_PATH, DEFAULT_DATABASE_PATH, DEFAULT_OUTPUT_DIR,
    DEFAULT_UPLOAD_DIR, IMAGE_TIMEOUT_SECS, SCRAPE_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub cardmarket_base_url: String,
    pub cookie_jar_path: String,
    pub database_path: String,
    pub output_dir: String,
    pub upload_dir: String,
    pub scrape_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub scrape_url: String,
    pub search_query: String,
    pub serial_number: String,
    pub ocr_image_path: String,
    pub refresh_prices: bool,
    pub refresh_card_id: Option<i64>,
    pub delete_card_id: Option<i64>,
    pub collection_search: String,
    pub proxy_image_url: String,
    pub user_id: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cardmarket_base_url: CARDMARKET_URL.to_string(),
            cookie_jar_path: DEFAULT_COOKIE_JAR_PATH.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
            scrape_timeout_secs: SCRAPE_TIMEOUT_SECS,
            image_timeout_secs: IMAGE_TIMEOUT_SECS,
            scrape_url: "".to_string(),
            search_query: "".to_string(),
            serial_number: "".to_string(),
            ocr_image_path: "".to_string(),
            refresh_prices: false,
            refresh_card_id: None,
            delete_card_id: None,
            collection_search: "".to_string(),
            proxy_image_url: "".to_string(),
            user_id: 1,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.update_from_env();
        config
    }

    fn update_from_env(&mut self) {
        if let Ok(base_url) = env::var("CARDMARKET_BASE_URL") {
            self.cardmarket_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(cookie_jar_path) = env::var("COOKIE_JAR_PATH") {
            self.cookie_jar_path = cookie_jar_path;
        }
        if let Ok(database_path) = env::var("DATABASE_PATH") {
            self.database_path = database_path;
        }
        if let Ok(output_dir) = env::var("OUTPUT_DIR") {
            self.output_dir = output_dir;
        }
        if let Ok(upload_dir) = env::var("UPLOAD_DIR") {
            self.upload_dir = upload_dir;
        }
        if let Ok(timeout) = env::var("SCRAPE_TIMEOUT_SECS") {
            self.scrape_timeout_secs = timeout.parse().unwrap_or(SCRAPE_TIMEOUT_SECS);
        }
        if let Ok(timeout) = env::var("IMAGE_TIMEOUT_SECS") {
            self.image_timeout_secs = timeout.parse().unwrap_or(IMAGE_TIMEOUT_SECS);
        }
        if let Ok(scrape_url) = env::var("SCRAPE_URL") {
            self.scrape_url = scrape_url;
        }
        if let Ok(search_query) = env::var("SEARCH_QUERY") {
            self.search_query = search_query;
        }
        if let Ok(serial_number) = env::var("SERIAL_NUMBER") {
            self.serial_number = serial_number.trim().to_string();
        }
        if let Ok(ocr_image_path) = env::var("OCR_IMAGE_PATH") {
            if std::path::Path::new(&ocr_image_path).is_file() {
                self.ocr_image_path = ocr_image_path;
            } else if !ocr_image_path.is_empty() {
                error!("Supplied OCR image path {} is not a file", ocr_image_path);
                self.ocr_image_path = "".to_string();
            }
        }
        if let Ok(refresh_prices) = env::var("REFRESH_PRICES") {
            self.refresh_prices = refresh_prices == "1";
        }
        if let Ok(card_id) = env::var("REFRESH_CARD_ID") {
            self.refresh_card_id = parse_card_id("REFRESH_CARD_ID", &card_id);
        }
        if let Ok(card_id) = env::var("DELETE_CARD_ID") {
            self.delete_card_id = parse_card_id("DELETE_CARD_ID", &card_id);
        }
        if let Ok(term) = env::var("COLLECTION_SEARCH") {
            self.collection_search = term.trim().to_string();
        }
        if let Ok(image_url) = env::var("PROXY_IMAGE_URL") {
            self.proxy_image_url = image_url;
        }
        if let Ok(user_id) = env::var("USER_ID") {
            match user_id.parse() {
                Ok(id) => self.user_id = id,
                Err(_) => error!("USER_ID '{}' is not a number, using {}", user_id, self.user_id),
            }
        }
    }
}

fn parse_card_id(name: &str, value: &str) -> Option<i64> {
    match value.trim().parse() {
        Ok(id) => Some(id),
        Err(_) => {
            error!("{} '{}' is not a card id, ignoring it", name, value);
            None
        }
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: Config = Config::new();
}
