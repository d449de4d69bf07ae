use std::{path::Path, time::Duration};

use crate::{
    cardmarket_scraper::CardmarketScraper,
    errors::ScrapeError,
    fetcher::{CookieJar, Fetcher},
    ocr::card_image_ocr::OcrEngine,
};

pub fn test_scraper(base_url: &str) -> CardmarketScraper {
    let fetcher = Fetcher::new(
        CookieJar::in_memory(),
        base_url,
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .unwrap();
    CardmarketScraper::new(base_url, fetcher)
}

/// Stands in for tesseract: returns canned text, or fails when built with `failing()`.
pub struct FakeOcrEngine {
    text: Option<String>,
}

impl FakeOcrEngine {
    pub fn returning(text: &str) -> Self {
        FakeOcrEngine {
            text: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        FakeOcrEngine { text: None }
    }
}

impl OcrEngine for FakeOcrEngine {
    fn extract_text(&self, image_path: &Path) -> Result<String, ScrapeError> {
        assert!(image_path.is_file(), "scratch copy missing");
        self.text
            .clone()
            .ok_or_else(|| ScrapeError::OcrFailure("fake engine failure".to_string()))
    }
}
