use thiserror::Error;

/// Failures that cross the scraper, OCR and repository boundaries.
///
/// A field whose heuristics all miss is not an error; it shows up as an empty
/// string or `None` on the extracted record instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Cardmarket blocked the request (403), enter the card data manually")]
    Blocked,
    #[error("HTTP error {code} for {url}")]
    HttpError { code: u16, url: String },
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("OCR failed: {0}")]
    OcrFailure(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
    #[error("Card not found")]
    NotFound,
    #[error("Card belongs to another user")]
    Forbidden,
    #[error("Card has no Cardmarket url")]
    MissingMarketplaceUrl,
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ScrapeError {
    fn from(error: reqwest::Error) -> Self {
        ScrapeError::NetworkError(error.to_string())
    }
}
