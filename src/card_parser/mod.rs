pub mod card_page;
pub mod locator;
pub mod search_page;

use log::debug;
use url::Url;

/// Resolves `href` against the marketplace origin unless it already carries a scheme.
pub fn absolute_url(origin: &str, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    match Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!("Could not join {} onto {}: {}", href, origin, e);
            format!("{}{}", origin.trim_end_matches('/'), href)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let origin = "https://www.cardmarket.com";
        assert_eq!(
            absolute_url(origin, "/img/items/6/SVI/738001.jpg"),
            "https://www.cardmarket.com/img/items/6/SVI/738001.jpg"
        );
        assert_eq!(
            absolute_url(origin, "https://product-images.s3.cardmarket.com/1.jpg"),
            "https://product-images.s3.cardmarket.com/1.jpg"
        );
        assert_eq!(
            absolute_url(origin, "//static.cardmarket.com/img/1.jpg"),
            "https://static.cardmarket.com/img/1.jpg"
        );
    }
}
