use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::{debug, error, warn};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    redirect, Client, StatusCode,
};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};

use crate::{
    errors::ScrapeError,
    utilities::constants::{ACCEPT_LANGUAGE, BROWSER_USER_AGENT, IMAGE_ACCEPT, PAGE_ACCEPT},
};

/// A transparent 1x1 PNG, served when an image cannot be proxied.
pub const PLACEHOLDER_PNG: [u8; 70] = [
    137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0,
    0, 0, 31, 21, 196, 137, 0, 0, 0, 13, 73, 68, 65, 84, 120, 218, 99, 100, 248, 207, 80, 15, 0, 3,
    134, 1, 128, 90, 52, 125, 107, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130,
];

/// Cookies shared by every page fetch. Optionally backed by a json file so the
/// marketplace sees one continuous browser session across runs. Session cookies
/// (no `Expires` or `Max-Age`) are written to the file too.
///
/// Concurrent fetches may interleave reads and writes of the file. The last
/// writer wins, which at worst leaves a slightly stale jar on disk.
#[derive(Clone)]
pub struct CookieJar {
    store: Arc<CookieStoreMutex>,
    path: Option<PathBuf>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        CookieJar {
            store: Arc::new(CookieStoreMutex::default()),
            path: None,
        }
    }

    /// Loads the jar from `path`. A missing or unreadable file starts an empty jar.
    pub fn load(path: &Path) -> Self {
        let store = match File::open(path) {
            Ok(file) => match cookie_store::serde::json::load_all(BufReader::new(file)) {
                Ok(store) => store,
                Err(e) => {
                    warn!("Ignoring unreadable cookie jar {}: {}", path.display(), e);
                    CookieStore::default()
                }
            },
            Err(_) => {
                debug!("No cookie jar at {}, starting a fresh one", path.display());
                CookieStore::default()
            }
        };

        CookieJar {
            store: Arc::new(CookieStoreMutex::new(store)),
            path: Some(path.to_path_buf()),
        }
    }

    pub fn store(&self) -> Arc<CookieStoreMutex> {
        Arc::clone(&self.store)
    }

    /// Writes the jar back to its file. In-memory jars are left untouched.
    pub fn persist(&self) -> Result<(), ScrapeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let store = self
            .store
            .lock()
            .map_err(|e| ScrapeError::Io(std::io::Error::other(e.to_string())))?;
        let mut writer = BufWriter::new(File::create(path)?);
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut writer)
            .map_err(|e| ScrapeError::Io(std::io::Error::other(e.to_string())))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub found: bool,
}

impl ProxiedImage {
    fn placeholder() -> Self {
        ProxiedImage {
            bytes: PLACEHOLDER_PNG.to_vec(),
            content_type: "image/png".to_string(),
            found: false,
        }
    }
}

/// Fetches marketplace pages while looking like a desktop browser.
///
/// Certificate validation is switched off for both clients. Nothing is
/// retried: a failed request is reported once and the caller falls back to
/// manual entry.
pub struct Fetcher {
    page_client: Client,
    image_client: Client,
    cookie_jar: CookieJar,
    referer: String,
}

impl Fetcher {
    pub fn new(
        cookie_jar: CookieJar,
        referer_origin: &str,
        scrape_timeout: Duration,
        image_timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let referer = format!("{}/", referer_origin.trim_end_matches('/'));

        let page_client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(Self::setup_page_headers(&referer))
            .cookie_provider(cookie_jar.store())
            .danger_accept_invalid_certs(true)
            .redirect(redirect::Policy::limited(10))
            .timeout(scrape_timeout)
            .build()?;

        let image_client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .danger_accept_invalid_certs(true)
            .redirect(redirect::Policy::limited(10))
            .timeout(image_timeout)
            .build()?;

        Ok(Fetcher {
            page_client,
            image_client,
            cookie_jar,
            referer,
        })
    }

    fn setup_page_headers(referer: &str) -> HeaderMap {
        let mut header_map = HeaderMap::new();
        header_map.insert(header::ACCEPT, HeaderValue::from_static(PAGE_ACCEPT));
        header_map.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        header_map.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        header_map.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
        header_map.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        header_map.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
        header_map.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        header_map.insert(header::DNT, HeaderValue::from_static("1"));
        if let Ok(referer) = HeaderValue::from_str(referer) {
            header_map.insert(header::REFERER, referer);
        }
        header_map
    }

    /// Returns the page body on HTTP 200 only.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching {}", url);
        let result = self.fetch_page(url).await;

        if let Err(e) = self.cookie_jar.persist() {
            warn!("Could not persist cookie jar: {}", e);
        }

        match &result {
            Err(ScrapeError::Blocked) => {
                error!("Cardmarket blocked request (403) for {}, data must be entered manually", url)
            }
            Err(e) => error!("Fetching {} failed: {}", url, e),
            Ok(body) => debug!("Fetched {} bytes from {}", body.len(), url),
        }
        result
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.page_client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            StatusCode::FORBIDDEN => Err(ScrapeError::Blocked),
            status => Err(ScrapeError::HttpError {
                code: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    /// Proxies an external image. Anything but a non-empty 200 gives the placeholder.
    pub async fn fetch_image(&self, url: &str) -> ProxiedImage {
        let response = match self
            .image_client
            .get(url)
            .header(header::REFERER, &self.referer)
            .header(header::ACCEPT, IMAGE_ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Image request for {} failed: {}", url, e);
                return ProxiedImage::placeholder();
            }
        };

        if response.status() != StatusCode::OK {
            warn!("Image request for {} returned {}", url, response.status());
            return ProxiedImage::placeholder();
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => ProxiedImage {
                bytes: bytes.to_vec(),
                content_type,
                found: true,
            },
            Ok(_) => ProxiedImage::placeholder(),
            Err(e) => {
                warn!("Reading image body for {} failed: {}", url, e);
                ProxiedImage::placeholder()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fetcher(cookie_jar: CookieJar) -> Fetcher {
        Fetcher::new(
            cookie_jar,
            "https://www.cardmarket.com",
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        init();
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let mock = server
            .mock("GET", "/en/Pokemon/Products/Singles/Base-Set/Pikachu")
            .match_header("user-agent", BROWSER_USER_AGENT)
            .match_header("referer", "https://www.cardmarket.com/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><h1>Pikachu</h1></html>")
            .create();

        let url = format!("{}/en/Pokemon/Products/Singles/Base-Set/Pikachu", server.url());
        let body = fetcher(CookieJar::in_memory()).fetch(&url).await.unwrap();

        mock.assert();
        assert_eq!(body, "<html><h1>Pikachu</h1></html>");
    }

    #[tokio::test]
    async fn test_fetch_403_is_blocked() {
        init();
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let mock = server
            .mock("GET", "/blocked")
            .with_status(403)
            .with_body("<html>Access denied</html>")
            .create();

        let result = fetcher(CookieJar::in_memory())
            .fetch(&format!("{}/blocked", server.url()))
            .await;

        mock.assert();
        assert!(matches!(result, Err(ScrapeError::Blocked)));
    }

    #[tokio::test]
    async fn test_fetch_other_status_is_http_error() {
        init();
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let _mock = server.mock("GET", "/broken").with_status(503).create();

        let result = fetcher(CookieJar::in_memory())
            .fetch(&format!("{}/broken", server.url()))
            .await;

        assert!(matches!(result, Err(ScrapeError::HttpError { code: 503, .. })));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_is_network_error() {
        init();
        let result = fetcher(CookieJar::in_memory())
            .fetch("http://127.0.0.1:1/unreachable")
            .await;

        assert!(matches!(result, Err(ScrapeError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_fetch_image_falls_back_to_placeholder() {
        init();
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let ok = server
            .mock("GET", "/img/pikachu.jpg")
            .match_header("referer", "https://www.cardmarket.com/")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .create();
        let _missing = server.mock("GET", "/img/missing.jpg").with_status(404).create();

        let fetcher = fetcher(CookieJar::in_memory());
        let image = fetcher
            .fetch_image(&format!("{}/img/pikachu.jpg", server.url()))
            .await;
        let missing = fetcher
            .fetch_image(&format!("{}/img/missing.jpg", server.url()))
            .await;

        ok.assert();
        assert!(image.found);
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(!missing.found);
        assert_eq!(missing.content_type, "image/png");
        assert_eq!(missing.bytes, PLACEHOLDER_PNG.to_vec());
    }

    #[test]
    fn test_cookie_jar_survives_persist_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let jar = CookieJar::load(&path);
        let url = url::Url::parse("https://www.cardmarket.com/en/Pokemon").unwrap();
        jar.store()
            .lock()
            .unwrap()
            .parse("PHPSESSID=abc123; Max-Age=3600; Path=/", &url)
            .unwrap();
        jar.persist().unwrap();

        let reloaded = CookieJar::load(&path);
        assert!(reloaded
            .store()
            .lock()
            .unwrap()
            .contains("www.cardmarket.com", "/", "PHPSESSID"));
    }

    #[tokio::test]
    async fn test_session_cookie_is_replayed_and_kept_across_runs() {
        init();
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let _first = server
            .mock("GET", "/first")
            .with_status(200)
            .with_header("set-cookie", "PHPSESSID=abc123; Path=/")
            .with_body("first")
            .create();
        let second = server
            .mock("GET", "/second")
            .match_header("cookie", "PHPSESSID=abc123")
            .with_status(200)
            .with_body("second")
            .create();
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let fetcher = fetcher(CookieJar::load(&path));
        fetcher.fetch(&format!("{}/first", server.url())).await.unwrap();
        let body = fetcher.fetch(&format!("{}/second", server.url())).await.unwrap();

        second.assert();
        assert_eq!(body, "second");

        let reloaded = CookieJar::load(&path);
        let store = reloaded.store();
        let store = store.lock().unwrap();
        let names: Vec<&str> = store.iter_any().map(|cookie| cookie.name()).collect();
        assert_eq!(names, vec!["PHPSESSID"]);
    }

    #[test]
    fn test_cookie_jar_ignores_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "this is not a cookie jar").unwrap();

        let jar = CookieJar::load(&path);
        assert_eq!(jar.store().lock().unwrap().iter_any().count(), 0);
    }
}
