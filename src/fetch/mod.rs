mod pdf;

use std::{num::NonZeroU32, time::Duration};

use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::Client;
use tracing::{instrument, Level};
use url::Url;

pub use pdf::{PdfText, Pdftotext};

static DELAY_JITTER: u64 = 2;

/// Loads documents from the canteen sites.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch_text(&self, url: &Url) -> crate::Result<String>;
    async fn fetch_bytes(&self, url: &Url) -> crate::Result<Vec<u8>>;
}

/// Fetches over HTTP, never faster than the configured number of requests per second.
pub struct HttpFetcher {
    client: Client,
    limiter: DefaultDirectRateLimiter,
}

impl HttpFetcher {
    pub fn new(requests_per_second: NonZeroU32) -> crate::Result<Self> {
        let client = Client::builder().gzip(true).build()?;
        Ok(Self {
            client,
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
        })
    }

    async fn get(&self, url: &Url) -> crate::Result<reqwest::Response> {
        let retry_jitter = Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
        self.limiter.until_ready_with_jitter(retry_jitter).await;
        let start = std::time::Instant::now();
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        log::trace!("Got response from {url} in \t {:?}", start.elapsed());
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url), level = Level::TRACE)]
    async fn fetch_text(&self, url: &Url) -> crate::Result<String> {
        Ok(self.get(url).await?.text().await?)
    }

    #[instrument(skip(self), fields(url = %url), level = Level::TRACE)]
    async fn fetch_bytes(&self, url: &Url) -> crate::Result<Vec<u8>> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}

/// The last path segment of `url`, e.g. `KW_44_Herbst_4_Mensa_2018.pdf`.
pub fn file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
}

#[cfg(test)]
pub mod stub {
    use std::collections::HashMap;

    use url::Url;

    use super::{Fetcher, PdfText};
    use crate::Error;

    /// Serves fixed documents by URL. Unknown URLs fail like a missing page would.
    #[derive(Debug, Default)]
    pub struct StubFetcher {
        pages: HashMap<String, Vec<u8>>,
    }

    impl StubFetcher {
        #[must_use]
        pub fn with_page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch_text(&self, url: &Url) -> crate::Result<String> {
            let bytes = self.fetch_bytes(url).await?;
            String::from_utf8(bytes).map_err(|e| Error::config_error(e.to_string()))
        }

        async fn fetch_bytes(&self, url: &Url) -> crate::Result<Vec<u8>> {
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, url.as_str())))
        }
    }

    /// Treats the "PDF" bytes as the already extracted text.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct PlainText;

    impl PdfText for PlainText {
        async fn page_text(&self, pdf: &[u8], _first_page_only: bool) -> crate::Result<String> {
            Ok(String::from_utf8_lossy(pdf).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubFetcher;
    use super::*;

    #[test]
    fn test_file_name() {
        let url = Url::parse("https://www.sv.tum.de/fileadmin/Mensaplan/KW_44_Herbst_4_Mensa_2018.pdf").unwrap();
        assert_eq!(file_name(&url), "KW_44_Herbst_4_Mensa_2018.pdf");
        assert_eq!(file_name(&Url::parse("http://konradhof-catering.com/").unwrap()), "");
    }

    #[tokio::test]
    async fn test_stub_fetcher() {
        let fetcher = StubFetcher::default().with_page("http://example.org/a", "Speiseplan");
        let url = Url::parse("http://example.org/a").unwrap();
        assert_eq!(fetcher.fetch_text(&url).await.unwrap(), "Speiseplan");
        assert!(fetcher
            .fetch_bytes(&Url::parse("http://example.org/b").unwrap())
            .await
            .is_err());
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(NonZeroU32::MIN).is_ok());
    }
}
