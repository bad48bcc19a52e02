use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use super::{LoadOutcome, ObjectLoader};

/// Loader fetching objects from an HTTP object gateway
///
/// Objects are read with a blocking `GET {base_url}/{bucket}/{key}`:
///
/// - `200` → [`LoadOutcome::Found`]
/// - `404` → [`LoadOutcome::NotFound`]
/// - any other status, timeout or transport error → [`LoadOutcome::Failed`]
///
/// One client is built per loader and shared by every fetch. The fetch blocks
/// the calling worker thread for at most the configured timeout.
///
/// # Usage
///
/// ```rust
/// use edge_preflight::loader::HttpLoader;
///
/// let loader = HttpLoader::new("https://objects.example.com/buckets/")
///     .unwrap()
///     .timeout_ms(2000);
/// ```
#[derive(Debug, Clone)]
pub struct HttpLoader {
    base_url: Url,
    timeout_ms: u64,
    client: reqwest::blocking::Client,
}

impl HttpLoader {
    /// Create a loader rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL that can carry a
    /// path (e.g. `mailto:` or `data:` URLs), or if the HTTP client cannot be
    /// initialized.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            base_url,
            timeout_ms: 5000,
            client,
        })
    }

    /// Configure the request timeout in milliseconds
    ///
    /// Default: 5000ms
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    fn object_url(&self, bucket: &str, key: &str) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(bucket)
            .extend(key.trim_start_matches('/').split('/'));
        Some(url)
    }
}

impl ObjectLoader for HttpLoader {
    fn load(&self, bucket: &str, key: &str) -> LoadOutcome {
        let Some(url) = self.object_url(bucket, key) else {
            return LoadOutcome::failed(format!("invalid object url for {}/{}", bucket, key));
        };
        debug!(url = %url, "Fetching object");
        let response = match self
            .client
            .get(url.clone())
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %url, error = %e, "Object fetch failed");
                return LoadOutcome::failed(e.to_string());
            }
        };

        match response.status() {
            reqwest::StatusCode::OK => match response.bytes() {
                Ok(body) => LoadOutcome::Found(body.to_vec()),
                Err(e) => LoadOutcome::failed(e.to_string()),
            },
            reqwest::StatusCode::NOT_FOUND => LoadOutcome::NotFound,
            status => {
                warn!(url = %url, status = status.as_u16(), "Unexpected object gateway status");
                LoadOutcome::failed(format!("unexpected status {} from {}", status.as_u16(), url))
            }
        }
    }
}
