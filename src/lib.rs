pub mod dump;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod load;
pub mod logging;
pub mod query;

pub use error::{Error, Result};
pub use fetch::{dump_core, FetchConfig, FetchSummary, Fetcher, PageSource};
pub use load::{FailurePolicy, LoadConfig, LoadSummary, Loader};
pub use query::{PageRequest, PageResponse, CURSOR_START};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// Solr server used when `--solr` is not given
pub const DEFAULT_SOLR_URL: &str = "http://localhost:9983";

pub struct SolrClient {
    pub url: String,
    pub client: reqwest::Client,
}

impl SolrClient {
    pub fn new(url: &str) -> SolrClient {
        SolrClient {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// GET one page from `{url}/solr/{core}/select`
    pub async fn select_page(&self, request: &PageRequest) -> Result<PageResponse> {
        let url = format!("{}{}", self.url, request.path_and_query());
        debug!(%url, "select");
        let res = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?;
        let body = res.bytes().await?;
        Ok(PageResponse::from_json(&body)?)
    }

    /// POST a JSON array of documents to `{url}/solr/{core}/update` without committing
    pub async fn update(&self, core: &str, body: Vec<u8>) -> Result<()> {
        let url = format!("{}/solr/{}/update?commit=false", self.url, core);
        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(Error::UpdateRejected { status, body })
        }
    }
}

#[async_trait]
impl PageSource for SolrClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse> {
        self.select_page(request).await
    }
}
