use crate::config::Config;
use crate::prelude::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use zotproxy_core::collection::{parse_collections, Collection};

/// Page size for the collections listing; the whole group is read in one page
pub const COLLECTIONS_LIMIT: &str = "1000";

/// Page size for the items of a single collection
pub const ITEMS_LIMIT: &str = "150";

pub const API_VERSION: &str = "3";

pub const BIB_FORMAT: &str = "biblatex";

const API_KEY_HEADER: &str = "zotero-api-key";

/// Thin client over the group-scoped endpoints of the Zotero web API
#[derive(Debug, Clone)]
pub struct ZoteroClient {
    http: reqwest::Client,
    base_url: String,
    group: String,
}

impl ZoteroClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(api_key)
                .map_err(|e| eyre!("Invalid Zotero API key: {}", e))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("zotproxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            group: config.group.clone(),
        })
    }

    fn group_url(&self) -> String {
        format!(
            "{}/groups/{}",
            self.base_url,
            urlencoding::encode(&self.group)
        )
    }

    pub fn collections_url(&self) -> String {
        format!("{}/collections", self.group_url())
    }

    pub fn items_url(&self, key: &str) -> String {
        format!(
            "{}/collections/{}/items",
            self.group_url(),
            urlencoding::encode(key)
        )
    }

    /// GET `url` and return the body of a successful response
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> ApiResult<String> {
        log::debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("{url} returned HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read body from {url}: {e}")))
    }

    /// Fetch every collection in the group as a flat list
    pub async fn fetch_all_collections(&self) -> ApiResult<Vec<Collection>> {
        let url = self.collections_url();
        let body = self.get_text(&url, &[("limit", COLLECTIONS_LIMIT)]).await?;

        let collections = parse_collections(&body)
            .map_err(|e| Error::Parse(format!("Invalid collections payload: {e}")))?;

        log::debug!("Fetched {} collections", collections.len());
        Ok(collections)
    }

    /// Fetch the item records filed directly in one collection
    pub async fn fetch_items(&self, key: &str) -> ApiResult<Vec<serde_json::Value>> {
        let url = self.items_url(key);
        let body = self
            .get_text(&url, &[("limit", ITEMS_LIMIT), ("v", API_VERSION)])
            .await?;

        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Invalid items payload for {key}: {e}")))
    }

    /// Fetch the biblatex export of the items filed directly in one collection
    pub async fn fetch_bib(&self, key: &str) -> ApiResult<String> {
        let url = self.items_url(key);
        self.get_text(
            &url,
            &[
                ("format", BIB_FORMAT),
                ("limit", ITEMS_LIMIT),
                ("v", API_VERSION),
            ],
        )
        .await
    }
}
