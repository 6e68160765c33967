use std::time::Duration;

/// Group library queried when none is configured
pub const DEFAULT_GROUP: &str = "2721722";

/// Public Zotero web API
pub const DEFAULT_BASE_URL: &str = "https://api.zotero.org";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream settings shared by the server and the CLI
#[derive(Debug, Clone)]
pub struct Config {
    pub group: String,
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-collection requests in flight during aggregation, at least 1
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Config {
    pub fn new(group: &str, base_url: &str) -> Self {
        Self {
            group: group.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            concurrency: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP, DEFAULT_BASE_URL)
    }
}

impl From<&crate::Global> for Config {
    fn from(global: &crate::Global) -> Self {
        Config::new(&global.group, &global.base_url)
            .with_api_key(global.api_key.clone())
            .with_concurrency(global.concurrency)
            .with_timeout(Duration::from_secs(global.timeout_secs))
    }
}
