//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default placeholder shown when an item has no usable image
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x600/f8e1e7/8a5a6b?text=Handmade";

/// Image hosts that no longer serve the catalog's files
pub const DEPRECATED_IMAGE_HOSTS: &[&str] = &["ibb.co", "imgbb", "pyramid"];

/// Default remote table name
pub const DEFAULT_TABLE: &str = "craft_items";

/// Retry behaviour for the initial catalog fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 8,
            retry_delay: Duration::from_millis(3500),
        }
    }
}

/// Data repair applied to every ingested row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairPolicy {
    /// Substitute for missing or dead images
    pub placeholder_image: String,
    /// Lowercase substrings marking a dead image URI
    pub deprecated_hosts: Vec<String>,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            deprecated_hosts: DEPRECATED_IMAGE_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

/// Client configuration for connecting to the catalog store
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g., "https://project.supabase.co")
    pub store_url: String,

    /// Store API key, sent as `apikey` and bearer token
    pub api_key: Option<String>,

    /// Remote table holding the catalog
    pub table: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Catalog fetch retry policy
    pub retry: RetryPolicy,

    /// Ingestion data repair
    pub repair: RepairPolicy,

    /// Shared secret unlocking admin mode
    pub admin_secret: Option<String>,

    /// Preference file (wishlist)
    pub prefs_path: PathBuf,
}

impl ClientConfig {
    /// Create a new configuration for the given store
    pub fn new(store_url: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            timeout: 30,
            retry: RetryPolicy::default(),
            repair: RepairPolicy::default(),
            admin_secret: None,
            prefs_path: PathBuf::from("./data/preferences.json"),
        }
    }

    /// Load configuration from environment variables (after `.env`)
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();

        let store_url = std::env::var("CATALOG_STORE_URL").unwrap_or_else(|_| {
            tracing::debug!("CATALOG_STORE_URL not set, using development default");
            "http://127.0.0.1:54321".to_string()
        });

        let mut config = Self::new(store_url);
        config.api_key = std::env::var("CATALOG_STORE_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        if let Ok(table) = std::env::var("CATALOG_TABLE")
            && !table.is_empty()
        {
            config.table = table;
        }
        config.timeout = env_parse("CATALOG_TIMEOUT_SECS").unwrap_or(config.timeout);
        config.retry.max_retries =
            env_parse("CATALOG_MAX_RETRIES").unwrap_or(config.retry.max_retries);
        if let Some(ms) = env_parse::<u64>("CATALOG_RETRY_DELAY_MS") {
            config.retry.retry_delay = Duration::from_millis(ms);
        }
        if let Ok(placeholder) = std::env::var("CATALOG_PLACEHOLDER_IMAGE")
            && !placeholder.is_empty()
        {
            config.repair.placeholder_image = placeholder;
        }
        config.admin_secret = std::env::var("ADMIN_SECRET").ok().filter(|s| !s.is_empty());
        if let Ok(path) = std::env::var("PREFS_PATH") {
            config.prefs_path = PathBuf::from(path);
        }
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the remote table
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the placeholder image
    pub fn with_placeholder(mut self, uri: impl Into<String>) -> Self {
        self.repair.placeholder_image = uri.into();
        self
    }

    /// Set the admin secret
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    /// Set the preference file path
    pub fn with_prefs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefs_path = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:54321")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
