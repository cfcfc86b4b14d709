use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Naver client id.
pub const CLIENT_ID_ENV: &str = "NAVER_CLIENT_ID";
/// Environment variable holding the Naver client secret.
pub const CLIENT_SECRET_ENV: &str = "NAVER_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub naver: NaverConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Fill empty credentials from `NAVER_CLIENT_ID` / `NAVER_CLIENT_SECRET`.
    ///
    /// Values present in the configuration file win over the environment.
    pub fn fill_credentials_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.naver.client_id.is_empty() {
            if let Some(id) = lookup(CLIENT_ID_ENV) {
                self.naver.client_id = id;
            }
        }
        if self.naver.client_secret.is_empty() {
            if let Some(secret) = lookup(CLIENT_SECRET_ENV) {
                self.naver.client_secret = secret;
            }
        }
        self
    }
}

/// Naver shopping search API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NaverConfig {
    /// Search endpoint URL
    #[serde(default = "default_naver_url")]
    pub url: String,
    /// Value of the `X-Naver-Client-Id` header
    #[serde(default)]
    pub client_id: String,
    /// Value of the `X-Naver-Client-Secret` header
    #[serde(default)]
    pub client_secret: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl NaverConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            url: default_naver_url(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_naver_url() -> String {
    "https://openapi.naver.com/v1/search/shop.json".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Pagination and pacing of search calls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Results requested per page (API maximum: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Fixed delay between consecutive search calls
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Results collected per brand (Track A) and per price band (Track B)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            max_results: default_max_results(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_max_results() -> u32 {
    100
}

/// Query vocabulary used by the collection tracks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    /// Word appended to brand names to form food queries
    #[serde(default = "default_food_word")]
    pub food_word: String,
    /// Generic category query (Track B and general-name brands)
    #[serde(default = "default_category_query")]
    pub category_query: String,
    /// Marker looked for in category levels by the category filter
    #[serde(default = "default_food_word")]
    pub food_marker: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            food_word: default_food_word(),
            category_query: default_category_query(),
            food_marker: default_food_word(),
        }
    }
}

fn default_food_word() -> String {
    "사료".to_string()
}

fn default_category_query() -> String {
    "고양이 사료".to_string()
}

/// Brand dictionary file location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DictionaryConfig {
    #[serde(default = "default_dictionary_path")]
    pub path: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: default_dictionary_path(),
        }
    }
}

fn default_dictionary_path() -> PathBuf {
    PathBuf::from("brands.json")
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cat_data.db")
}

/// Sanitized config for printing (credentials redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub naver: SanitizedNaverConfig,
    pub fetch: FetchConfig,
    pub collector: CollectorConfig,
    pub dictionary: DictionaryConfig,
    pub database: DatabaseConfig,
}

/// Sanitized Naver config (credentials hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNaverConfig {
    pub url: String,
    pub client_id_configured: bool,
    pub client_secret_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            naver: SanitizedNaverConfig {
                url: config.naver.url.clone(),
                client_id_configured: !config.naver.client_id.is_empty(),
                client_secret_configured: !config.naver.client_secret.is_empty(),
                timeout_secs: config.naver.timeout_secs,
            },
            fetch: config.fetch.clone(),
            collector: config.collector.clone(),
            dictionary: config.dictionary.clone(),
            database: config.database.clone(),
        }
    }
}
