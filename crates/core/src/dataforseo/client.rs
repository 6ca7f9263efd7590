//! Blocking HTTP client for the DataForSEO API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use url::Url;

use super::{INSTANT_PAGES_PATH, KeywordMetricsApi, SEARCH_VOLUME_PATH, SERP_ORGANIC_PATH, SerpApi};
use crate::config::ApiConfig;
use crate::credentials::Credential;
use crate::{Result, SeoGeoError};

const USER_AGENT: &str = concat!("seogeo/", env!("CARGO_PKG_VERSION"));

/// Authenticated DataForSEO client. One request at a time, no retries.
pub struct DataForSeoClient {
    http: Client,
    base_url: Url,
    login: String,
    password: String,
    timeout: u64,
    location_code: u32,
    language_code: String,
}

impl DataForSeoClient {
    /// Builds a client for `credential`, which must contain a `:`.
    pub fn new(credential: &Credential, config: &ApiConfig) -> Result<Self> {
        let (login, password) = credential.split().ok_or(SeoGeoError::InvalidCredential)?;
        let base_url = Url::parse(&config.base_url).map_err(|e| SeoGeoError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(USER_AGENT)
            .build()
            .map_err(SeoGeoError::HttpError)?;

        Ok(Self {
            http,
            base_url,
            login: login.to_string(),
            password: password.to_string(),
            timeout: config.timeout,
            location_code: config.location_code,
            language_code: config.language_code.clone(),
        })
    }

    /// POSTs `payload` to `path` and returns the decoded JSON envelope.
    pub fn post(&self, path: &str, payload: &Value) -> Result<Value> {
        let url = self.base_url.join(path).map_err(|e| SeoGeoError::InvalidUrl(e.to_string()))?;
        tracing::debug!(%url, "POST");

        let response = self
            .http
            .post(url)
            .basic_auth(&self.login, Some(&self.password))
            .json(payload)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        response
            .json::<Value>()
            .map_err(|e| if e.is_timeout() { self.transport_error(e) } else { SeoGeoError::MalformedResponse(e.to_string()) })
    }

    fn transport_error(&self, e: reqwest::Error) -> SeoGeoError {
        if e.is_timeout() {
            SeoGeoError::Timeout { timeout: self.timeout }
        } else if e.is_connect() {
            SeoGeoError::Connection(e.to_string())
        } else {
            SeoGeoError::HttpError(e)
        }
    }
}

/// Maps a non-success HTTP status onto the error taxonomy.
pub fn status_error(status: StatusCode) -> SeoGeoError {
    match status {
        StatusCode::UNAUTHORIZED => SeoGeoError::Unauthorized,
        StatusCode::PAYMENT_REQUIRED => SeoGeoError::PaymentRequired,
        StatusCode::TOO_MANY_REQUESTS => SeoGeoError::RateLimited,
        other => SeoGeoError::HttpStatus { status: other.as_u16() },
    }
}

impl KeywordMetricsApi for DataForSeoClient {
    fn search_volume(&self, keywords: &[String]) -> Result<Value> {
        let payload = json!([{
            "keywords": keywords,
            "location_code": self.location_code,
            "language_code": self.language_code,
        }]);
        self.post(SEARCH_VOLUME_PATH, &payload)
    }
}

impl SerpApi for DataForSeoClient {
    fn organic(&self, keyword: &str, location: &str, depth: usize) -> Result<Value> {
        let payload = json!([{
            "keyword": keyword,
            "location_name": location,
            "language_code": self.language_code,
            "device": "desktop",
            "os": "windows",
            "depth": depth,
        }]);
        self.post(SERP_ORGANIC_PATH, &payload)
    }

    fn instant_page(&self, url: &str) -> Result<Value> {
        let payload = json!([{
            "url": url,
            "enable_javascript": false,
            "load_resources": false,
            "enable_browser_rendering": false,
        }]);
        self.post(INSTANT_PAGES_PATH, &payload)
    }
}
