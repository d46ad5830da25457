//! Source adapters: fetch one raw document per lookup.
//!
//! Each provider implements [`Source`]. Adapters only move bytes; all
//! structural interpretation happens in [`normalize`](crate::normalize).
//!
//! | Provider | Document | Not-found signal |
//! |----------|----------|------------------|
//! | Yahoo | page markup | none (detected by the normalizer) |
//! | Oxford | JSON payload | none (every query failure is reported as not found) |

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{Config, OxfordConfig};
use crate::error::DictError;
use crate::models::{Provider, RawDocument};

/// Fetches raw documents from one dictionary provider.
#[async_trait]
pub trait Source: Send + Sync {
    fn provider(&self) -> Provider;

    /// Fetch the raw document for `word`.
    ///
    /// Fails with [`DictError::QueryFailure`] on transport or upstream
    /// errors, and with [`DictError::NotFound`] when the provider reports
    /// that the word does not exist.
    async fn fetch(&self, word: &str) -> Result<RawDocument, DictError>;
}

/// Build the adapter for `provider` from configuration.
pub fn create_source(provider: Provider, config: &Config) -> Result<Box<dyn Source>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .user_agent(config.http.user_agent.clone())
        .build()?;

    Ok(match provider {
        Provider::Yahoo => Box::new(YahooSource {
            client,
            base_url: config.providers.yahoo.base_url.clone(),
        }),
        Provider::Oxford => Box::new(OxfordSource {
            client,
            config: config.providers.oxford.clone(),
        }),
    })
}

fn query_failure(word: &str, provider: Provider, reason: impl std::fmt::Display) -> DictError {
    warn!(%provider, word, %reason, "query failed");
    DictError::QueryFailure(word.to_string())
}

/// Scrapes the Yahoo dictionary result page.
pub struct YahooSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooSource {
    fn url(&self) -> String {
        format!("{}/dictionary", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Source for YahooSource {
    fn provider(&self) -> Provider {
        Provider::Yahoo
    }

    async fn fetch(&self, word: &str) -> Result<RawDocument, DictError> {
        let url = self.url();
        debug!(%url, word, "fetching page");

        let response = self
            .client
            .get(&url)
            .query(&[("p", word)])
            .send()
            .await
            .map_err(|e| query_failure(word, Provider::Yahoo, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(query_failure(word, Provider::Yahoo, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| query_failure(word, Provider::Yahoo, e))?;
        Ok(RawDocument::Markup(body))
    }
}

/// Calls the Oxford Dictionaries entries API.
pub struct OxfordSource {
    client: reqwest::Client,
    config: OxfordConfig,
}

impl OxfordSource {
    fn url(&self, word: &str) -> String {
        format!(
            "{}/entries/en/{}",
            self.config.base_url.trim_end_matches('/'),
            word.to_lowercase()
        )
    }

    async fn query(&self, word: &str, app_id: &str, app_key: &str) -> Result<RawDocument, DictError> {
        let url = self.url(word);
        debug!(%url, word, "fetching entry");

        let response = self
            .client
            .get(&url)
            .header("app_id", app_id)
            .header("app_key", app_key)
            .send()
            .await
            .map_err(|e| query_failure(word, Provider::Oxford, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(query_failure(word, Provider::Oxford, status));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| query_failure(word, Provider::Oxford, e))?;
        Ok(RawDocument::Structured(payload))
    }
}

#[async_trait]
impl Source for OxfordSource {
    fn provider(&self) -> Provider {
        Provider::Oxford
    }

    async fn fetch(&self, word: &str) -> Result<RawDocument, DictError> {
        let (Some(app_id), Some(app_key)) = (&self.config.app_id, &self.config.app_key) else {
            return Err(query_failure(
                word,
                Provider::Oxford,
                "providers.oxford.app_id and app_key are not configured",
            ));
        };

        // The API answers unknown words with a plain HTTP error.
        self.query(word, app_id, app_key)
            .await
            .map_err(|e| match e {
                DictError::QueryFailure(word) => DictError::NotFound(word),
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yahoo_url_trims_trailing_slash() {
        let mut config = Config::default();
        config.providers.yahoo.base_url = "https://dict.example/".into();
        let source = YahooSource {
            client: reqwest::Client::new(),
            base_url: config.providers.yahoo.base_url,
        };
        assert_eq!(source.url(), "https://dict.example/dictionary");
    }

    #[test]
    fn oxford_url_lowercases_word() {
        let source = OxfordSource {
            client: reqwest::Client::new(),
            config: OxfordConfig::default(),
        };
        assert_eq!(
            source.url("Search"),
            "https://od-api.oxforddictionaries.com/api/v1/entries/en/search"
        );
    }

    #[tokio::test]
    async fn oxford_without_credentials_fails_query() {
        let source = create_source(Provider::Oxford, &Config::default()).unwrap();
        assert_eq!(source.provider(), Provider::Oxford);
        let err = source.fetch("search").await.unwrap_err();
        assert_eq!(err, DictError::QueryFailure("search".into()));
    }

    #[tokio::test]
    async fn unreachable_yahoo_is_query_failure() {
        let mut config = Config::default();
        config.http.timeout_secs = 1;
        config.providers.yahoo.base_url = "http://127.0.0.1:9".into();
        let source = create_source(Provider::Yahoo, &config).unwrap();
        let err = source.fetch("search").await.unwrap_err();
        assert_eq!(err, DictError::QueryFailure("search".into()));
    }
}
