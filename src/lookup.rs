//! Lookup orchestration: cache → fetch → normalize → record → render.
//!
//! Used by `tdict lookup`. Each `(word, provider)` pair is one atomic unit:
//! a failure for one pair is reported and the remaining pairs still run.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cache::RecordCache;
use crate::config::Config;
use crate::error::DictError;
use crate::models::{Provider, Record};
use crate::normalize::normalize;
use crate::present::{ColorMode, Presenter};
use crate::render::{render, Emit, LineEnd, RenderOptions, Style};
use crate::source::{create_source, Source};

/// Look up `word` with one source, consulting the cache first.
///
/// Lookup failures are returned as a [`DictError`] inside the `anyhow`
/// error; anything else is a cache or serialization failure.
pub async fn lookup(word: &str, source: &dyn Source, cache: Option<&RecordCache>) -> Result<Record> {
    let provider = source.provider();

    if let Some(cache) = cache {
        if let Some(record) = cache.load(word, provider).await? {
            match record.envelope() {
                Ok(_) => {
                    debug!(word, %provider, "cache hit");
                    return Ok(record);
                }
                Err(e) => {
                    warn!(word, %provider, error = %e, "discarding undecodable cached record")
                }
            }
        }
    }

    let raw = source.fetch(word).await?;
    let envelope = normalize(word, provider, raw)?;
    let record = Record::new(word, &envelope, provider)?;

    if let Some(cache) = cache {
        cache.store(&record).await?;
    }
    Ok(record)
}

/// Options for a `tdict lookup` run.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub providers: Vec<Provider>,
    pub use_cache: bool,
    pub verbose: bool,
    pub color: ColorMode,
}

/// Outcome counts of a lookup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupReport {
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// CLI entry point: look up every word with every provider and print it.
pub async fn run_lookup(
    config: &Config,
    words: &[String],
    options: &LookupOptions,
) -> Result<LookupReport> {
    let cache = if options.use_cache && config.cache.enabled {
        Some(RecordCache::open(&config.cache).await?)
    } else {
        None
    };

    let sources = options
        .providers
        .iter()
        .map(|p| create_source(*p, config))
        .collect::<Result<Vec<_>>>()?;

    let mut presenter = options.color.stdout_presenter();
    let render_options = RenderOptions {
        verbose: options.verbose,
    };
    let mut report = LookupReport::default();

    for word in words {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        for source in &sources {
            let provider = source.provider();
            if sources.len() > 1 {
                presenter.emit(&provider_header(provider))?;
            }

            let record = match lookup(word, source.as_ref(), cache.as_ref()).await {
                Ok(record) => record,
                Err(e) => match e.downcast_ref::<DictError>() {
                    Some(DictError::NotFound(_)) => {
                        eprintln!("[{}] \"{}\" not found!", provider, word);
                        report.not_found += 1;
                        continue;
                    }
                    Some(DictError::QueryFailure(_)) => {
                        eprintln!("[{}] query for \"{}\" failed", provider, word);
                        report.failed += 1;
                        continue;
                    }
                    None => return Err(e),
                },
            };

            let envelope = record.envelope()?;
            let ops = render(&record.word, &envelope, &render_options);
            presenter.present_all(&ops)?;
            report.found += 1;
        }
    }
    presenter.flush()?;

    if let Some(cache) = cache {
        cache.close().await;
    }

    info!(
        found = report.found,
        not_found = report.not_found,
        failed = report.failed,
        "lookup finished"
    );
    Ok(report)
}

fn provider_header(provider: Provider) -> Emit {
    Emit {
        text: format!("[{}]", provider.title()),
        style: Style::Label,
        indent: 0,
        end: LineEnd::Newline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDocument;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedSource {
        provider: Provider,
        result: Result<RawDocument, DictError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Source for FixedSource {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn fetch(&self, _word: &str) -> Result<RawDocument, DictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn oxford_source(result: Result<RawDocument, DictError>) -> FixedSource {
        FixedSource {
            provider: Provider::Oxford,
            result,
            calls: AtomicUsize::new(0),
        }
    }

    fn payload() -> RawDocument {
        RawDocument::Structured(serde_json::json!({
            "results": [{"lexicalEntries": [{
                "lexicalCategory": "Verb",
                "entries": [{"senses": [{"definitions": ["look for"]}]}]
            }]}]
        }))
    }

    async fn open_cache(dir: &TempDir) -> RecordCache {
        let config = crate::config::CacheConfig {
            enabled: true,
            path: dir.path().join("tdict.sqlite"),
        };
        RecordCache::open(&config).await.unwrap()
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir).await;
        let source = oxford_source(Ok(payload()));

        let first = lookup("search", &source, Some(&cache)).await.unwrap();
        let second = lookup("search", &source, Some(&cache)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.envelope().unwrap().version(), 2);
    }

    #[tokio::test]
    async fn undecodable_cache_entry_is_refetched() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir).await;
        cache
            .store(&Record {
                word: "search".into(),
                content: "not json".into(),
                source: Provider::Oxford,
            })
            .await
            .unwrap();
        let source = oxford_source(Ok(payload()));

        let record = lookup("search", &source, Some(&cache)).await.unwrap();
        assert!(record.envelope().is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_surface_as_dict_errors() {
        let source = oxford_source(Err(DictError::QueryFailure("search".into())));
        let err = lookup("search", &source, None).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<DictError>(),
            Some(&DictError::QueryFailure("search".into()))
        );

        let source = oxford_source(Ok(RawDocument::Markup("<html/>".into())));
        let err = lookup("search", &source, None).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<DictError>(),
            Some(&DictError::NotFound("search".into()))
        );
    }
}
