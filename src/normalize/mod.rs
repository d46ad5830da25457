//! Content normalizers.
//!
//! A normalizer maps one [`RawDocument`] into an [`Envelope`]. The Yahoo
//! normalizer infers structure from scraped markup; the Oxford normalizer
//! reshapes an API payload that is already entry-shaped.
//!
//! Structural problems are tracked as [`ParseFault`]s internally and reported
//! to callers only as [`DictError::NotFound`].

pub mod oxford;
pub mod yahoo;

use thiserror::Error;
use tracing::debug;

use crate::entry::Envelope;
use crate::error::DictError;
use crate::models::{Provider, RawDocument};

/// Normalize a raw document fetched from `provider` for `word`.
pub fn normalize(word: &str, provider: Provider, raw: RawDocument) -> Result<Envelope, DictError> {
    match (provider, raw) {
        (Provider::Yahoo, RawDocument::Markup(html)) => yahoo::normalize(word, &html),
        (Provider::Oxford, RawDocument::Structured(value)) => oxford::normalize(word, value),
        (provider, _) => Err(ParseFault::DocumentKind(provider).into_not_found(word)),
    }
}

/// A structural fault found while normalizing.
#[derive(Debug, Error)]
pub enum ParseFault {
    #[error("region `{0}` not found")]
    MissingRegion(&'static str),
    #[error("summary block has {0} children")]
    SummaryShape(usize),
    #[error("malformed pronunciation token `{0}`")]
    Pronunciation(String),
    #[error("explanation list has no items")]
    EmptyExplanation,
    #[error("invalid selector `{0}`")]
    Selector(&'static str),
    #[error("payload does not match the entry schema: {0}")]
    Payload(String),
    #[error("provider {0} cannot normalize this document kind")]
    DocumentKind(Provider),
}

impl ParseFault {
    pub(crate) fn into_not_found(self, word: &str) -> DictError {
        debug!(word, fault = %self, "normalization failed");
        DictError::NotFound(word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_document_kind_is_not_found() {
        let err = normalize("search", Provider::Oxford, RawDocument::Markup("<html/>".into()))
            .unwrap_err();
        assert_eq!(err, DictError::NotFound("search".into()));

        let err = normalize(
            "search",
            Provider::Yahoo,
            RawDocument::Structured(serde_json::json!({})),
        )
        .unwrap_err();
        assert_eq!(err, DictError::NotFound("search".into()));
    }
}
