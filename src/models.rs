//! Core data models shared by sources, the cache, and the renderer.
//!
//! A [`RawDocument`] is what a source hands back for one lookup. After
//! normalization the result is wrapped in a [`Record`], the unit that is
//! cached and later rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entry::Envelope;

/// A dictionary provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Yahoo,
    Oxford,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Yahoo, Provider::Oxford];

    /// Stable identifier, used in config files and the cache.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Yahoo => "yahoo",
            Provider::Oxford => "oxford",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Provider::Yahoo => "Yahoo Dictionary",
            Provider::Oxford => "Oxford Dictionary",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown dictionary '{}'. Must be one of: {}",
                    s,
                    Provider::ALL.map(|p| p.id()).join(", ")
                )
            })
    }
}

/// Raw document produced by a source before normalization.
#[derive(Debug, Clone)]
pub enum RawDocument {
    /// Scraped page markup.
    Markup(String),
    /// An API payload that is already entry-shaped.
    Structured(serde_json::Value),
}

/// A normalized lookup result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub word: String,
    /// Serialized [`Envelope`].
    pub content: String,
    pub source: Provider,
}

impl Record {
    pub fn new(word: &str, envelope: &Envelope, source: Provider) -> serde_json::Result<Self> {
        Ok(Self {
            word: word.to_string(),
            content: serde_json::to_string(envelope)?,
            source,
        })
    }

    /// Deserialize a fresh copy of the stored envelope.
    pub fn envelope(&self) -> serde_json::Result<Envelope> {
        serde_json::from_str(&self.content)
    }
}
