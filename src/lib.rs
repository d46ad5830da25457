//! # termdict
//!
//! Look up words in online dictionaries and render formatted definitions in
//! the terminal.
//!
//! Every provider's raw document, whether scraped page markup or a
//! structured API payload, is normalized into one versioned entry model and
//! rendered by one deterministic renderer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐
//! │  Source  │──▶│ Normalizer │──▶│ Envelope │──▶│ Renderer │──▶│ Presenter │
//! │Yahoo/Oxf.│   │ markup/API │   │ (Record) │   │  Emit[]  │   │ terminal  │
//! └──────────┘   └────────────┘   └────┬─────┘   └──────────┘   └───────────┘
//!                                      ▼
//!                                 ┌──────────┐
//!                                 │  SQLite  │
//!                                 │  cache   │
//!                                 └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tdict init                        # create the lookup cache
//! tdict lookup search               # Yahoo (default)
//! tdict lookup search --dict oxford # Oxford API (needs credentials)
//! tdict dicts                       # list providers
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Lookup error kinds (`NotFound`, `QueryFailure`) |
//! | [`models`] | Providers, raw documents, records |
//! | [`entry`] | Versioned entry model and its JSON shape |
//! | [`normalize`] | Provider-specific normalizers |
//! | [`render`] | Entry → styled text operations |
//! | [`present`] | Terminal and plain presenters |
//! | [`source`] | HTTP source adapters |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Cache schema migrations |
//! | [`cache`] | SQLite record cache |
//! | [`lookup`] | End-to-end lookup orchestration |
//! | [`dicts`] | Provider status listing |

pub mod cache;
pub mod config;
pub mod db;
pub mod dicts;
pub mod entry;
pub mod error;
pub mod lookup;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod present;
pub mod render;
pub mod source;
