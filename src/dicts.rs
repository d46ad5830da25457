//! Dictionary provider listing.
//!
//! Reports which providers exist and whether they are ready to query. Used
//! by the `tdict dicts` command.
//!
//! | Provider | Ready When |
//! |----------|------------|
//! | `yahoo` | Always (public page) |
//! | `oxford` | `app_id` and `app_key` are set under `[providers.oxford]` |

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::models::Provider;

/// Configuration status of one provider.
#[derive(Debug, Clone, Serialize)]
pub struct DictStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub configured: bool,
    /// Whether the provider is queried when no `--dict` is given.
    pub default: bool,
    pub notes: Option<String>,
}

pub fn get_dicts(config: &Config) -> Result<Vec<DictStatus>> {
    let defaults = config.default_providers()?;
    Ok(Provider::ALL
        .into_iter()
        .map(|provider| {
            let configured = config.is_configured(provider);
            let notes = match provider {
                Provider::Yahoo => Some(config.providers.yahoo.base_url.clone()),
                Provider::Oxford if !configured => {
                    Some("set providers.oxford.app_id and app_key".to_string())
                }
                Provider::Oxford => Some(config.providers.oxford.base_url.clone()),
            };
            DictStatus {
                id: provider.id(),
                title: provider.title(),
                configured,
                default: defaults.contains(&provider),
                notes,
            }
        })
        .collect())
}

/// CLI entry point: print one row per provider.
pub fn list_dicts(config: &Config) -> Result<()> {
    println!("{:<8} {:<20} {:<11} {:<8} NOTES", "ID", "TITLE", "CONFIGURED", "DEFAULT");
    for dict in get_dicts(config)? {
        println!(
            "{:<8} {:<20} {:<11} {:<8} {}",
            dict.id,
            dict.title,
            dict.configured,
            dict.default,
            dict.notes.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mark_yahoo_only() {
        let dicts = get_dicts(&Config::default()).unwrap();
        assert_eq!(dicts.len(), 2);
        assert!(dicts[0].configured && dicts[0].default);
        assert!(!dicts[1].configured && !dicts[1].default);
        assert!(dicts[1].notes.as_deref().unwrap().contains("app_key"));
    }

    #[test]
    fn credentials_configure_oxford() {
        let mut config = Config::default();
        config.providers.oxford.app_id = Some("id".into());
        config.providers.oxford.app_key = Some("key".into());
        let dicts = get_dicts(&config).unwrap();
        assert!(dicts[1].configured);
    }
}
