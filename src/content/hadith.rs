//! Hadith collection adapter.
//!
//! Wraps a Sunnah.com-shaped API behind the usual cache-then-fallback
//! pattern. Without an API key (or a network) the static collection list and
//! the bundled hadith set serve everything.

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::cache::TtlCache;
use crate::net::{with_retry, DataSource};

const HADITH_API_BASE: &str = "https://api.sunnah.com/v1";
const API_KEY_ENV: &str = "RAFIQ_SUNNAH_API_KEY";
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const FETCH_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HadithCollection {
    pub name: String,
    pub title: String,
    pub total_hadith: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsResponse {
    pub collections: Vec<HadithCollection>,
    pub source: DataSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hadith {
    pub collection: &'static str,
    pub reference: &'static str,
    pub narrator: &'static str,
    pub text: &'static str,
}

fn fallback_collections() -> Vec<HadithCollection> {
    let make = |name: &str, title: &str, total_hadith: u32| HadithCollection {
        name: name.to_string(),
        title: title.to_string(),
        total_hadith,
    };
    vec![
        make("bukhari", "Sahih al-Bukhari", 7563),
        make("muslim", "Sahih Muslim", 7470),
        make("abudawud", "Sunan Abi Dawud", 5274),
        make("tirmidhi", "Jami` at-Tirmidhi", 3956),
        make("nasai", "Sunan an-Nasa'i", 5758),
        make("ibnmajah", "Sunan Ibn Majah", 4341),
    ]
}

/// Bundled set used for the daily pick and as offline sample content.
const BUNDLED_HADITH: &[Hadith] = &[
    Hadith {
        collection: "bukhari",
        reference: "Bukhari 1",
        narrator: "Umar ibn al-Khattab",
        text: "Actions are but by intentions, and every man shall have only that which he intended.",
    },
    Hadith {
        collection: "bukhari",
        reference: "Bukhari 6018",
        narrator: "Abu Hurairah",
        text: "Whoever believes in Allah and the Last Day, let him speak good or remain silent.",
    },
    Hadith {
        collection: "muslim",
        reference: "Muslim 2699",
        narrator: "Abu Hurairah",
        text: "Whoever relieves a believer of a hardship of this world, Allah will relieve him of a hardship of the Day of Resurrection.",
    },
    Hadith {
        collection: "muslim",
        reference: "Muslim 91",
        narrator: "Abdullah ibn Mas'ud",
        text: "No one who has an atom's weight of pride in his heart will enter Paradise.",
    },
    Hadith {
        collection: "tirmidhi",
        reference: "Tirmidhi 2516",
        narrator: "Ibn Abbas",
        text: "Be mindful of Allah and He will protect you. Be mindful of Allah and you will find Him before you.",
    },
    Hadith {
        collection: "bukhari",
        reference: "Bukhari 5027",
        narrator: "Uthman ibn Affan",
        text: "The best of you are those who learn the Quran and teach it.",
    },
    Hadith {
        collection: "muslim",
        reference: "Muslim 2564",
        narrator: "Abu Hurairah",
        text: "Allah does not look at your bodies or your forms, but He looks at your hearts and your deeds.",
    },
];

/// Deterministic rotation through the bundled set.
pub fn daily_hadith() -> &'static Hadith {
    let day = Local::now().ordinal0() as usize;
    &BUNDLED_HADITH[day % BUNDLED_HADITH.len()]
}

pub fn bundled() -> &'static [Hadith] {
    BUNDLED_HADITH
}

#[derive(Deserialize)]
struct ApiCollectionsResponse {
    data: Vec<ApiCollection>,
}

#[derive(Deserialize)]
struct ApiCollection {
    name: String,
    #[serde(rename = "totalHadith")]
    total_hadith: Option<u32>,
    collection: Vec<ApiCollectionTitle>,
}

#[derive(Deserialize)]
struct ApiCollectionTitle {
    lang: String,
    title: String,
}

pub struct HadithClient {
    http: reqwest::Client,
    base: String,
    api_key: Option<String>,
    cache: Mutex<TtlCache<String, Vec<HadithCollection>>>,
}

impl Default for HadithClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HadithClient {
    pub fn new() -> Self {
        Self::with_base_url(HADITH_API_BASE)
    }

    pub fn with_base_url(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.to_string(),
            api_key: std::env::var(API_KEY_ENV).ok(),
            cache: Mutex::new(TtlCache::new(CACHE_TTL)),
        }
    }

    /// Collection catalog: cache, then API, then the static list.
    pub async fn collections(&self) -> CollectionsResponse {
        let key = "collections".to_string();
        if let Some(cached) = self.cache.lock().await.get(&key) {
            return CollectionsResponse {
                collections: cached,
                source: DataSource::Cache,
            };
        }

        match self.fetch_collections().await {
            Ok(collections) => {
                self.cache.lock().await.insert(key, collections.clone());
                CollectionsResponse {
                    collections,
                    source: DataSource::Api,
                }
            }
            Err(e) => {
                tracing::warn!("hadith API unavailable, using bundled list: {}", e);
                CollectionsResponse {
                    collections: fallback_collections(),
                    source: DataSource::Fallback,
                }
            }
        }
    }

    async fn fetch_collections(&self) -> Result<Vec<HadithCollection>> {
        let api_key = self
            .api_key
            .as_deref()
            .with_context(|| format!("{} is not set", API_KEY_ENV))?;
        let url = format!("{}/collections", self.base);

        with_retry(FETCH_ATTEMPTS, || async {
            let response = self
                .http
                .get(&url)
                .header("X-API-Key", api_key)
                .send()
                .await
                .context("failed to reach hadith API")?;

            if !response.status().is_success() {
                anyhow::bail!("hadith API error: {}", response.status());
            }

            let parsed: ApiCollectionsResponse = response
                .json()
                .await
                .context("failed to parse hadith API response")?;

            let collections = parsed
                .data
                .into_iter()
                .map(|c| {
                    let title = c
                        .collection
                        .iter()
                        .find(|t| t.lang == "en")
                        .or_else(|| c.collection.first())
                        .map(|t| t.title.clone())
                        .unwrap_or_else(|| c.name.clone());
                    HadithCollection {
                        name: c.name,
                        title,
                        total_hadith: c.total_hadith.unwrap_or(0),
                    }
                })
                .collect();
            Ok(collections)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collections_fall_back_without_key_or_network() {
        let client = HadithClient::with_base_url("http://127.0.0.1:9");
        let response = client.collections().await;

        assert_eq!(response.source, DataSource::Fallback);
        assert_eq!(response.collections.len(), 6);
        assert!(response.collections.iter().any(|c| c.name == "bukhari"));
    }

    #[test]
    fn test_daily_hadith_is_from_bundle() {
        let today = daily_hadith();
        assert!(BUNDLED_HADITH
            .iter()
            .any(|h| h.reference == today.reference));
    }

    #[test]
    fn test_bundle_has_no_empty_fields() {
        for hadith in BUNDLED_HADITH {
            assert!(!hadith.text.is_empty());
            assert!(!hadith.narrator.is_empty());
            assert!(!hadith.reference.is_empty());
        }
    }
}
