//! Hijri calendar adapter.
//!
//! Conversions go through the upstream calendar API when it answers; on any
//! failure they fall back to a manual approximation built on the 354.37-day
//! mean Hijri year and a fixed alternating month table. The approximation is
//! deliberately a best-effort estimate: it carries no moon-sighting data and
//! must not be treated as authoritative for religious observance timing.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::cache::TtlCache;
use crate::net::with_retry;

const CALENDAR_API_BASE: &str = "https://api.aladhan.com/v1";
const MOON_API_BASE: &str = "https://api.farmsense.net/v1/moonphases/";
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const FETCH_ATTEMPTS: u32 = 2;

/// Mean length of a Hijri year in days, used by the approximation.
pub const AVG_HIJRI_YEAR_DAYS: f64 = 354.37;
/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

const HIJRI_MONTH_LENGTHS: [i64; 12] = [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29];

pub const HIJRI_MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

const MOON_PHASE_NAMES: [&str; 8] = [
    "New Moon",
    "Waxing Crescent",
    "First Quarter",
    "Waxing Gibbous",
    "Full Moon",
    "Waning Gibbous",
    "Last Quarter",
    "Waning Crescent",
];

/// Notable dates by Hijri (month, day).
const ISLAMIC_EVENTS: &[(u32, u32, &str)] = &[
    (1, 1, "Islamic New Year"),
    (1, 10, "Day of Ashura"),
    (3, 12, "Mawlid al-Nabi"),
    (7, 27, "Isra and Mi'raj"),
    (8, 15, "Mid-Sha'ban"),
    (9, 1, "First day of Ramadan"),
    (9, 27, "Laylat al-Qadr (estimated)"),
    (10, 1, "Eid al-Fitr"),
    (12, 9, "Day of Arafah"),
    (12, 10, "Eid al-Adha"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSource {
    Api,
    Cache,
    Approximation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u32,
    pub month: u32,
    pub month_name: String,
    pub year: i32,
}

impl HijriDate {
    pub fn formatted(&self) -> String {
        format!("{} {} {} AH", self.day, self.month_name, self.year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HijriConversion {
    pub gregorian: String,
    pub hijri: HijriDate,
    pub source: ConversionSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonPhase {
    pub phase: String,
    pub age_days: f64,
    pub illumination: f64,
    pub source: ConversionSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub name: String,
    pub hijri_month: u32,
    pub hijri_day: u32,
    pub gregorian_date: String,
    pub days_until: i64,
}

// ========== Manual approximation ==========

/// 1 Muharram AH 1 in the proleptic Gregorian calendar.
fn hijri_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(622, 7, 19).unwrap()
}

pub fn days_since_epoch(date: NaiveDate) -> i64 {
    date.signed_duration_since(hijri_epoch()).num_days()
}

/// Approximate conversion: `year = floor(days / 354.37) + 1`, then walk the
/// fixed month table. Dates before the epoch clamp to day one.
pub fn approximate_hijri(date: NaiveDate) -> HijriDate {
    let days = days_since_epoch(date).max(0);
    let year = (days as f64 / AVG_HIJRI_YEAR_DAYS).floor() as i32 + 1;
    let mut remaining = days - ((year - 1) as f64 * AVG_HIJRI_YEAR_DAYS).floor() as i64;

    // The mean year runs a fraction past the 354-day table; clamp the spill
    // into the last day of Dhu al-Hijjah.
    let mut month = 12;
    let mut day = HIJRI_MONTH_LENGTHS[11];
    for (index, length) in HIJRI_MONTH_LENGTHS.iter().enumerate() {
        if remaining < *length {
            month = index + 1;
            day = remaining + 1;
            break;
        }
        remaining -= length;
    }

    HijriDate {
        day: day as u32,
        month: month as u32,
        month_name: HIJRI_MONTH_NAMES[month - 1].to_string(),
        year,
    }
}

/// Inverse of [`approximate_hijri`], on the same mean-year arithmetic.
pub fn approximate_gregorian(year: i32, month: u32, day: u32) -> NaiveDate {
    let month = month.clamp(1, 12) as usize;
    let mut days = ((year.max(1) - 1) as f64 * AVG_HIJRI_YEAR_DAYS).floor() as i64;
    days += HIJRI_MONTH_LENGTHS[..month - 1].iter().sum::<i64>();
    days += i64::from(day.max(1)) - 1;
    hijri_epoch() + ChronoDuration::days(days)
}

/// Moon age from the mean synodic month against a reference new moon.
pub fn approximate_moon(at: DateTime<Utc>) -> MoonPhase {
    let reference = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
    let elapsed_days = (at - reference).num_seconds() as f64 / 86_400.0;
    let age_days = elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS);

    let index = ((age_days / SYNODIC_MONTH_DAYS) * 8.0).round() as usize % 8;
    let illumination =
        (1.0 - (2.0 * std::f64::consts::PI * age_days / SYNODIC_MONTH_DAYS).cos()) / 2.0;

    MoonPhase {
        phase: MOON_PHASE_NAMES[index].to_string(),
        age_days,
        illumination,
        source: ConversionSource::Approximation,
    }
}

/// Next occurrences of the notable-date table, located through the
/// approximation and therefore carrying its error bars.
pub fn upcoming_events(today: NaiveDate, limit: usize) -> Vec<UpcomingEvent> {
    let current = approximate_hijri(today);

    let mut events: Vec<UpcomingEvent> = ISLAMIC_EVENTS
        .iter()
        .map(|(month, day, name)| {
            let mut gregorian = approximate_gregorian(current.year, *month, *day);
            if gregorian < today {
                gregorian = approximate_gregorian(current.year + 1, *month, *day);
            }
            UpcomingEvent {
                name: name.to_string(),
                hijri_month: *month,
                hijri_day: *day,
                gregorian_date: gregorian.format("%Y-%m-%d").to_string(),
                days_until: gregorian.signed_duration_since(today).num_days(),
            }
        })
        .collect();

    events.sort_by_key(|e| e.days_until);
    events.truncate(limit);
    events
}

// ========== Upstream API client ==========

#[derive(Deserialize)]
struct GToHResponse {
    data: GToHData,
}

#[derive(Deserialize)]
struct GToHData {
    hijri: ApiHijri,
}

#[derive(Deserialize)]
struct ApiHijri {
    day: String,
    year: String,
    month: ApiHijriMonth,
}

#[derive(Deserialize)]
struct ApiHijriMonth {
    number: u32,
    en: String,
}

#[derive(Deserialize)]
struct ApiMoonEntry {
    #[serde(rename = "Phase")]
    phase: String,
    #[serde(rename = "Age")]
    age: f64,
    #[serde(rename = "Illumination")]
    illumination: f64,
}

pub struct CalendarClient {
    http: reqwest::Client,
    calendar_base: String,
    moon_base: String,
    hijri_cache: Mutex<TtlCache<String, HijriDate>>,
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarClient {
    pub fn new() -> Self {
        Self::with_base_urls(CALENDAR_API_BASE, MOON_API_BASE)
    }

    pub fn with_base_urls(calendar_base: &str, moon_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            calendar_base: calendar_base.to_string(),
            moon_base: moon_base.to_string(),
            hijri_cache: Mutex::new(TtlCache::new(CACHE_TTL)),
        }
    }

    /// Convert one Gregorian date. Never fails: the approximation stands in
    /// whenever the upstream does not answer.
    pub async fn gregorian_to_hijri(&self, date: NaiveDate) -> HijriConversion {
        let key = date.format("%Y-%m-%d").to_string();

        if let Some(cached) = self.hijri_cache.lock().await.get(&key) {
            return HijriConversion {
                gregorian: key,
                hijri: cached,
                source: ConversionSource::Cache,
            };
        }

        match self.fetch_hijri(date).await {
            Ok(hijri) => {
                self.hijri_cache.lock().await.insert(key.clone(), hijri.clone());
                HijriConversion {
                    gregorian: key,
                    hijri,
                    source: ConversionSource::Api,
                }
            }
            Err(e) => {
                tracing::warn!("hijri conversion API unavailable, approximating: {}", e);
                HijriConversion {
                    gregorian: key,
                    hijri: approximate_hijri(date),
                    source: ConversionSource::Approximation,
                }
            }
        }
    }

    pub async fn today_hijri(&self) -> HijriConversion {
        self.gregorian_to_hijri(Local::now().date_naive()).await
    }

    pub async fn moon_phase(&self) -> MoonPhase {
        match self.fetch_moon().await {
            Ok(mut phase) => {
                phase.source = ConversionSource::Api;
                phase
            }
            Err(e) => {
                tracing::warn!("moon phase API unavailable, approximating: {}", e);
                approximate_moon(Utc::now())
            }
        }
    }

    async fn fetch_hijri(&self, date: NaiveDate) -> Result<HijriDate> {
        let url = format!("{}/gToH/{}", self.calendar_base, date.format("%d-%m-%Y"));

        with_retry(FETCH_ATTEMPTS, || async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .context("failed to reach calendar API")?;

            if !response.status().is_success() {
                anyhow::bail!("calendar API error: {}", response.status());
            }

            let parsed: GToHResponse = response
                .json()
                .await
                .context("failed to parse calendar API response")?;

            let hijri = parsed.data.hijri;
            Ok(HijriDate {
                day: hijri.day.parse().context("bad hijri day")?,
                month: hijri.month.number,
                month_name: hijri.month.en,
                year: hijri.year.parse().context("bad hijri year")?,
            })
        })
        .await
    }

    async fn fetch_moon(&self) -> Result<MoonPhase> {
        let url = format!("{}?d={}", self.moon_base, Utc::now().timestamp());

        with_retry(FETCH_ATTEMPTS, || async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .context("failed to reach moon phase API")?;

            if !response.status().is_success() {
                anyhow::bail!("moon phase API error: {}", response.status());
            }

            let entries: Vec<ApiMoonEntry> = response
                .json()
                .await
                .context("failed to parse moon phase response")?;
            let entry = entries
                .into_iter()
                .next()
                .context("moon phase response was empty")?;

            Ok(MoonPhase {
                phase: entry.phase,
                age_days: entry.age,
                illumination: entry.illumination,
                source: ConversionSource::Api,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_approximate_year_for_known_date() {
        let hijri = approximate_hijri(date("2024-01-01"));
        assert_eq!(hijri.year, 1445);
        assert_eq!(hijri.month, 6);
        assert_eq!(hijri.month_name, "Jumada al-Thani");
    }

    #[test]
    fn test_year_formula_matches_days_since_epoch() {
        let d = date("2024-01-01");
        let days = days_since_epoch(d);
        let expected = (days as f64 / AVG_HIJRI_YEAR_DAYS).floor() as i32 + 1;
        assert_eq!(approximate_hijri(d).year, expected);
    }

    #[test]
    fn test_epoch_is_first_muharram() {
        let hijri = approximate_hijri(date("0622-07-19"));
        assert_eq!(hijri.year, 1);
        assert_eq!(hijri.month, 1);
        assert_eq!(hijri.day, 1);
    }

    #[test]
    fn test_approximation_roundtrip() {
        let original = date("2024-01-01");
        let hijri = approximate_hijri(original);
        let back = approximate_gregorian(hijri.year, hijri.month, hijri.day);
        assert_eq!(back, original);
    }

    #[test]
    fn test_pre_epoch_clamps() {
        let hijri = approximate_hijri(date("0600-01-01"));
        assert_eq!(hijri.year, 1);
        assert_eq!(hijri.day, 1);
    }

    #[test]
    fn test_upcoming_events_sorted_and_future() {
        let events = upcoming_events(date("2024-01-01"), 5);
        assert_eq!(events.len(), 5);
        for pair in events.windows(2) {
            assert!(pair[0].days_until <= pair[1].days_until);
        }
        assert!(events.iter().all(|e| e.days_until >= 0));
    }

    #[test]
    fn test_moon_new_and_full() {
        // 2024-01-11 was a new moon, 2024-01-25 a full moon.
        let new_moon = approximate_moon(Utc.with_ymd_and_hms(2024, 1, 11, 12, 0, 0).unwrap());
        assert_eq!(new_moon.phase, "New Moon");
        assert!(new_moon.illumination < 0.05);

        let full_moon = approximate_moon(Utc.with_ymd_and_hms(2024, 1, 25, 18, 0, 0).unwrap());
        assert_eq!(full_moon.phase, "Full Moon");
        assert!(full_moon.illumination > 0.95);
    }

    #[tokio::test]
    async fn test_conversion_falls_back_without_network() {
        // Nothing listens on this port; the fetch fails fast and the
        // approximation must stand in without an error surfacing.
        let client = CalendarClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");
        let conversion = client.gregorian_to_hijri(date("2024-01-01")).await;

        assert_eq!(conversion.source, ConversionSource::Approximation);
        assert_eq!(conversion.hijri.year, 1445);
    }

    #[tokio::test]
    async fn test_moon_falls_back_without_network() {
        let client = CalendarClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");
        let phase = client.moon_phase().await;

        assert_eq!(phase.source, ConversionSource::Approximation);
        assert!(!phase.phase.is_empty());
    }
}
