//! Learning history: per-surah completion, hadith and dua counters, and the
//! derived comprehension level the recommender keys off.
//!
//! Everything lives in the `learning-history` blob and is recomputed on the
//! action that touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::storage::{keys, Storage, StorageError};

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid surah number: {0}")]
    InvalidSurah(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComprehensionLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurahProgress {
    pub surah_number: u32,
    pub percent_complete: u32,
    pub last_read: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningHistory {
    pub surahs: Vec<SurahProgress>,
    pub hadith_collections: HashMap<String, u32>,
    pub dua_categories: HashMap<String, u32>,
    pub comprehension: ComprehensionLevel,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Rough activity score: finished surahs weigh most, individual hadith and
/// dua readings trickle in.
fn derive_comprehension(history: &LearningHistory) -> ComprehensionLevel {
    let finished_surahs = history
        .surahs
        .iter()
        .filter(|s| s.percent_complete >= 80)
        .count() as u32;
    let hadith_total: u32 = history.hadith_collections.values().sum();
    let dua_total: u32 = history.dua_categories.values().sum();

    let score = finished_surahs * 10 + hadith_total + dua_total;
    if score >= 120 {
        ComprehensionLevel::Advanced
    } else if score >= 30 {
        ComprehensionLevel::Intermediate
    } else {
        ComprehensionLevel::Beginner
    }
}

pub fn snapshot(storage: &Storage) -> LearningHistory {
    storage.get(keys::LEARNING_HISTORY).unwrap_or_default()
}

fn save(storage: &Storage, history: &mut LearningHistory) -> Result<(), ProgressError> {
    history.comprehension = derive_comprehension(history);
    history.updated_at = Some(Utc::now());
    storage.set(keys::LEARNING_HISTORY, history)?;
    Ok(())
}

/// Record progress through a surah; the percentage is clamped to 0-100 and
/// never moves backwards.
pub fn record_surah(
    storage: &Storage,
    surah_number: u32,
    percent: u32,
) -> Result<LearningHistory, ProgressError> {
    if !(1..=114).contains(&surah_number) {
        return Err(ProgressError::InvalidSurah(surah_number));
    }
    let percent = percent.min(100);

    let mut history = snapshot(storage);
    let now = Utc::now();
    match history
        .surahs
        .iter_mut()
        .find(|s| s.surah_number == surah_number)
    {
        Some(entry) => {
            entry.percent_complete = entry.percent_complete.max(percent);
            entry.last_read = now;
        }
        None => history.surahs.push(SurahProgress {
            surah_number,
            percent_complete: percent,
            last_read: now,
        }),
    }

    save(storage, &mut history)?;
    Ok(history)
}

pub fn record_hadith(storage: &Storage, collection: &str) -> Result<LearningHistory, ProgressError> {
    let mut history = snapshot(storage);
    *history
        .hadith_collections
        .entry(collection.to_string())
        .or_insert(0) += 1;
    save(storage, &mut history)?;
    Ok(history)
}

pub fn record_dua(storage: &Storage, category: &str) -> Result<LearningHistory, ProgressError> {
    let mut history = snapshot(storage);
    *history
        .dua_categories
        .entry(category.to_string())
        .or_insert(0) += 1;
    save(storage, &mut history)?;
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fresh_history_is_beginner() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let history = snapshot(&storage);
        assert_eq!(history.comprehension, ComprehensionLevel::Beginner);
        assert!(history.surahs.is_empty());
    }

    #[test]
    fn test_surah_percent_clamped_and_monotonic() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        record_surah(&storage, 2, 250).unwrap();
        let history = record_surah(&storage, 2, 40).unwrap();

        assert_eq!(history.surahs.len(), 1);
        assert_eq!(history.surahs[0].percent_complete, 100);
    }

    #[test]
    fn test_invalid_surah_rejected() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            record_surah(&storage, 115, 10),
            Err(ProgressError::InvalidSurah(115))
        ));
        assert!(matches!(
            record_surah(&storage, 0, 10),
            Err(ProgressError::InvalidSurah(0))
        ));
    }

    #[test]
    fn test_comprehension_advances_with_activity() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        for surah in 1..=4 {
            record_surah(&storage, surah, 100).unwrap();
        }
        let history = snapshot(&storage);
        assert_eq!(history.comprehension, ComprehensionLevel::Intermediate);

        for _ in 0..80 {
            record_hadith(&storage, "bukhari").unwrap();
        }
        let history = snapshot(&storage);
        assert_eq!(history.comprehension, ComprehensionLevel::Advanced);
    }

    #[test]
    fn test_dua_counts_accumulate() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        record_dua(&storage, "morning").unwrap();
        record_dua(&storage, "morning").unwrap();
        let history = record_dua(&storage, "travel").unwrap();

        assert_eq!(history.dua_categories.get("morning"), Some(&2));
        assert_eq!(history.dua_categories.get("travel"), Some(&1));
    }
}
