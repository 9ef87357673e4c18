//! Adaptive recommendation and insight engine.
//!
//! The app calls this "AI"; it is heuristic scoring over locally stored
//! history. Sessions are recorded to the `ai_personalization_data_v1` blob,
//! analyzed into simple aggregates, and matched against a fixed rule table of
//! recommendation templates.

pub mod analyzer;
pub mod recommend;
pub mod session;

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::habits;
use crate::progress;
use crate::storage::{keys, Storage, StorageError};

pub use analyzer::{BehaviorAnalysis, EngagementTrend, TimeOfDay};
pub use recommend::{Recommendation, RecommendationKind, Signals};
pub use session::{Aggregates, ContentType, ReadingSession};

#[derive(Error, Debug)]
pub enum PersonalizationError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("habits error: {0}")]
    Habits(#[from] habits::HabitsError),
}

/// The whole `ai_personalization_data_v1` blob, rewritten on every append.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalizationData {
    pub sessions: Vec<ReadingSession>,
    pub aggregates: Aggregates,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSessionRequest {
    pub content_type: ContentType,
    pub content_id: String,
    pub duration_minutes: u32,
    pub engagement_score: f64,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

pub fn load(storage: &Storage) -> PersonalizationData {
    storage.get(keys::PERSONALIZATION).unwrap_or_default()
}

/// Record a finished session and refresh the derived aggregates.
pub fn record_session(
    storage: &Storage,
    request: &RecordSessionRequest,
) -> Result<ReadingSession, PersonalizationError> {
    let mut data = load(storage);

    let now_local = Local::now();
    let record = ReadingSession {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        content_type: request.content_type,
        content_id: request.content_id.clone(),
        duration_minutes: request.duration_minutes,
        engagement_score: session::clamp_engagement(request.engagement_score),
        hour_of_day: now_local.hour(),
        completed: request.completed,
    };

    session::push_session(&mut data, record.clone());
    data.updated_at = Some(Utc::now());
    storage.set(keys::PERSONALIZATION, &data)?;

    Ok(record)
}

/// Most recent sessions first.
pub fn recent_sessions(storage: &Storage, limit: usize) -> Vec<ReadingSession> {
    let data = load(storage);
    data.sessions.into_iter().rev().take(limit).collect()
}

pub fn insights(storage: &Storage) -> BehaviorAnalysis {
    analyzer::analyze(&load(storage).sessions)
}

/// Gather signals from every local store and run the rule table.
pub fn recommendations(storage: &Storage) -> Result<Vec<Recommendation>, PersonalizationError> {
    let data = load(storage);
    let signals = build_signals(storage, &data)?;
    Ok(recommend::rank(&signals))
}

fn build_signals(
    storage: &Storage,
    data: &PersonalizationData,
) -> Result<Signals, PersonalizationError> {
    let analysis = analyzer::analyze(&data.sessions);

    let streak = habits::streak_for(storage, habits::StreakKind::DailyReading)?;
    let history = progress::snapshot(storage);

    let completed = data.sessions.iter().filter(|s| s.completed).count();
    let completion_ratio = if data.sessions.is_empty() {
        1.0
    } else {
        completed as f64 / data.sessions.len() as f64
    };

    let now = Local::now();
    Ok(Signals {
        analysis,
        preferred_hours: data.aggregates.preferred_hours.clone(),
        current_streak: streak.current_streak,
        comprehension: history.comprehension,
        current_hour: now.hour(),
        weekday: now.weekday(),
        completion_ratio,
        has_sessions: !data.sessions.is_empty(),
    })
}

pub fn reset(storage: &Storage) -> Result<(), PersonalizationError> {
    storage.set(keys::PERSONALIZATION, &PersonalizationData::default())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(engagement: f64) -> RecordSessionRequest {
        RecordSessionRequest {
            content_type: ContentType::Quran,
            content_id: "surah-18".to_string(),
            duration_minutes: 12,
            engagement_score: engagement,
            completed: true,
        }
    }

    #[test]
    fn test_record_session_persists() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        record_session(&storage, &request(8.0)).unwrap();
        let data = load(&storage);

        assert_eq!(data.sessions.len(), 1);
        assert_eq!(data.aggregates.total_sessions, 1);
        assert!(data.updated_at.is_some());
    }

    #[test]
    fn test_record_clamps_engagement() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let recorded = record_session(&storage, &request(99.0)).unwrap();
        assert_eq!(recorded.engagement_score, 10.0);
    }

    #[test]
    fn test_list_caps_at_one_hundred() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        for _ in 0..110 {
            record_session(&storage, &request(7.0)).unwrap();
        }

        assert_eq!(load(&storage).sessions.len(), session::MAX_SESSIONS);
    }

    #[test]
    fn test_insights_neutral_on_fresh_profile() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let analysis = insights(&storage);
        assert_eq!(analysis.average_engagement, analyzer::NEUTRAL_ENGAGEMENT);
        assert_eq!(analysis.trend, EngagementTrend::Stable);
        assert!(analysis.patterns.is_empty());
    }

    #[test]
    fn test_recommendations_on_fresh_profile() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let ranked = recommendations(&storage).unwrap();
        assert!(!ranked.is_empty());
        assert!(ranked.len() <= recommend::MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_reset_clears_history() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        record_session(&storage, &request(8.0)).unwrap();
        reset(&storage).unwrap();

        assert!(load(&storage).sessions.is_empty());
    }

    #[test]
    fn test_recent_sessions_newest_first() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let mut req = request(7.0);
        req.content_id = "first".to_string();
        record_session(&storage, &req).unwrap();
        req.content_id = "second".to_string();
        record_session(&storage, &req).unwrap();

        let recent = recent_sessions(&storage, 10);
        assert_eq!(recent[0].content_id, "second");
        assert_eq!(recent[1].content_id, "first");
    }
}
