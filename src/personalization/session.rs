use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::PersonalizationData;

/// The session list is a ring buffer by truncation: the newest 100 entries
/// are kept, the oldest evicted on overflow.
pub const MAX_SESSIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Quran,
    Hadith,
    Dua,
    Dhikr,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Quran => "Quran",
            ContentType::Hadith => "Hadith",
            ContentType::Dua => "Dua",
            ContentType::Dhikr => "Dhikr",
        }
    }
}

/// One finished interaction with a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingSession {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub content_type: ContentType,
    pub content_id: String,
    pub duration_minutes: u32,
    /// Self-reported 1-10.
    pub engagement_score: f64,
    pub hour_of_day: u32,
    pub completed: bool,
}

/// Aggregates recomputed on every append; cheap because the list is capped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_sessions: usize,
    pub average_duration_minutes: f64,
    /// Up to three most frequent session hours, most frequent first.
    pub preferred_hours: Vec<u32>,
    /// Content types ordered by session count, most read first.
    pub favorite_content_types: Vec<ContentType>,
}

/// Non-finite scores fall back to zero before clamping into the 1-10 range.
pub fn clamp_engagement(raw: f64) -> f64 {
    let value = if raw.is_finite() { raw } else { 0.0 };
    value.clamp(1.0, 10.0)
}

/// Append a session, evict past the cap, refresh aggregates.
pub fn push_session(data: &mut PersonalizationData, session: ReadingSession) {
    data.sessions.push(session);
    if data.sessions.len() > MAX_SESSIONS {
        let excess = data.sessions.len() - MAX_SESSIONS;
        data.sessions.drain(..excess);
    }
    data.aggregates = recompute_aggregates(&data.sessions);
}

pub fn recompute_aggregates(sessions: &[ReadingSession]) -> Aggregates {
    if sessions.is_empty() {
        return Aggregates::default();
    }

    let total_minutes: u64 = sessions.iter().map(|s| s.duration_minutes as u64).sum();
    let average_duration_minutes = total_minutes as f64 / sessions.len() as f64;

    let mut hour_counts: HashMap<u32, usize> = HashMap::new();
    for session in sessions {
        *hour_counts.entry(session.hour_of_day).or_insert(0) += 1;
    }
    let mut hours: Vec<(u32, usize)> = hour_counts.into_iter().collect();
    hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let preferred_hours = hours.into_iter().take(3).map(|(hour, _)| hour).collect();

    let mut type_counts: HashMap<ContentType, usize> = HashMap::new();
    for session in sessions {
        *type_counts.entry(session.content_type).or_insert(0) += 1;
    }
    let mut types: Vec<(ContentType, usize)> = type_counts.into_iter().collect();
    types.sort_by(|a, b| b.1.cmp(&a.1));
    let favorite_content_types = types.into_iter().map(|(t, _)| t).collect();

    Aggregates {
        total_sessions: sessions.len(),
        average_duration_minutes,
        preferred_hours,
        favorite_content_types,
    }
}

#[cfg(test)]
pub(crate) fn sample_session(hour: u32, engagement: f64) -> ReadingSession {
    ReadingSession {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        content_type: ContentType::Quran,
        content_id: "surah-1".to_string(),
        duration_minutes: 10,
        engagement_score: engagement,
        hour_of_day: hour,
        completed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_keeps_most_recent_hundred() {
        let mut data = PersonalizationData::default();
        for i in 0..130 {
            let mut session = sample_session(9, 7.0);
            session.content_id = format!("item-{}", i);
            push_session(&mut data, session);
        }

        assert_eq!(data.sessions.len(), MAX_SESSIONS);
        assert_eq!(data.sessions.first().unwrap().content_id, "item-30");
        assert_eq!(data.sessions.last().unwrap().content_id, "item-129");
    }

    #[test]
    fn test_clamp_engagement() {
        assert_eq!(clamp_engagement(7.5), 7.5);
        assert_eq!(clamp_engagement(42.0), 10.0);
        assert_eq!(clamp_engagement(-3.0), 1.0);
        assert_eq!(clamp_engagement(f64::NAN), 1.0);
    }

    #[test]
    fn test_aggregates_preferred_hours() {
        let mut data = PersonalizationData::default();
        for _ in 0..3 {
            push_session(&mut data, sample_session(7, 8.0));
        }
        for _ in 0..2 {
            push_session(&mut data, sample_session(21, 8.0));
        }
        push_session(&mut data, sample_session(13, 8.0));

        assert_eq!(data.aggregates.preferred_hours, vec![7, 21, 13]);
        assert_eq!(data.aggregates.total_sessions, 6);
    }

    #[test]
    fn test_aggregates_favorite_types() {
        let mut data = PersonalizationData::default();
        for _ in 0..2 {
            let mut session = sample_session(7, 8.0);
            session.content_type = ContentType::Dhikr;
            push_session(&mut data, session);
        }
        push_session(&mut data, sample_session(7, 8.0));

        assert_eq!(
            data.aggregates.favorite_content_types.first(),
            Some(&ContentType::Dhikr)
        );
    }

    #[test]
    fn test_empty_aggregates_are_default() {
        let aggregates = recompute_aggregates(&[]);
        assert_eq!(aggregates.total_sessions, 0);
        assert!(aggregates.preferred_hours.is_empty());
    }
}
