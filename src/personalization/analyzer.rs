//! Behavior analysis over the recorded session list.
//!
//! Pure functions of the session history, recomputed on every call. With the
//! list capped at 100 entries there is nothing worth caching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::session::{ContentType, ReadingSession};

/// Trend looks at the most recent sessions only.
pub const TREND_WINDOW: usize = 10;
/// Half-to-half mean delta beyond which the trend leaves "stable".
pub const TREND_THRESHOLD: f64 = 0.5;
/// Reported when there is no history yet.
pub const NEUTRAL_ENGAGEMENT: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTrend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    pub peak_hour: Option<u32>,
    pub peak_period: Option<TimeOfDay>,
    pub favorite_content: Option<ContentType>,
    pub average_engagement: f64,
    pub trend: EngagementTrend,
    pub patterns: Vec<String>,
    pub insights: Vec<String>,
}

impl BehaviorAnalysis {
    fn neutral() -> Self {
        Self {
            peak_hour: None,
            peak_period: None,
            favorite_content: None,
            average_engagement: NEUTRAL_ENGAGEMENT,
            trend: EngagementTrend::Stable,
            patterns: Vec::new(),
            insights: Vec::new(),
        }
    }
}

pub fn analyze(sessions: &[ReadingSession]) -> BehaviorAnalysis {
    if sessions.is_empty() {
        return BehaviorAnalysis::neutral();
    }

    let peak_hour = peak_hour(sessions);
    let peak_period = peak_hour.map(TimeOfDay::from_hour);
    let favorite_content = favorite_content(sessions);

    let average_engagement =
        sessions.iter().map(|s| s.engagement_score).sum::<f64>() / sessions.len() as f64;
    let trend = engagement_trend(sessions);

    let mut patterns = Vec::new();
    if let Some(period) = peak_period {
        patterns.push(format!("Most sessions happen in the {}", period.label()));
    }
    if let Some(content) = favorite_content {
        patterns.push(format!("{} is your most-read content", content.label()));
    }
    let completed = sessions.iter().filter(|s| s.completed).count();
    if completed * 4 >= sessions.len() * 3 {
        patterns.push("You usually finish what you start".to_string());
    }

    let mut insights = Vec::new();
    insights.push(format!(
        "Average engagement {:.1}/10 across {} sessions",
        average_engagement,
        sessions.len()
    ));
    match trend {
        EngagementTrend::Improving => {
            insights.push("Engagement has been climbing over your recent sessions".to_string())
        }
        EngagementTrend::Declining => {
            insights.push("Engagement has been slipping; a shorter session may help".to_string())
        }
        EngagementTrend::Stable => {}
    }

    BehaviorAnalysis {
        peak_hour,
        peak_period,
        favorite_content,
        average_engagement,
        trend,
        patterns,
        insights,
    }
}

/// Hour with the most sessions; earliest hour wins ties.
fn peak_hour(sessions: &[ReadingSession]) -> Option<u32> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for session in sessions {
        *counts.entry(session.hour_of_day).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(hour, _)| hour)
}

fn favorite_content(sessions: &[ReadingSession]) -> Option<ContentType> {
    let mut counts: HashMap<ContentType, usize> = HashMap::new();
    for session in sessions {
        *counts.entry(session.content_type).or_insert(0) += 1;
    }
    counts.into_iter().max_by_key(|(_, n)| *n).map(|(t, _)| t)
}

/// Mean of the later half of the last ten sessions against the earlier half.
fn engagement_trend(sessions: &[ReadingSession]) -> EngagementTrend {
    let start = sessions.len().saturating_sub(TREND_WINDOW);
    let recent = &sessions[start..];
    let mid = recent.len() / 2;
    if mid == 0 {
        return EngagementTrend::Stable;
    }

    let mean = |slice: &[ReadingSession]| {
        slice.iter().map(|s| s.engagement_score).sum::<f64>() / slice.len() as f64
    };
    let delta = mean(&recent[mid..]) - mean(&recent[..mid]);

    if delta > TREND_THRESHOLD {
        EngagementTrend::Improving
    } else if delta < -TREND_THRESHOLD {
        EngagementTrend::Declining
    } else {
        EngagementTrend::Stable
    }
}
