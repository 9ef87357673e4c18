//! Rule-based recommendation ranking.
//!
//! A fixed catalog of templates is filtered by a table of independent rules
//! and ranked by `priority + personalized_score / 10`. This is heuristic
//! selection over hard-coded candidates; there is no learned model and no
//! feedback loop adjusting scores from past acceptance.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analyzer::{BehaviorAnalysis, EngagementTrend, TimeOfDay};
use super::session::ContentType;
use crate::progress::ComprehensionLevel;

pub const MAX_RECOMMENDATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    DailyVerse,
    AdvancedChallenge,
    StreakCelebration,
    OptimalTime,
    ReEngagement,
    ShortSession,
    FridayKahf,
    FoundationStudy,
    TafsirStudy,
    MorningAthkar,
    EveningAthkar,
    DhikrMoment,
}

#[derive(Debug, Clone)]
pub struct RecommendationTemplate {
    pub kind: RecommendationKind,
    pub title: &'static str,
    pub body: &'static str,
    /// 0-10.
    pub priority: u32,
    /// 0-100.
    pub personalized_score: u32,
    pub tags: &'static [&'static str],
    pub difficulty: Option<ComprehensionLevel>,
    pub preferred_period: Option<TimeOfDay>,
}

/// Everything the rule table is allowed to look at.
#[derive(Debug, Clone)]
pub struct Signals {
    pub analysis: BehaviorAnalysis,
    pub preferred_hours: Vec<u32>,
    pub current_streak: u32,
    pub comprehension: ComprehensionLevel,
    pub current_hour: u32,
    pub weekday: Weekday,
    pub completion_ratio: f64,
    pub has_sessions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub title: String,
    pub body: String,
    pub priority: u32,
    pub personalized_score: u32,
    pub tags: Vec<String>,
    /// Name of the rule that selected this template.
    pub rule: String,
}

const DAILY_VERSE: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::DailyVerse,
    title: "Verse of the day",
    body: "Read today's verse with its translation and reflect for a minute.",
    priority: 5,
    personalized_score: 40,
    tags: &["quran", "daily"],
    difficulty: None,
    preferred_period: None,
};

const ADVANCED_CHALLENGE: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::AdvancedChallenge,
    title: "Ready for a deeper study",
    body: "Your engagement has been high. Try a longer passage with tafsir notes.",
    priority: 8,
    personalized_score: 90,
    tags: &["challenge", "quran"],
    difficulty: Some(ComprehensionLevel::Advanced),
    preferred_period: None,
};

const STREAK_CELEBRATION: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::StreakCelebration,
    title: "A full week, masha'Allah",
    body: "Seven days and counting. Keep the streak alive with a short read today.",
    priority: 9,
    personalized_score: 85,
    tags: &["streak", "habit"],
    difficulty: None,
    preferred_period: None,
};

const OPTIMAL_TIME: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::OptimalTime,
    title: "This is your reading hour",
    body: "You usually read around now. A good moment to continue where you left off.",
    priority: 7,
    personalized_score: 80,
    tags: &["timing"],
    difficulty: None,
    preferred_period: None,
};

const RE_ENGAGEMENT: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::ReEngagement,
    title: "Ease back in",
    body: "Recent sessions have felt heavier. Pick one short, familiar passage.",
    priority: 8,
    personalized_score: 75,
    tags: &["gentle", "habit"],
    difficulty: None,
    preferred_period: None,
};

const SHORT_SESSION: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::ShortSession,
    title: "Try a five-minute session",
    body: "Shorter sessions are easier to finish, and finishing builds the habit.",
    priority: 6,
    personalized_score: 70,
    tags: &["habit"],
    difficulty: None,
    preferred_period: None,
};

const FRIDAY_KAHF: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::FridayKahf,
    title: "Surah Al-Kahf",
    body: "It is Friday: the sunnah of reading Surah Al-Kahf awaits.",
    priority: 9,
    personalized_score: 88,
    tags: &["quran", "friday", "sunnah"],
    difficulty: None,
    preferred_period: None,
};

const FOUNDATION_STUDY: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::FoundationStudy,
    title: "Build your foundation",
    body: "Short surahs with word-by-word translation are a strong place to start.",
    priority: 6,
    personalized_score: 60,
    tags: &["quran", "beginner"],
    difficulty: Some(ComprehensionLevel::Beginner),
    preferred_period: None,
};

const TAFSIR_STUDY: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::TafsirStudy,
    title: "Go beyond the text",
    body: "Pair today's reading with a classical tafsir excerpt.",
    priority: 7,
    personalized_score: 65,
    tags: &["tafsir", "advanced"],
    difficulty: Some(ComprehensionLevel::Advanced),
    preferred_period: None,
};

const MORNING_ATHKAR: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::MorningAthkar,
    title: "Morning athkar",
    body: "Start the day with the morning remembrances.",
    priority: 7,
    personalized_score: 72,
    tags: &["athkar", "morning"],
    difficulty: None,
    preferred_period: Some(TimeOfDay::Morning),
};

const EVENING_ATHKAR: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::EveningAthkar,
    title: "Evening athkar",
    body: "Close the day with the evening remembrances.",
    priority: 7,
    personalized_score: 72,
    tags: &["athkar", "evening"],
    difficulty: None,
    preferred_period: Some(TimeOfDay::Evening),
};

const DHIKR_MOMENT: RecommendationTemplate = RecommendationTemplate {
    kind: RecommendationKind::DhikrMoment,
    title: "A moment of dhikr",
    body: "Dhikr is your favorite practice. Take a hundred-count break now.",
    priority: 5,
    personalized_score: 55,
    tags: &["dhikr"],
    difficulty: None,
    preferred_period: None,
};

struct Rule {
    name: &'static str,
    template: &'static RecommendationTemplate,
    applies: fn(&Signals) -> bool,
}

fn always(_: &Signals) -> bool {
    true
}

fn high_engagement(s: &Signals) -> bool {
    s.has_sessions && s.analysis.average_engagement >= 8.0
}

fn week_streak(s: &Signals) -> bool {
    s.current_streak >= 7
}

fn in_preferred_hour(s: &Signals) -> bool {
    s.preferred_hours.contains(&s.current_hour)
}

fn declining_engagement(s: &Signals) -> bool {
    s.analysis.trend == EngagementTrend::Declining
}

fn low_completion(s: &Signals) -> bool {
    s.has_sessions && s.completion_ratio < 0.5
}

fn friday(s: &Signals) -> bool {
    s.weekday == Weekday::Fri
}

fn beginner(s: &Signals) -> bool {
    s.comprehension == ComprehensionLevel::Beginner
}

fn advanced(s: &Signals) -> bool {
    s.comprehension == ComprehensionLevel::Advanced
}

fn morning_now(s: &Signals) -> bool {
    TimeOfDay::from_hour(s.current_hour) == TimeOfDay::Morning
}

fn evening_now(s: &Signals) -> bool {
    TimeOfDay::from_hour(s.current_hour) == TimeOfDay::Evening
}

fn dhikr_favorite(s: &Signals) -> bool {
    s.analysis.favorite_content == Some(ContentType::Dhikr)
}

const RULES: &[Rule] = &[
    Rule {
        name: "daily_verse",
        template: &DAILY_VERSE,
        applies: always,
    },
    Rule {
        name: "high_engagement_challenge",
        template: &ADVANCED_CHALLENGE,
        applies: high_engagement,
    },
    Rule {
        name: "week_streak",
        template: &STREAK_CELEBRATION,
        applies: week_streak,
    },
    Rule {
        name: "optimal_time",
        template: &OPTIMAL_TIME,
        applies: in_preferred_hour,
    },
    Rule {
        name: "declining_engagement",
        template: &RE_ENGAGEMENT,
        applies: declining_engagement,
    },
    Rule {
        name: "low_completion",
        template: &SHORT_SESSION,
        applies: low_completion,
    },
    Rule {
        name: "friday_kahf",
        template: &FRIDAY_KAHF,
        applies: friday,
    },
    Rule {
        name: "beginner_foundation",
        template: &FOUNDATION_STUDY,
        applies: beginner,
    },
    Rule {
        name: "advanced_tafsir",
        template: &TAFSIR_STUDY,
        applies: advanced,
    },
    Rule {
        name: "morning_athkar",
        template: &MORNING_ATHKAR,
        applies: morning_now,
    },
    Rule {
        name: "evening_athkar",
        template: &EVENING_ATHKAR,
        applies: evening_now,
    },
    Rule {
        name: "dhikr_favorite",
        template: &DHIKR_MOMENT,
        applies: dhikr_favorite,
    },
];

pub fn rank_score(template: &RecommendationTemplate) -> f64 {
    template.priority as f64 + template.personalized_score as f64 / 10.0
}

/// Evaluate the rule table in one pass, rank the survivors, cap the list.
pub fn rank(signals: &Signals) -> Vec<Recommendation> {
    let mut selected: Vec<(&'static str, &'static RecommendationTemplate)> = RULES
        .iter()
        .filter(|rule| (rule.applies)(signals))
        .map(|rule| (rule.name, rule.template))
        .collect();

    selected.sort_by(|a, b| {
        rank_score(b.1)
            .partial_cmp(&rank_score(a.1))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    selected.truncate(MAX_RECOMMENDATIONS);

    selected
        .into_iter()
        .map(|(rule, template)| Recommendation {
            id: Uuid::new_v4().to_string(),
            kind: template.kind,
            title: template.title.to_string(),
            body: template.body.to_string(),
            priority: template.priority,
            personalized_score: template.personalized_score,
            tags: template.tags.iter().map(|t| t.to_string()).collect(),
            rule: rule.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personalization::analyzer::{analyze, BehaviorAnalysis};
    use crate::personalization::session::sample_session;

    fn signals_from(analysis: BehaviorAnalysis) -> Signals {
        Signals {
            analysis,
            preferred_hours: Vec::new(),
            current_streak: 0,
            comprehension: ComprehensionLevel::Beginner,
            current_hour: 14,
            weekday: Weekday::Mon,
            completion_ratio: 1.0,
            has_sessions: true,
        }
    }

    #[test]
    fn test_never_more_than_eight() {
        // Light up every rule at once.
        let sessions: Vec<_> = (0..10).map(|_| sample_session(7, 9.0)).collect();
        let mut signals = signals_from(analyze(&sessions));
        signals.preferred_hours = vec![7];
        signals.current_hour = 7;
        signals.current_streak = 10;
        signals.weekday = Weekday::Fri;
        signals.completion_ratio = 0.2;

        let ranked = rank(&signals);
        assert!(ranked.len() <= MAX_RECOMMENDATIONS);
        assert!(!ranked.is_empty());
    }

    #[test]
    fn test_sorted_by_rank_score_descending() {
        let sessions: Vec<_> = (0..10).map(|_| sample_session(7, 9.0)).collect();
        let mut signals = signals_from(analyze(&sessions));
        signals.current_streak = 8;
        signals.preferred_hours = vec![14];

        let ranked = rank(&signals);
        let scores: Vec<f64> = ranked
            .iter()
            .map(|r| r.priority as f64 + r.personalized_score as f64 / 10.0)
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_high_engagement_surfaces_challenge() {
        let sessions: Vec<_> = (0..10).map(|_| sample_session(7, 9.0)).collect();
        let signals = signals_from(analyze(&sessions));

        let ranked = rank(&signals);
        let top_kinds: Vec<RecommendationKind> =
            ranked.iter().take(3).map(|r| r.kind).collect();
        assert!(top_kinds.contains(&RecommendationKind::AdvancedChallenge));
    }

    #[test]
    fn test_cold_start_returns_defaults_only() {
        let mut signals = signals_from(analyze(&[]));
        signals.has_sessions = false;

        let ranked = rank(&signals);
        assert!(!ranked.is_empty());
        assert!(ranked.iter().any(|r| r.kind == RecommendationKind::DailyVerse));
        assert!(ranked
            .iter()
            .all(|r| r.kind != RecommendationKind::AdvancedChallenge));
    }

    #[test]
    fn test_friday_adds_kahf_reminder() {
        let mut signals = signals_from(analyze(&[]));
        signals.weekday = Weekday::Fri;

        let ranked = rank(&signals);
        assert!(ranked.iter().any(|r| r.kind == RecommendationKind::FridayKahf));
    }

    #[test]
    fn test_streak_celebration_at_seven_days() {
        let mut signals = signals_from(analyze(&[]));
        signals.current_streak = 7;

        let ranked = rank(&signals);
        assert!(ranked
            .iter()
            .any(|r| r.kind == RecommendationKind::StreakCelebration));
    }

    #[test]
    fn test_declining_trend_adds_re_engagement() {
        let mut sessions: Vec<_> = (0..5).map(|_| sample_session(9, 9.0)).collect();
        sessions.extend((0..5).map(|_| sample_session(9, 5.0)));
        let signals = signals_from(analyze(&sessions));

        let ranked = rank(&signals);
        assert!(ranked
            .iter()
            .any(|r| r.kind == RecommendationKind::ReEngagement));
    }
}
