//! Storage key names shared with the companion UI.
//!
//! These match the keys the app has always used, so an existing profile
//! carries over as-is.

pub const DAILY_PROGRESS: &str = "daily-progress";
pub const INTELLIGENT_HABITS: &str = "intelligent-habits";
pub const LEARNING_HISTORY: &str = "learning-history";
pub const PERSONALIZATION: &str = "ai_personalization_data_v1";
pub const FLOATING_ACTIONS: &str = "floating-actions-config";
pub const BOOKMARKS: &str = "islamic-app-bookmarks";
pub const READING_STREAKS: &str = "readingStreakData";
pub const COMMUNITY_CHALLENGE: &str = "community-challenge";
