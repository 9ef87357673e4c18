//! Habit tracking: daily task checklist, streak counters, the user's habit
//! list, and the community challenge card.
//!
//! Day boundaries follow the local calendar date, stored as `%Y-%m-%d`
//! strings and compared by parsing, the same way the app always did it.
//! Everything is recomputed on the UI action that touches it; there is no
//! background job.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{keys, Storage, StorageError};

#[derive(Error, Debug)]
pub enum HabitsError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    DailyReading,
    Prayer,
    Dhikr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakData {
    pub kind: StreakKind,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_updated: Option<String>,
}

impl StreakData {
    fn new(kind: StreakKind) -> Self {
        Self {
            kind,
            current_streak: 0,
            longest_streak: 0,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StreakFile {
    streaks: Vec<StreakData>,
}

fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn days_between(earlier: &str, later: NaiveDate) -> Option<i64> {
    let parsed = NaiveDate::parse_from_str(earlier, "%Y-%m-%d").ok()?;
    Some(later.signed_duration_since(parsed).num_days())
}

/// Mark `today` complete: same-day repeats are no-ops, consecutive days
/// increment, anything else restarts at one.
fn apply_completion(streak: &mut StreakData, today: NaiveDate) {
    match streak
        .last_updated
        .as_deref()
        .and_then(|last| days_between(last, today))
    {
        Some(0) => return,
        Some(1) => streak.current_streak += 1,
        _ => streak.current_streak = 1,
    }
    streak.last_updated = Some(date_string(today));
    if streak.current_streak > streak.longest_streak {
        streak.longest_streak = streak.current_streak;
    }
}

/// A streak is broken the moment a full day has been skipped.
fn apply_skip_reset(streak: &mut StreakData, today: NaiveDate) -> bool {
    match streak
        .last_updated
        .as_deref()
        .and_then(|last| days_between(last, today))
    {
        Some(diff) if diff > 1 && streak.current_streak > 0 => {
            streak.current_streak = 0;
            true
        }
        _ => false,
    }
}

fn load_streaks(storage: &Storage) -> StreakFile {
    storage.get(keys::READING_STREAKS).unwrap_or_default()
}

/// Current streak state for one kind, applying the skip-reset check.
pub fn streak_for(storage: &Storage, kind: StreakKind) -> Result<StreakData, HabitsError> {
    let mut file = load_streaks(storage);
    let today = Local::now().date_naive();

    let entry = match file.streaks.iter_mut().find(|s| s.kind == kind) {
        Some(entry) => entry,
        None => return Ok(StreakData::new(kind)),
    };

    if apply_skip_reset(entry, today) {
        let snapshot = entry.clone();
        storage.set(keys::READING_STREAKS, &file)?;
        return Ok(snapshot);
    }
    Ok(entry.clone())
}

pub fn all_streaks(storage: &Storage) -> Result<Vec<StreakData>, HabitsError> {
    [StreakKind::DailyReading, StreakKind::Prayer, StreakKind::Dhikr]
        .into_iter()
        .map(|kind| streak_for(storage, kind))
        .collect()
}

/// Mark today complete for one streak kind.
pub fn record_streak_day(storage: &Storage, kind: StreakKind) -> Result<StreakData, HabitsError> {
    let mut file = load_streaks(storage);
    let today = Local::now().date_naive();

    if !file.streaks.iter().any(|s| s.kind == kind) {
        file.streaks.push(StreakData::new(kind));
    }
    let entry = file
        .streaks
        .iter_mut()
        .find(|s| s.kind == kind)
        .ok_or_else(|| HabitsError::NotFound(format!("streak {:?}", kind)))?;

    apply_completion(entry, today);
    let snapshot = entry.clone();
    storage.set(keys::READING_STREAKS, &file)?;
    Ok(snapshot)
}

// ========== Daily task checklist ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: String,
    pub tasks: Vec<DailyTask>,
    pub streak: u32,
}

const DEFAULT_TASKS: &[(&str, &str)] = &[
    ("fajr", "Pray Fajr on time"),
    ("quran", "Read Quran for 10 minutes"),
    ("morning-athkar", "Recite the morning athkar"),
    ("evening-athkar", "Recite the evening athkar"),
    ("dhikr", "A hundred counts of dhikr"),
];

fn fresh_daily(date: NaiveDate, streak: u32) -> DailyProgress {
    DailyProgress {
        date: date_string(date),
        tasks: DEFAULT_TASKS
            .iter()
            .map(|(id, title)| DailyTask {
                id: id.to_string(),
                title: title.to_string(),
                completed: false,
            })
            .collect(),
        streak,
    }
}

fn all_done(progress: &DailyProgress) -> bool {
    progress.tasks.iter().all(|t| t.completed)
}

/// Today's checklist, synthesized fresh when the key is absent or stale.
/// Yesterday's streak carries over only if yesterday was fully completed.
pub fn daily_progress(storage: &Storage) -> Result<DailyProgress, HabitsError> {
    let today = Local::now().date_naive();
    let stored: Option<DailyProgress> = storage.get(keys::DAILY_PROGRESS);

    let progress = match stored {
        Some(existing) if existing.date == date_string(today) => existing,
        Some(stale) => {
            let carried = match days_between(&stale.date, today) {
                Some(1) if all_done(&stale) => stale.streak,
                _ => 0,
            };
            let fresh = fresh_daily(today, carried);
            storage.set(keys::DAILY_PROGRESS, &fresh)?;
            fresh
        }
        None => {
            let fresh = fresh_daily(today, 0);
            storage.set(keys::DAILY_PROGRESS, &fresh)?;
            fresh
        }
    };
    Ok(progress)
}

/// Tick one task off. Completing the final task counts the day: the checklist
/// streak increments and the daily-reading streak is recorded.
pub fn complete_daily_task(storage: &Storage, task_id: &str) -> Result<DailyProgress, HabitsError> {
    let mut progress = daily_progress(storage)?;
    let was_done = all_done(&progress);

    let task = progress
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| HabitsError::NotFound(format!("task {}", task_id)))?;
    task.completed = true;

    if !was_done && all_done(&progress) {
        progress.streak += 1;
        record_streak_day(storage, StreakKind::DailyReading)?;
    }

    storage.set(keys::DAILY_PROGRESS, &progress)?;
    Ok(progress)
}

// ========== Habit list ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub kind: StreakKind,
    pub streak: StreakData,
    pub total_completions: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HabitFile {
    habits: Vec<Habit>,
}

fn starter_habits() -> Vec<Habit> {
    let make = |id: &str, name: &str, kind: StreakKind| Habit {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        streak: StreakData::new(kind),
        total_completions: 0,
    };
    vec![
        make("daily-reading", "Daily Quran reading", StreakKind::DailyReading),
        make("five-prayers", "All five prayers", StreakKind::Prayer),
        make("daily-dhikr", "Daily dhikr", StreakKind::Dhikr),
    ]
}

fn load_habits(storage: &Storage) -> HabitFile {
    match storage.get(keys::INTELLIGENT_HABITS) {
        Some(file) => file,
        None => HabitFile {
            habits: starter_habits(),
        },
    }
}

pub fn list_habits(storage: &Storage) -> Result<Vec<Habit>, HabitsError> {
    let mut file = load_habits(storage);
    let today = Local::now().date_naive();
    let mut changed = false;
    for habit in &mut file.habits {
        changed |= apply_skip_reset(&mut habit.streak, today);
    }
    if changed {
        storage.set(keys::INTELLIGENT_HABITS, &file)?;
    }
    Ok(file.habits)
}

pub fn add_habit(storage: &Storage, name: &str, kind: StreakKind) -> Result<Habit, HabitsError> {
    let mut file = load_habits(storage);
    let habit = Habit {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        kind,
        streak: StreakData::new(kind),
        total_completions: 0,
    };
    file.habits.push(habit.clone());
    storage.set(keys::INTELLIGENT_HABITS, &file)?;
    Ok(habit)
}

pub fn complete_habit(storage: &Storage, habit_id: &str) -> Result<Habit, HabitsError> {
    let mut file = load_habits(storage);
    let today = Local::now().date_naive();

    let habit = file
        .habits
        .iter_mut()
        .find(|h| h.id == habit_id)
        .ok_or_else(|| HabitsError::NotFound(format!("habit {}", habit_id)))?;

    let already_today = habit.streak.last_updated.as_deref() == Some(date_string(today).as_str());
    apply_completion(&mut habit.streak, today);
    if !already_today {
        habit.total_completions += 1;
    }

    let snapshot = habit.clone();
    storage.set(keys::INTELLIGENT_HABITS, &file)?;
    Ok(snapshot)
}

pub fn remove_habit(storage: &Storage, habit_id: &str) -> Result<bool, HabitsError> {
    let mut file = load_habits(storage);
    let before = file.habits.len();
    file.habits.retain(|h| h.id != habit_id);
    let removed = file.habits.len() < before;
    if removed {
        storage.set(keys::INTELLIGENT_HABITS, &file)?;
    }
    Ok(removed)
}

// ========== Community challenge ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_days: u32,
    pub joined: bool,
    pub joined_at: Option<String>,
    pub days_completed: u32,
    pub last_progress: Option<String>,
}

impl Challenge {
    pub fn percent_complete(&self) -> u32 {
        if self.target_days == 0 {
            return 0;
        }
        (self.days_completed * 100 / self.target_days).min(100)
    }
}

fn default_challenge() -> Challenge {
    Challenge {
        id: "thirty-days-of-quran".to_string(),
        title: "30 Days of Quran".to_string(),
        description: "Read at least one page every day for thirty days.".to_string(),
        target_days: 30,
        joined: false,
        joined_at: None,
        days_completed: 0,
        last_progress: None,
    }
}

pub fn challenge(storage: &Storage) -> Challenge {
    storage
        .get(keys::COMMUNITY_CHALLENGE)
        .unwrap_or_else(default_challenge)
}

pub fn join_challenge(storage: &Storage) -> Result<Challenge, HabitsError> {
    let mut current = challenge(storage);
    if !current.joined {
        current.joined = true;
        current.joined_at = Some(date_string(Local::now().date_naive()));
        storage.set(keys::COMMUNITY_CHALLENGE, &current)?;
    }
    Ok(current)
}

/// One day of progress; repeated calls on the same day do not double-count.
pub fn record_challenge_day(storage: &Storage) -> Result<Challenge, HabitsError> {
    let mut current = challenge(storage);
    if !current.joined {
        return Ok(current);
    }
    let today = date_string(Local::now().date_naive());
    if current.last_progress.as_deref() != Some(today.as_str())
        && current.days_completed < current.target_days
    {
        current.days_completed += 1;
        current.last_progress = Some(today);
        storage.set(keys::COMMUNITY_CHALLENGE, &current)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_completion_consecutive_days() {
        let mut streak = StreakData::new(StreakKind::DailyReading);
        apply_completion(&mut streak, date("2024-03-01"));
        apply_completion(&mut streak, date("2024-03-02"));
        apply_completion(&mut streak, date("2024-03-03"));

        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn test_completion_same_day_is_noop() {
        let mut streak = StreakData::new(StreakKind::Dhikr);
        apply_completion(&mut streak, date("2024-03-01"));
        apply_completion(&mut streak, date("2024-03-01"));

        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn test_completion_after_gap_restarts() {
        let mut streak = StreakData::new(StreakKind::Prayer);
        apply_completion(&mut streak, date("2024-03-01"));
        apply_completion(&mut streak, date("2024-03-02"));
        apply_completion(&mut streak, date("2024-03-05"));

        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
    }

    #[test]
    fn test_skip_reset_zeroes_current() {
        let mut streak = StreakData::new(StreakKind::DailyReading);
        apply_completion(&mut streak, date("2024-03-01"));
        apply_completion(&mut streak, date("2024-03-02"));

        assert!(apply_skip_reset(&mut streak, date("2024-03-04")));
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.longest_streak, 2);
    }

    #[test]
    fn test_skip_reset_keeps_yesterday() {
        let mut streak = StreakData::new(StreakKind::DailyReading);
        apply_completion(&mut streak, date("2024-03-01"));

        assert!(!apply_skip_reset(&mut streak, date("2024-03-02")));
        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn test_daily_progress_defaults() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let progress = daily_progress(&storage).unwrap();
        assert_eq!(progress.tasks.len(), 5);
        assert!(progress.tasks.iter().all(|t| !t.completed));
        assert_eq!(progress.streak, 0);
    }

    #[test]
    fn test_completing_all_tasks_counts_the_day() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let progress = daily_progress(&storage).unwrap();
        let ids: Vec<String> = progress.tasks.iter().map(|t| t.id.clone()).collect();

        let mut latest = progress;
        for id in &ids {
            latest = complete_daily_task(&storage, id).unwrap();
        }

        assert_eq!(latest.streak, 1);
        let streak = streak_for(&storage, StreakKind::DailyReading).unwrap();
        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let err = complete_daily_task(&storage, "nope").unwrap_err();
        assert!(matches!(err, HabitsError::NotFound(_)));
    }

    #[test]
    fn test_starter_habits_synthesized() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let habits = list_habits(&storage).unwrap();
        assert_eq!(habits.len(), 3);
    }

    #[test]
    fn test_complete_habit_counts_once_per_day() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let habit = add_habit(&storage, "Tahajjud", StreakKind::Prayer).unwrap();
        complete_habit(&storage, &habit.id).unwrap();
        let after = complete_habit(&storage, &habit.id).unwrap();

        assert_eq!(after.total_completions, 1);
        assert_eq!(after.streak.current_streak, 1);
    }

    #[test]
    fn test_challenge_join_and_progress() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        // Progress before joining is ignored.
        let untouched = record_challenge_day(&storage).unwrap();
        assert_eq!(untouched.days_completed, 0);

        join_challenge(&storage).unwrap();
        let after = record_challenge_day(&storage).unwrap();
        assert_eq!(after.days_completed, 1);

        // Same-day repeat does not double-count.
        let repeat = record_challenge_day(&storage).unwrap();
        assert_eq!(repeat.days_completed, 1);
        assert_eq!(repeat.percent_complete(), 3);
    }

    #[test]
    fn test_streak_for_unknown_kind_is_zero() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let streak = streak_for(&storage, StreakKind::Dhikr).unwrap();
        assert_eq!(streak.current_streak, 0);
        assert!(streak.last_updated.is_none());
    }
}
