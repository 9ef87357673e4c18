use serde::{Deserialize, Serialize};

use crate::habits::StreakKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTaskRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStreakRequest {
    pub kind: StreakKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
    pub kind: StreakKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteHabitRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurahProgressRequest {
    pub surah_number: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HadithProgressRequest {
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuaProgressRequest {
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HijriRequest {
    /// `%Y-%m-%d`; defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageGetRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSetRequest {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}
