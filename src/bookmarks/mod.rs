//! Saved content references, stored under `islamic-app-bookmarks`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::personalization::ContentType;
use crate::storage::{keys, Storage, StorageError};

#[derive(Error, Debug)]
pub enum BookmarksError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub content_type: ContentType,
    pub content_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BookmarkFile {
    bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookmarkRequest {
    pub content_type: ContentType,
    pub content_id: String,
    pub title: String,
}

fn load(storage: &Storage) -> BookmarkFile {
    storage.get(keys::BOOKMARKS).unwrap_or_default()
}

/// Newest first.
pub fn list(storage: &Storage) -> Vec<Bookmark> {
    let mut bookmarks = load(storage).bookmarks;
    bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookmarks
}

/// Re-bookmarking the same content refreshes the existing entry instead of
/// duplicating it.
pub fn add(storage: &Storage, request: &AddBookmarkRequest) -> Result<Bookmark, BookmarksError> {
    let mut file = load(storage);
    file.bookmarks
        .retain(|b| !(b.content_type == request.content_type && b.content_id == request.content_id));

    let bookmark = Bookmark {
        id: uuid::Uuid::new_v4().to_string(),
        content_type: request.content_type,
        content_id: request.content_id.clone(),
        title: request.title.clone(),
        created_at: Utc::now(),
    };
    file.bookmarks.push(bookmark.clone());
    storage.set(keys::BOOKMARKS, &file)?;
    Ok(bookmark)
}

pub fn remove(storage: &Storage, id: &str) -> Result<bool, BookmarksError> {
    let mut file = load(storage);
    let before = file.bookmarks.len();
    file.bookmarks.retain(|b| b.id != id);
    let removed = file.bookmarks.len() < before;
    if removed {
        storage.set(keys::BOOKMARKS, &file)?;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(content_id: &str) -> AddBookmarkRequest {
        AddBookmarkRequest {
            content_type: ContentType::Quran,
            content_id: content_id.to_string(),
            title: format!("Surah {}", content_id),
        }
    }

    #[test]
    fn test_add_and_list() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        add(&storage, &request("18")).unwrap();
        add(&storage, &request("36")).unwrap();

        assert_eq!(list(&storage).len(), 2);
    }

    #[test]
    fn test_same_content_does_not_duplicate() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        add(&storage, &request("18")).unwrap();
        add(&storage, &request("18")).unwrap();

        assert_eq!(list(&storage).len(), 1);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let bookmark = add(&storage, &request("18")).unwrap();
        assert!(remove(&storage, &bookmark.id).unwrap());
        assert!(!remove(&storage, &bookmark.id).unwrap());
        assert!(list(&storage).is_empty());
    }
}
