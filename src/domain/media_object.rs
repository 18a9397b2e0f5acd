use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of an uploaded file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MediaObject {
    /// Unique identifier of the media object.
    pub id: i32,
    /// File name relative to the upload directory.
    pub file_path: String,
    /// Timestamp for when the file was uploaded.
    pub created_at: NaiveDateTime,
}

impl MediaObject {
    /// Public URL of the stored file under `url_prefix`.
    pub fn content_url(&self, url_prefix: &str) -> String {
        format!("{}/{}", url_prefix.trim_end_matches('/'), self.file_path)
    }
}

/// Payload required to register a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaObject {
    /// File name relative to the upload directory.
    pub file_path: String,
}

impl NewMediaObject {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

/// Query definition used to list media objects.
#[derive(Debug, Clone, Default)]
pub struct MediaObjectListQuery {
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl MediaObjectListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
