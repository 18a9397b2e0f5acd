use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::media_object::{
    MediaObject as DomainMediaObject, NewMediaObject as DomainNewMediaObject,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::media_objects)]
pub struct MediaObject {
    pub id: i32,
    pub file_path: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::media_objects)]
pub struct NewMediaObject<'a> {
    pub file_path: &'a str,
}

impl From<MediaObject> for DomainMediaObject {
    fn from(value: MediaObject) -> Self {
        Self {
            id: value.id,
            file_path: value.file_path,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewMediaObject> for NewMediaObject<'a> {
    fn from(value: &'a DomainNewMediaObject) -> Self {
        Self {
            file_path: value.file_path.as_str(),
        }
    }
}
