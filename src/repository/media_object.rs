use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::media_object::{
    MediaObject as DomainMediaObject, MediaObjectListQuery,
    NewMediaObject as DomainNewMediaObject,
};
use crate::models::media_object::{
    MediaObject as DbMediaObject, NewMediaObject as DbNewMediaObject,
};
use crate::repository::{DieselRepository, MediaObjectReader, MediaObjectWriter, page_bounds};
use crate::schema::media_objects;

impl MediaObjectReader for DieselRepository {
    fn get_media_object_by_id(&self, id: i32) -> RepositoryResult<Option<DomainMediaObject>> {
        let mut conn = self.conn()?;

        let media = media_objects::table
            .filter(media_objects::id.eq(id))
            .first::<DbMediaObject>(&mut conn)
            .optional()?;

        Ok(media.map(DomainMediaObject::from))
    }

    fn list_media_objects(
        &self,
        query: MediaObjectListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainMediaObject>)> {
        let mut conn = self.conn()?;

        let total = media_objects::table
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = media_objects::table
            .order(media_objects::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let media = items.load::<DbMediaObject>(&mut conn)?;

        Ok((total, media.into_iter().map(DomainMediaObject::from).collect()))
    }
}

impl MediaObjectWriter for DieselRepository {
    fn create_media_object(
        &self,
        new_media: &DomainNewMediaObject,
    ) -> RepositoryResult<DomainMediaObject> {
        let mut conn = self.conn()?;

        let insertable = DbNewMediaObject::from(new_media);
        let created = diesel::insert_into(media_objects::table)
            .values(&insertable)
            .get_result::<DbMediaObject>(&mut conn)?;

        Ok(created.into())
    }
}
