use std::collections::HashMap;

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::taxonomy::{
    NewTaxonomy as DomainNewTaxonomy, Taxonomy as DomainTaxonomy, TaxonomyDeletion,
    TaxonomyListQuery, UpdateTaxonomy as DomainUpdateTaxonomy,
};
use crate::models::search_key;
use crate::models::taxonomy::{
    NewTaxonomy as DbNewTaxonomy, Taxonomy as DbTaxonomy, UpdateTaxonomy as DbUpdateTaxonomy,
};
use crate::repository::{
    DieselRepository, TaxonomyReader, TaxonomyWriter, contains_pattern, page_bounds,
};
use crate::schema::{products, taxonomies};

impl TaxonomyReader for DieselRepository {
    fn get_taxonomy_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTaxonomy>> {
        let mut conn = self.conn()?;

        let taxonomy = taxonomies::table
            .filter(taxonomies::id.eq(id))
            .first::<DbTaxonomy>(&mut conn)
            .optional()?;

        match taxonomy {
            Some(db_taxonomy) => {
                let mut domain: DomainTaxonomy = db_taxonomy.into();
                let mut product_ids = load_product_ids_for_taxonomies(&mut conn, &[domain.id])?;
                domain.product_ids = product_ids.remove(&domain.id).unwrap_or_default();
                Ok(Some(domain))
            }
            None => Ok(None),
        }
    }

    fn list_taxonomies(
        &self,
        query: TaxonomyListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainTaxonomy>)> {
        let mut conn = self.conn()?;

        let mut count_query = taxonomies::table.into_boxed::<Sqlite>();
        if let Some(term) = query.name.as_ref() {
            count_query = count_query.filter(
                taxonomies::name_search
                    .like(contains_pattern(&search_key(term)))
                    .escape('\\'),
            );
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = taxonomies::table.into_boxed::<Sqlite>();
        if let Some(term) = query.name.as_ref() {
            items = items.filter(
                taxonomies::name_search
                    .like(contains_pattern(&search_key(term)))
                    .escape('\\'),
            );
        }
        items = items.order(taxonomies::id.asc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let db_taxonomies = items.load::<DbTaxonomy>(&mut conn)?;
        if db_taxonomies.is_empty() {
            return Ok((total, Vec::new()));
        }

        let ids: Vec<i32> = db_taxonomies.iter().map(|taxonomy| taxonomy.id).collect();
        let mut product_map = load_product_ids_for_taxonomies(&mut conn, &ids)?;

        let mut domain_taxonomies = Vec::with_capacity(db_taxonomies.len());
        for db_taxonomy in db_taxonomies {
            let mut domain: DomainTaxonomy = db_taxonomy.into();
            domain.product_ids = product_map.remove(&domain.id).unwrap_or_default();
            domain_taxonomies.push(domain);
        }

        Ok((total, domain_taxonomies))
    }
}

impl TaxonomyWriter for DieselRepository {
    fn create_taxonomy(
        &self,
        new_taxonomy: &DomainNewTaxonomy,
    ) -> RepositoryResult<DomainTaxonomy> {
        let mut conn = self.conn()?;

        let insertable = DbNewTaxonomy::from(new_taxonomy);
        let created = diesel::insert_into(taxonomies::table)
            .values(&insertable)
            .get_result::<DbTaxonomy>(&mut conn)?;

        Ok(created.into())
    }

    fn update_taxonomy(
        &self,
        taxonomy_id: i32,
        updates: &DomainUpdateTaxonomy,
    ) -> RepositoryResult<DomainTaxonomy> {
        let mut conn = self.conn()?;

        let db_updates = DbUpdateTaxonomy::from(updates);
        let updated = diesel::update(taxonomies::table.filter(taxonomies::id.eq(taxonomy_id)))
            .set(&db_updates)
            .get_result::<DbTaxonomy>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        let mut domain: DomainTaxonomy = updated.into();
        let mut product_ids = load_product_ids_for_taxonomies(&mut conn, &[domain.id])?;
        domain.product_ids = product_ids.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn delete_taxonomy(&self, taxonomy_id: i32) -> RepositoryResult<TaxonomyDeletion> {
        let mut conn = self.conn()?;

        conn.transaction::<TaxonomyDeletion, RepositoryError, _>(|conn| {
            ensure_taxonomy_exists(conn, taxonomy_id)?;

            let in_use = products::table
                .filter(products::taxonomy_id.eq(taxonomy_id))
                .count()
                .get_result::<i64>(conn)? as usize;
            if in_use > 0 {
                return Ok(TaxonomyDeletion::InUse(in_use));
            }

            diesel::delete(taxonomies::table.filter(taxonomies::id.eq(taxonomy_id)))
                .execute(conn)?;

            Ok(TaxonomyDeletion::Deleted)
        })
    }
}

fn ensure_taxonomy_exists(conn: &mut SqliteConnection, taxonomy_id: i32) -> RepositoryResult<()> {
    let exists = select(exists(
        taxonomies::table.filter(taxonomies::id.eq(taxonomy_id)),
    ))
    .get_result(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

fn load_product_ids_for_taxonomies(
    conn: &mut SqliteConnection,
    taxonomy_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    if taxonomy_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = products::table
        .filter(products::taxonomy_id.eq_any(taxonomy_ids))
        .select((products::taxonomy_id, products::id))
        .order(products::id.asc())
        .load::<(i32, i32)>(conn)?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for (taxonomy_id, product_id) in rows {
        map.entry(taxonomy_id).or_default().push(product_id);
    }

    Ok(map)
}
