use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::media_object::{MediaObject, MediaObjectListQuery, NewMediaObject};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::taxonomy::{
    NewTaxonomy, Taxonomy, TaxonomyDeletion, TaxonomyListQuery, UpdateTaxonomy,
};

pub mod media_object;
pub mod product;
pub mod taxonomy;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
///
/// Implementations derive the tax-inclusive price immediately before the row
/// is written, on both create and update.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over taxonomy records.
pub trait TaxonomyReader {
    fn get_taxonomy_by_id(&self, id: i32) -> RepositoryResult<Option<Taxonomy>>;
    fn list_taxonomies(
        &self,
        query: TaxonomyListQuery,
    ) -> RepositoryResult<(usize, Vec<Taxonomy>)>;
}

/// Write operations over taxonomy records.
pub trait TaxonomyWriter {
    fn create_taxonomy(&self, new_taxonomy: &NewTaxonomy) -> RepositoryResult<Taxonomy>;
    fn update_taxonomy(
        &self,
        taxonomy_id: i32,
        updates: &UpdateTaxonomy,
    ) -> RepositoryResult<Taxonomy>;
    /// Delete the taxonomy unless products still reference it.
    fn delete_taxonomy(&self, taxonomy_id: i32) -> RepositoryResult<TaxonomyDeletion>;
}

/// Read-only operations over uploaded files.
pub trait MediaObjectReader {
    fn get_media_object_by_id(&self, id: i32) -> RepositoryResult<Option<MediaObject>>;
    fn list_media_objects(
        &self,
        query: MediaObjectListQuery,
    ) -> RepositoryResult<(usize, Vec<MediaObject>)>;
}

/// Write operations over uploaded files.
pub trait MediaObjectWriter {
    fn create_media_object(&self, new_media: &NewMediaObject) -> RepositoryResult<MediaObject>;
}

/// Offset and limit for a 1-based page.
///
/// Offsets past `i64::MAX` saturate, which selects an empty page.
fn page_bounds(page: usize, per_page: usize) -> (i64, i64) {
    let offset = (page.max(1) - 1)
        .checked_mul(per_page)
        .and_then(|offset| i64::try_from(offset).ok())
        .unwrap_or(i64::MAX);
    let limit = i64::try_from(per_page).unwrap_or(i64::MAX);
    (offset, limit)
}

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_one_based() {
        assert_eq!(page_bounds(1, 5), (0, 5));
        assert_eq!(page_bounds(2, 5), (5, 5));
        assert_eq!(page_bounds(0, 30), (0, 30));
    }

    #[test]
    fn page_bounds_saturate_huge_pages() {
        assert_eq!(page_bounds(usize::MAX, 5), (i64::MAX, 5));
        assert_eq!(page_bounds(3_689_348_814_741_910_324, 5), (i64::MAX, 5));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("dolores"), "%dolores%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
