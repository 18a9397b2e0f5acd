use mockall::mock;

use super::{
    MediaObjectReader, MediaObjectWriter, ProductReader, ProductWriter, TaxonomyReader,
    TaxonomyWriter,
};
use crate::domain::{
    media_object::{MediaObject, MediaObjectListQuery, NewMediaObject},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    taxonomy::{NewTaxonomy, Taxonomy, TaxonomyDeletion, TaxonomyListQuery, UpdateTaxonomy},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub TaxonomyReader {}

    impl TaxonomyReader for TaxonomyReader {
        fn get_taxonomy_by_id(&self, id: i32) -> RepositoryResult<Option<Taxonomy>>;
        fn list_taxonomies(&self, query: TaxonomyListQuery) -> RepositoryResult<(usize, Vec<Taxonomy>)>;
    }
}

mock! {
    pub TaxonomyWriter {}

    impl TaxonomyWriter for TaxonomyWriter {
        fn create_taxonomy(&self, new_taxonomy: &NewTaxonomy) -> RepositoryResult<Taxonomy>;
        fn update_taxonomy(&self, taxonomy_id: i32, updates: &UpdateTaxonomy) -> RepositoryResult<Taxonomy>;
        fn delete_taxonomy(&self, taxonomy_id: i32) -> RepositoryResult<TaxonomyDeletion>;
    }
}

mock! {
    pub MediaObjectReader {}

    impl MediaObjectReader for MediaObjectReader {
        fn get_media_object_by_id(&self, id: i32) -> RepositoryResult<Option<MediaObject>>;
        fn list_media_objects(&self, query: MediaObjectListQuery) -> RepositoryResult<(usize, Vec<MediaObject>)>;
    }
}

mock! {
    pub MediaObjectWriter {}

    impl MediaObjectWriter for MediaObjectWriter {
        fn create_media_object(&self, new_media: &NewMediaObject) -> RepositoryResult<MediaObject>;
    }
}
