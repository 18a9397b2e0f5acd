use pushkind_common::routes::empty_string_as_none;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_ITEMS_PER_PAGE;
use crate::domain::taxonomy::{Taxonomy, TaxonomyDeletion, TaxonomyListQuery};
use crate::forms::taxonomies::{AddTaxonomyForm, EditTaxonomyForm, TaxonomyFormError};
use crate::hydra::{PRODUCTS, Page, iri};
use crate::repository::{TaxonomyReader, TaxonomyWriter};
use crate::services::{ServiceError, ServiceResult, requested_page};

/// Query parameters accepted by the taxonomies collection.
#[derive(Debug, Default, Deserialize)]
pub struct TaxonomiesQuery {
    /// Partial, case-insensitive name match.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    /// Page requested by the client (1-based).
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<String>,
}

/// Taxonomy as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyView {
    pub id: i32,
    pub name: String,
    /// IRIs of the products filed under this taxonomy.
    pub products: Vec<String>,
}

impl From<Taxonomy> for TaxonomyView {
    fn from(taxonomy: Taxonomy) -> Self {
        Self {
            id: taxonomy.id,
            name: taxonomy.name,
            products: taxonomy
                .product_ids
                .into_iter()
                .map(|product_id| iri(PRODUCTS, product_id))
                .collect(),
        }
    }
}

/// Loads one page of taxonomies.
pub fn load_taxonomies_page<R>(
    repo: &R,
    query: TaxonomiesQuery,
) -> ServiceResult<Page<TaxonomyView>>
where
    R: TaxonomyReader + ?Sized,
{
    let page = requested_page(query.page.as_deref());
    let mut list_query = TaxonomyListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.name.as_deref() {
        list_query = list_query.name(term);
    }

    let (total, items) = repo.list_taxonomies(list_query)?;
    let items = items.into_iter().map(TaxonomyView::from).collect();

    Ok(Page::new(items, total, page, DEFAULT_ITEMS_PER_PAGE))
}

/// Loads a single taxonomy together with its product references.
pub fn get_taxonomy<R>(repo: &R, taxonomy_id: i32) -> ServiceResult<TaxonomyView>
where
    R: TaxonomyReader + ?Sized,
{
    repo.get_taxonomy_by_id(taxonomy_id)?
        .map(TaxonomyView::from)
        .ok_or(ServiceError::NotFound)
}

/// Creates a taxonomy.
pub fn create_taxonomy<R>(repo: &R, form: AddTaxonomyForm) -> ServiceResult<TaxonomyView>
where
    R: TaxonomyWriter + ?Sized,
{
    let new_taxonomy = form.into_new_taxonomy().map_err(form_error)?;

    let created = repo.create_taxonomy(&new_taxonomy)?;
    log::info!("Created taxonomy {}", created.id);

    Ok(created.into())
}

/// Renames a taxonomy.
pub fn update_taxonomy<R>(
    repo: &R,
    taxonomy_id: i32,
    form: EditTaxonomyForm,
) -> ServiceResult<TaxonomyView>
where
    R: TaxonomyReader + TaxonomyWriter + ?Sized,
{
    if repo.get_taxonomy_by_id(taxonomy_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let updates = form.into_update_taxonomy().map_err(form_error)?;
    let updated = repo.update_taxonomy(taxonomy_id, &updates)?;

    Ok(updated.into())
}

/// Deletes a taxonomy that no product references anymore.
pub fn remove_taxonomy<R>(repo: &R, taxonomy_id: i32) -> ServiceResult<()>
where
    R: TaxonomyWriter + ?Sized,
{
    match repo.delete_taxonomy(taxonomy_id)? {
        TaxonomyDeletion::Deleted => {
            log::info!("Deleted taxonomy {taxonomy_id}");
            Ok(())
        }
        TaxonomyDeletion::InUse(count) => Err(ServiceError::Conflict(format!(
            "Taxonomy {taxonomy_id} is still used by {count} product(s)."
        ))),
    }
}

fn form_error(err: TaxonomyFormError) -> ServiceError {
    match err {
        TaxonomyFormError::Violations(violations) => ServiceError::Validation(violations),
    }
}
