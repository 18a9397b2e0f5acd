use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::routes::empty_string_as_none;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PRODUCTS_PER_PAGE;
use crate::domain::product::{PriceRange, Product, ProductListQuery};
use crate::forms::Violation;
use crate::forms::products::{AddProductForm, EditProductForm, ProductFormError};
use crate::hydra::{MEDIA_OBJECTS, Page, TAXONOMIES, iri, parse_iri};
use crate::repository::{MediaObjectReader, ProductReader, ProductWriter, TaxonomyReader};
use crate::services::{ServiceError, ServiceResult, requested_page};

/// Query parameters accepted by the products collection.
///
/// Values stay textual so malformed filters can be skipped instead of failing
/// the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Exact product identifier.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<String>,
    /// Taxonomy IRI or identifier.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub taxonomy: Option<String>,
    /// Partial, case-insensitive name match.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    /// Partial, case-insensitive description match.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    /// Price bounds passed as `price[between]=a..b`, `price[gte]=a`, ...
    #[serde(default)]
    pub price: PriceFilter,
    /// Page requested by the client (1-based).
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<String>,
}

/// Bracketed price filters.
#[derive(Debug, Default, Deserialize)]
pub struct PriceFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub between: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gt: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gte: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub lt: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub lte: Option<String>,
}

impl PriceFilter {
    fn to_range(&self) -> PriceRange {
        let mut range = PriceRange::default();

        if let Some(raw) = self.between.as_deref() {
            match parse_between(raw) {
                Some((low, high)) => {
                    range = range.with_lower(low, true).with_upper(high, true);
                }
                None => log::warn!("Ignoring malformed price[between] filter `{raw}`"),
            }
        }
        if let Some(bound) = parse_bound("gt", self.gt.as_deref()) {
            range = range.with_lower(bound, false);
        }
        if let Some(bound) = parse_bound("gte", self.gte.as_deref()) {
            range = range.with_lower(bound, true);
        }
        if let Some(bound) = parse_bound("lt", self.lt.as_deref()) {
            range = range.with_upper(bound, false);
        }
        if let Some(bound) = parse_bound("lte", self.lte.as_deref()) {
            range = range.with_upper(bound, true);
        }

        range
    }
}

fn parse_between(raw: &str) -> Option<(Decimal, Decimal)> {
    let (low, high) = raw.split_once("..")?;
    let low = low.trim().parse::<Decimal>().ok()?;
    let high = high.trim().parse::<Decimal>().ok()?;
    Some((low, high))
}

fn parse_bound(operator: &str, raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?;
    match raw.trim().parse::<Decimal>() {
        Ok(bound) => Some(bound),
        Err(_) => {
            log::warn!("Ignoring malformed price[{operator}] filter `{raw}`");
            None
        }
    }
}

impl ProductsQuery {
    /// Translate the request parameters into a repository query for `page`.
    fn to_list_query(&self, page: usize) -> ProductListQuery {
        let mut list_query = ProductListQuery::new().paginate(page, PRODUCTS_PER_PAGE);

        if let Some(raw) = self.id.as_deref() {
            match raw.trim().parse::<i32>() {
                Ok(id) => list_query = list_query.id(id),
                Err(_) => log::warn!("Ignoring malformed id filter `{raw}`"),
            }
        }

        if let Some(raw) = self.taxonomy.as_deref() {
            match parse_iri(raw, TAXONOMIES) {
                Some(taxonomy_id) => list_query = list_query.taxonomy(taxonomy_id),
                None => log::warn!("Ignoring malformed taxonomy filter `{raw}`"),
            }
        }

        if let Some(term) = self.name.as_deref() {
            list_query = list_query.name(term);
        }

        if let Some(term) = self.description.as_deref() {
            list_query = list_query.description(term);
        }

        let range = self.price.to_range();
        if !range.is_empty() {
            list_query = list_query.price(range);
        }

        list_query
    }
}

/// Product as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub price_tax: Decimal,
    /// IRI of the owning taxonomy.
    pub taxonomy: String,
    /// IRI of the attached image, `null` when there is none.
    pub image: Option<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            tax: product.tax,
            price_tax: product.price_tax,
            taxonomy: iri(TAXONOMIES, product.taxonomy_id),
            image: product.image_id.map(|image_id| iri(MEDIA_OBJECTS, image_id)),
        }
    }
}

/// Loads one page of products matching the query.
pub fn load_products_page<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Page<ProductView>>
where
    R: ProductReader + ?Sized,
{
    let page = requested_page(query.page.as_deref());
    let list_query = query.to_list_query(page);

    let (total, items) = repo.list_products(list_query)?;
    let items = items.into_iter().map(ProductView::from).collect();

    Ok(Page::new(items, total, page, PRODUCTS_PER_PAGE))
}

/// Loads a single product.
pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<ProductView>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)?
        .map(ProductView::from)
        .ok_or(ServiceError::NotFound)
}

/// Creates a product after validating the payload and its references.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<ProductView>
where
    R: ProductWriter + TaxonomyReader + MediaObjectReader + ?Sized,
{
    let new_product = form.into_new_product().map_err(form_error)?;

    let (taxonomy_id, image_id) = (Some(new_product.taxonomy_id), new_product.image_id);
    ensure_references_exist(repo, taxonomy_id, image_id)?;

    let created = repo
        .create_product(&new_product)
        .map_err(|err| write_error(repo, err, taxonomy_id, image_id))?;
    log::info!("Created product {}", created.id);

    Ok(created.into())
}

/// Replaces the supplied fields of a product; other fields keep their values.
pub fn update_product<R>(
    repo: &R,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<ProductView>
where
    R: ProductReader + ProductWriter + TaxonomyReader + MediaObjectReader + ?Sized,
{
    if repo.get_product_by_id(product_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let updates = form.into_update_product().map_err(form_error)?;

    let (taxonomy_id, image_id) = (updates.taxonomy_id, updates.image_id.flatten());
    ensure_references_exist(repo, taxonomy_id, image_id)?;

    let updated = repo
        .update_product(product_id, &updates)
        .map_err(|err| write_error(repo, err, taxonomy_id, image_id))?;

    Ok(updated.into())
}

/// Deletes a product.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id)?;
    log::info!("Deleted product {product_id}");
    Ok(())
}

fn form_error(err: ProductFormError) -> ServiceError {
    match err {
        ProductFormError::Violations(violations) => ServiceError::Validation(violations),
    }
}

fn ensure_references_exist<R>(
    repo: &R,
    taxonomy_id: Option<i32>,
    image_id: Option<i32>,
) -> ServiceResult<()>
where
    R: TaxonomyReader + MediaObjectReader + ?Sized,
{
    let mut violations = Vec::new();

    if let Some(taxonomy_id) = taxonomy_id {
        if repo.get_taxonomy_by_id(taxonomy_id)?.is_none() {
            violations.push(item_not_found("taxonomy", TAXONOMIES, taxonomy_id));
        }
    }

    if let Some(image_id) = image_id {
        if repo.get_media_object_by_id(image_id)?.is_none() {
            violations.push(item_not_found("image", MEDIA_OBJECTS, image_id));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(violations))
    }
}

/// A write reports `NotFound` when a reference disappeared after it was checked;
/// name the reference if that is the case.
fn write_error<R>(
    repo: &R,
    err: RepositoryError,
    taxonomy_id: Option<i32>,
    image_id: Option<i32>,
) -> ServiceError
where
    R: TaxonomyReader + MediaObjectReader + ?Sized,
{
    match err {
        RepositoryError::NotFound => match ensure_references_exist(repo, taxonomy_id, image_id) {
            Err(err) => err,
            Ok(()) => ServiceError::NotFound,
        },
        other => ServiceError::from(other),
    }
}

fn item_not_found(property_path: &str, collection: &str, id: i32) -> Violation {
    Violation::new(
        property_path,
        format!("Item not found for \"{}\".", iri(collection, id)),
    )
}
