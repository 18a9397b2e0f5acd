use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, PriceRange, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    models::search_key,
    repository::{DieselRepository, ProductReader, ProductWriter, contains_pattern, page_bounds},
    schema::{media_objects, products, taxonomies},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = apply_filters(products::table.into_boxed::<Sqlite>(), &query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = apply_filters(products::table.into_boxed::<Sqlite>(), &query)
            .order(products::id.asc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;
        let products = db_products.into_iter().map(DomainProduct::from).collect();

        Ok((total, products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            ensure_references_exist(conn, new_product.taxonomy_id, new_product.image_id)?;

            let price_tax = new_product.price_tax();
            let db_new = DbNewProduct::new(new_product, price_tax);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            Ok(created.into())
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let current: DomainProduct = products::table
                .filter(products::id.eq(product_id))
                .first::<DbProduct>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?
                .into();

            let merged = updates.apply_to(&current);
            ensure_references_exist(conn, merged.taxonomy_id, merged.image_id)?;
            let db_updates = DbUpdateProduct::from(&merged);

            let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(products::table.filter(products::id.eq(product_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Fails with `NotFound` when the taxonomy or the image row is missing.
fn ensure_references_exist(
    conn: &mut SqliteConnection,
    taxonomy_id: i32,
    image_id: Option<i32>,
) -> RepositoryResult<()> {
    let taxonomy_exists: bool = select(exists(
        taxonomies::table.filter(taxonomies::id.eq(taxonomy_id)),
    ))
    .get_result(conn)?;
    if !taxonomy_exists {
        return Err(RepositoryError::NotFound);
    }

    if let Some(image_id) = image_id {
        let image_exists: bool = select(exists(
            media_objects::table.filter(media_objects::id.eq(image_id)),
        ))
        .get_result(conn)?;
        if !image_exists {
            return Err(RepositoryError::NotFound);
        }
    }

    Ok(())
}

fn apply_filters<'a>(
    mut items: products::BoxedQuery<'a, Sqlite>,
    query: &ProductListQuery,
) -> products::BoxedQuery<'a, Sqlite> {
    if let Some(id) = query.id {
        items = items.filter(products::id.eq(id));
    }

    if let Some(taxonomy_id) = query.taxonomy_id {
        items = items.filter(products::taxonomy_id.eq(taxonomy_id));
    }

    if let Some(term) = query.name.as_ref() {
        items = items.filter(
            products::name_search
                .like(contains_pattern(&search_key(term)))
                .escape('\\'),
        );
    }

    if let Some(term) = query.description.as_ref() {
        items = items.filter(
            products::description_search
                .like(contains_pattern(&search_key(term)))
                .escape('\\'),
        );
    }

    let (lower, upper) = cents_bounds(&query.price);
    if let Some(lower) = lower {
        items = items.filter(products::price_cents.ge(lower));
    }
    if let Some(upper) = upper {
        items = items.filter(products::price_cents.le(upper));
    }

    items
}

/// Translate a decimal price range into inclusive bounds on the stored cents.
fn cents_bounds(range: &PriceRange) -> (Option<i64>, Option<i64>) {
    let lower = range.lower.map(|(bound, inclusive)| {
        let scaled = bound * Decimal::ONE_HUNDRED;
        if inclusive {
            saturate(scaled.ceil())
        } else {
            saturate(scaled.floor()).saturating_add(1)
        }
    });
    let upper = range.upper.map(|(bound, inclusive)| {
        let scaled = bound * Decimal::ONE_HUNDRED;
        if inclusive {
            saturate(scaled.floor())
        } else {
            saturate(scaled.ceil()).saturating_sub(1)
        }
    });
    (lower, upper)
}

fn saturate(value: Decimal) -> i64 {
    value.to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal literal")
    }

    #[test]
    fn inclusive_bounds_round_inwards() {
        let range = PriceRange::between(dec("2.25"), dec("3.25"));
        assert_eq!(cents_bounds(&range), (Some(225), Some(325)));

        let range = PriceRange::between(dec("2.251"), dec("3.259"));
        assert_eq!(cents_bounds(&range), (Some(226), Some(325)));
    }

    #[test]
    fn exclusive_bounds_skip_the_bound_itself() {
        let range = PriceRange {
            lower: Some((dec("2.25"), false)),
            upper: Some((dec("3.25"), false)),
        };
        assert_eq!(cents_bounds(&range), (Some(226), Some(324)));

        let range = PriceRange {
            lower: Some((dec("2.255"), false)),
            upper: None,
        };
        assert_eq!(cents_bounds(&range), (Some(226), None));
    }
}
