use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::pricing::{from_scaled, to_scaled};
use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::models::search_key;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub tax_basis_points: i32,
    pub price_tax_cents: i64,
    pub taxonomy_id: i32,
    pub image_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name_search: String,
    pub description_search: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub tax_basis_points: i32,
    pub price_tax_cents: i64,
    pub taxonomy_id: i32,
    pub image_id: Option<i32>,
    pub updated_at: NaiveDateTime,
    pub name_search: String,
    pub description_search: String,
}

impl<'a> NewProduct<'a> {
    /// Build the insertable row for `value` with its freshly derived `price_tax`.
    pub fn new(value: &'a DomainNewProduct, price_tax: Decimal) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_str(),
            price_cents: amount_to_cents(value.price),
            tax_basis_points: percent_to_basis_points(value.tax),
            price_tax_cents: amount_to_cents(price_tax),
            taxonomy_id: value.taxonomy_id,
            image_id: value.image_id,
            updated_at: value.updated_at,
            name_search: search_key(&value.name),
            description_search: search_key(&value.description),
        }
    }
}

/// Full row replacement written after a patch has been merged.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub tax_basis_points: i32,
    pub price_tax_cents: i64,
    pub taxonomy_id: i32,
    pub image_id: Option<i32>,
    pub updated_at: NaiveDateTime,
    pub name_search: String,
    pub description_search: String,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: from_scaled(value.price_cents),
            tax: from_scaled(i64::from(value.tax_basis_points)),
            price_tax: from_scaled(value.price_tax_cents),
            taxonomy_id: value.taxonomy_id,
            image_id: value.image_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainProduct) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_str(),
            price_cents: amount_to_cents(value.price),
            tax_basis_points: percent_to_basis_points(value.tax),
            price_tax_cents: amount_to_cents(value.price_tax),
            taxonomy_id: value.taxonomy_id,
            image_id: value.image_id,
            updated_at: value.updated_at,
            name_search: search_key(&value.name),
            description_search: search_key(&value.description),
        }
    }
}

// Forms cap amounts well below these limits; saturate instead of wrapping.
fn amount_to_cents(value: Decimal) -> i64 {
    to_scaled(value).unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn percent_to_basis_points(value: Decimal) -> i32 {
    let scaled = amount_to_cents(value);
    i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal literal")
    }

    #[test]
    fn new_row_stores_scaled_amounts() {
        let product = DomainNewProduct::new("Lamp", "Desk lamp", dec("200.25"), 5);
        let price_tax = product.price_tax();

        let row = NewProduct::new(&product, price_tax);

        assert_eq!(row.price_cents, 20025);
        assert_eq!(row.tax_basis_points, 2100);
        assert_eq!(row.price_tax_cents, 24230);
        assert_eq!(row.taxonomy_id, 5);
        assert_eq!(row.name_search, "lamp");
        assert_eq!(row.description_search, "desk lamp");
    }

    #[test]
    fn row_converts_back_to_decimals() {
        let row = Product {
            id: 1,
            name: "Lamp".to_string(),
            description: "Desk lamp".to_string(),
            price_cents: 1050,
            tax_basis_points: 750,
            price_tax_cents: 1129,
            taxonomy_id: 2,
            image_id: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            name_search: "lamp".to_string(),
            description_search: "desk lamp".to_string(),
        };

        let product = DomainProduct::from(row);

        assert_eq!(product.price.to_string(), "10.50");
        assert_eq!(product.tax.to_string(), "7.50");
        assert_eq!(product.price_tax.to_string(), "11.29");
    }
}
