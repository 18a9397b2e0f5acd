use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{self, DEFAULT_TAX_PERCENT};

/// Domain representation of a product listed in the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to users.
    pub description: String,
    /// Base price without tax.
    pub price: Decimal,
    /// Tax rate in percent.
    pub tax: Decimal,
    /// Tax-inclusive price derived from `price` and `tax` on every write.
    pub price_tax: Decimal,
    /// Taxonomy the product belongs to.
    pub taxonomy_id: i32,
    /// Optional media object used as the product image.
    pub image_id: Option<i32>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
///
/// There is no way to supply the tax-inclusive price: the repository derives it
/// right before the row is written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to users.
    pub description: String,
    /// Base price without tax.
    pub price: Decimal,
    /// Tax rate in percent.
    pub tax: Decimal,
    /// Taxonomy the product belongs to.
    pub taxonomy_id: i32,
    /// Optional media object used as the product image.
    pub image_id: Option<i32>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload taxed at the default rate.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        taxonomy_id: i32,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: name.into(),
            description: description.into(),
            price,
            tax: DEFAULT_TAX_PERCENT,
            taxonomy_id,
            image_id: None,
            updated_at: now,
        }
    }

    /// Override the tax rate applied to the product.
    pub fn with_tax(mut self, tax: Decimal) -> Self {
        self.tax = tax;
        self
    }

    /// Attach an image to the product payload.
    pub fn with_image_id(mut self, image_id: i32) -> Self {
        self.image_id = Some(image_id);
        self
    }

    /// Tax-inclusive price for this payload.
    pub fn price_tax(&self) -> Decimal {
        pricing::price_with_tax(self.price, self.tax)
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional description update.
    pub description: Option<String>,
    /// Optional price update.
    pub price: Option<Decimal>,
    /// Optional tax rate update.
    pub tax: Option<Decimal>,
    /// Optional taxonomy reassignment.
    pub taxonomy_id: Option<i32>,
    /// Optional image update; `Some(None)` detaches the current image.
    pub image_id: Option<Option<i32>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            description: None,
            price: None,
            tax: None,
            taxonomy_id: None,
            image_id: None,
            updated_at: now,
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the product description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the base price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Update the tax rate.
    pub fn tax(mut self, tax: Decimal) -> Self {
        self.tax = Some(tax);
        self
    }

    /// Move the product to another taxonomy.
    pub fn taxonomy_id(mut self, taxonomy_id: i32) -> Self {
        self.taxonomy_id = Some(taxonomy_id);
        self
    }

    /// Replace the product image, using `None` to detach it.
    pub fn image_id(mut self, image_id: Option<i32>) -> Self {
        self.image_id = Some(image_id);
        self
    }

    /// Apply the patch on top of `current`, recomputing the tax-inclusive price.
    pub fn apply_to(&self, current: &Product) -> Product {
        let price = self.price.unwrap_or(current.price);
        let tax = self.tax.unwrap_or(current.tax);

        Product {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            price,
            tax,
            price_tax: pricing::price_with_tax(price, tax),
            taxonomy_id: self.taxonomy_id.unwrap_or(current.taxonomy_id),
            image_id: self.image_id.unwrap_or(current.image_id),
            created_at: current.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Inclusive and exclusive bounds applied to the product price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRange {
    /// Lower bound; the flag tells whether the bound itself matches.
    pub lower: Option<(Decimal, bool)>,
    /// Upper bound; the flag tells whether the bound itself matches.
    pub upper: Option<(Decimal, bool)>,
}

impl PriceRange {
    /// Range matching prices between `low` and `high`, both included.
    pub fn between(low: Decimal, high: Decimal) -> Self {
        Self {
            lower: Some((low, true)),
            upper: Some((high, true)),
        }
    }

    /// Narrow the lower bound; the tighter of the current and new bound wins.
    pub fn with_lower(mut self, bound: Decimal, inclusive: bool) -> Self {
        self.lower = match self.lower {
            Some((current, current_inclusive))
                if current > bound || (current == bound && !current_inclusive) =>
            {
                Some((current, current_inclusive))
            }
            _ => Some((bound, inclusive)),
        };
        self
    }

    /// Narrow the upper bound; the tighter of the current and new bound wins.
    pub fn with_upper(mut self, bound: Decimal, inclusive: bool) -> Self {
        self.upper = match self.upper {
            Some((current, current_inclusive))
                if current < bound || (current == bound && !current_inclusive) =>
            {
                Some((current, current_inclusive))
            }
            _ => Some((bound, inclusive)),
        };
        self
    }

    /// Whether no bound has been set.
    pub fn is_empty(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional exact identifier filter.
    pub id: Option<i32>,
    /// Optional exact taxonomy filter.
    pub taxonomy_id: Option<i32>,
    /// Optional case-insensitive substring of the name.
    pub name: Option<String>,
    /// Optional case-insensitive substring of the description.
    pub description: Option<String>,
    /// Optional bounds on the base price.
    pub price: PriceRange,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by exact identifier.
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Filter the results by taxonomy.
    pub fn taxonomy(mut self, taxonomy_id: i32) -> Self {
        self.taxonomy_id = Some(taxonomy_id);
        self
    }

    /// Filter the results by a partial, case-insensitive name match.
    pub fn name(mut self, term: impl Into<String>) -> Self {
        self.name = Some(term.into());
        self
    }

    /// Filter the results by a partial, case-insensitive description match.
    pub fn description(mut self, term: impl Into<String>) -> Self {
        self.description = Some(term.into());
        self
    }

    /// Restrict the results to the given price range.
    pub fn price(mut self, range: PriceRange) -> Self {
        self.price = range;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal literal")
    }

    fn stored_product() -> Product {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Product {
            id: 3,
            name: "Lamp".to_string(),
            description: "Desk lamp".to_string(),
            price: dec("10.00"),
            tax: dec("21.00"),
            price_tax: dec("12.10"),
            taxonomy_id: 1,
            image_id: Some(4),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn new_product_defaults_to_standard_tax() {
        let product = NewProduct::new("Lamp", "Desk lamp", dec("100"), 1);

        assert_eq!(product.tax, dec("21"));
        assert_eq!(product.price_tax(), dec("121.00"));
    }

    #[test]
    fn patch_recomputes_price_tax_from_merged_values() {
        let current = stored_product();

        let price_only = UpdateProduct::new().price(dec("20.00")).apply_to(&current);
        assert_eq!(price_only.price_tax, dec("24.20"));

        let tax_only = UpdateProduct::new().tax(dec("10")).apply_to(&current);
        assert_eq!(tax_only.price_tax, dec("11.00"));

        let zero_tax = UpdateProduct::new().tax(Decimal::ZERO).apply_to(&current);
        assert_eq!(zero_tax.price_tax, Decimal::ZERO);
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let current = stored_product();

        let renamed = UpdateProduct::new().name("Floor lamp").apply_to(&current);

        assert_eq!(renamed.name, "Floor lamp");
        assert_eq!(renamed.description, "Desk lamp");
        assert_eq!(renamed.image_id, Some(4));
        assert_eq!(renamed.price_tax, dec("12.10"));

        let detached = UpdateProduct::new().image_id(None).apply_to(&current);
        assert_eq!(detached.image_id, None);
    }

    #[test]
    fn price_range_bounds() {
        let range = PriceRange::between(dec("2.25"), dec("3.25"));
        assert_eq!(range.lower, Some((dec("2.25"), true)));
        assert_eq!(range.upper, Some((dec("3.25"), true)));
        assert!(!range.is_empty());
        assert!(PriceRange::default().is_empty());
    }

    #[test]
    fn price_range_keeps_tightest_bounds() {
        let range = PriceRange::default()
            .with_lower(dec("1"), true)
            .with_lower(dec("2"), false)
            .with_lower(dec("2"), true)
            .with_upper(dec("10"), true)
            .with_upper(dec("20"), false);

        assert_eq!(range.lower, Some((dec("2"), false)));
        assert_eq!(range.upper, Some((dec("10"), true)));
    }
}
