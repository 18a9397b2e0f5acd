use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::pricing::round_amount;
use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{
    NOT_BLANK, NOT_DECIMAL, NOT_NULL, Violation, bounded_decimal, not_blank,
    nullable_reference_text, ordered_violations, reference_text, sanitize_inline_text,
    sanitize_multiline_text, scalar_text, violation_error,
};
use crate::hydra::{MEDIA_OBJECTS, TAXONOMIES, parse_iri};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 100;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a product description.
const DESCRIPTION_MAX_LEN: usize = 255;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Largest price representable with precision 10 and scale 2.
const PRICE_MAX: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

/// Largest absolute tax rate representable with precision 5 and scale 2.
const TAX_LIMIT: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

/// Properties in declaration order; violations are reported in this order.
const FIELD_ORDER: &[&str] = &["name", "description", "price", "tax", "taxonomy", "image"];

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// One or more properties failed validation.
    #[error("validation failed")]
    Violations(Vec<Violation>),
}

impl ProductFormError {
    fn single(property_path: &str, message: impl Into<String>) -> Self {
        Self::Violations(vec![Violation::new(property_path, message)])
    }
}

/// JSON payload accepted when creating a product.
///
/// Amounts are accepted as strings or numbers. `priceTax` is not part of the
/// payload and is silently ignored when sent.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(
        required(message = "This value should not be blank."),
        custom(function = "not_blank"),
        length(
            max = NAME_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 100 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[validate(
        required(message = "This value should not be blank."),
        custom(function = "not_blank"),
        length(
            max = DESCRIPTION_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 255 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[validate(
        required(message = "This value should not be blank."),
        custom(function = "validate_price")
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub price: Option<String>,
    #[validate(custom(function = "validate_tax"))]
    #[serde(default, deserialize_with = "scalar_text")]
    pub tax: Option<String>,
    /// Taxonomy IRI (`/taxonomies/{id}`) or bare identifier.
    #[serde(default, deserialize_with = "reference_text")]
    pub taxonomy: Option<String>,
    /// Media object IRI (`/media_objects/{id}`) or bare identifier.
    #[serde(default, deserialize_with = "reference_text")]
    pub image: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    ///
    /// References are only parsed once every field passed validation; whether
    /// they point to existing records is checked by the caller.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()
            .map_err(|errors| ProductFormError::Violations(ordered_violations(&errors, FIELD_ORDER)))?;

        let name = sanitize_inline_text(self.name.as_deref().unwrap_or_default());
        let description =
            sanitize_multiline_text(self.description.as_deref().unwrap_or_default());
        let price = parse_amount("price", self.price.as_deref().unwrap_or_default())?;

        let taxonomy = self
            .taxonomy
            .ok_or_else(|| ProductFormError::single("taxonomy", NOT_NULL))?;
        let taxonomy_id = parse_reference("taxonomy", &taxonomy, TAXONOMIES)?;

        let mut new_product = NewProduct::new(name, description, price, taxonomy_id);

        if let Some(tax) = self.tax.as_deref() {
            new_product = new_product.with_tax(parse_amount("tax", tax)?);
        }

        if let Some(image) = self.image.as_deref() {
            new_product = new_product.with_image_id(parse_reference("image", image, MEDIA_OBJECTS)?);
        }

        Ok(new_product)
    }
}

/// JSON payload accepted when replacing a product.
///
/// Properties left out keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(
        custom(function = "not_blank"),
        length(
            max = NAME_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 100 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[validate(
        custom(function = "not_blank"),
        length(
            max = DESCRIPTION_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 255 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[serde(default, deserialize_with = "scalar_text")]
    pub price: Option<String>,
    #[validate(custom(function = "validate_tax"))]
    #[serde(default, deserialize_with = "scalar_text")]
    pub tax: Option<String>,
    #[serde(default, deserialize_with = "reference_text")]
    pub taxonomy: Option<String>,
    /// `null` detaches the current image.
    #[serde(default, deserialize_with = "nullable_reference_text")]
    pub image: Option<Option<String>>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()
            .map_err(|errors| ProductFormError::Violations(ordered_violations(&errors, FIELD_ORDER)))?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name.as_deref() {
            updates = updates.name(sanitize_inline_text(name));
        }

        if let Some(description) = self.description.as_deref() {
            updates = updates.description(sanitize_multiline_text(description));
        }

        if let Some(price) = self.price.as_deref() {
            updates = updates.price(parse_amount("price", price)?);
        }

        if let Some(tax) = self.tax.as_deref() {
            updates = updates.tax(parse_amount("tax", tax)?);
        }

        if let Some(taxonomy) = self.taxonomy.as_deref() {
            updates = updates.taxonomy_id(parse_reference("taxonomy", taxonomy, TAXONOMIES)?);
        }

        match self.image {
            Some(Some(image)) => {
                let image_id = parse_reference("image", &image, MEDIA_OBJECTS)?;
                updates = updates.image_id(Some(image_id));
            }
            Some(None) => updates = updates.image_id(None),
            None => {}
        }

        Ok(updates)
    }
}

fn validate_price(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation_error("not_blank", NOT_BLANK));
    }
    bounded_decimal(value, Decimal::ZERO, PRICE_MAX).map(|_| ())
}

fn validate_tax(value: &str) -> Result<(), ValidationError> {
    bounded_decimal(value, -TAX_LIMIT, TAX_LIMIT).map(|_| ())
}

fn parse_amount(property_path: &str, value: &str) -> ProductFormResult<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map(round_amount)
        .map_err(|_| ProductFormError::single(property_path, NOT_DECIMAL))
}

fn parse_reference(property_path: &str, value: &str, collection: &str) -> ProductFormResult<i32> {
    parse_iri(value, collection).ok_or_else(|| {
        ProductFormError::single(property_path, format!("Invalid IRI \"{value}\"."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal literal")
    }

    fn form(json: &str) -> AddProductForm {
        serde_json::from_str(json).expect("valid json")
    }

    fn violation_paths(error: ProductFormError) -> Vec<String> {
        let ProductFormError::Violations(violations) = error;
        violations
            .into_iter()
            .map(|violation| violation.property_path)
            .collect()
    }

    #[test]
    fn add_product_form_converts_successfully() {
        let form = form(
            r#"{
                "name": "  Product  By Manu ",
                "description": " First line.\n\n Second line. ",
                "price": "200.25",
                "taxonomy": "/taxonomies/5",
                "image": "/media_objects/1",
                "priceTax": "1.00"
            }"#,
        );

        let new_product = form.into_new_product().expect("expected success");

        assert_eq!(new_product.name, "Product By Manu");
        assert_eq!(new_product.description, "First line.\n\nSecond line.");
        assert_eq!(new_product.price, dec("200.25"));
        assert_eq!(new_product.tax, dec("21"));
        assert_eq!(new_product.taxonomy_id, 5);
        assert_eq!(new_product.image_id, Some(1));
        assert_eq!(new_product.price_tax(), dec("242.30"));
    }

    #[test]
    fn add_product_form_accepts_numeric_amounts() {
        let form = form(
            r#"{"name": "Lamp", "description": "Desk lamp", "price": 12.5, "tax": 10, "taxonomy": 2}"#,
        );

        let new_product = form.into_new_product().expect("expected success");

        assert_eq!(new_product.price, dec("12.50"));
        assert_eq!(new_product.tax, dec("10"));
        assert_eq!(new_product.taxonomy_id, 2);
    }

    #[test]
    fn add_product_form_reports_blank_fields_in_order() {
        let form = form(r#"{"name": "", "description": "", "price": ""}"#);

        let error = form.into_new_product().expect_err("expected violations");
        let ProductFormError::Violations(violations) = error;

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0], Violation::new("name", NOT_BLANK));
        assert_eq!(violations[1].property_path, "description");
        assert_eq!(violations[2].property_path, "price");
        assert_eq!(violations[2].message, NOT_BLANK);
    }

    #[test]
    fn add_product_form_rejects_control_character_text() {
        let form = form(
            r#"{"name": "\u0007", "description": "\u0001\n", "price": "3", "taxonomy": "/taxonomies/1"}"#,
        );

        let error = form.into_new_product().expect_err("expected violations");
        let ProductFormError::Violations(violations) = error;

        assert_eq!(
            violations,
            vec![
                Violation::new("name", NOT_BLANK),
                Violation::new("description", NOT_BLANK),
            ]
        );
    }

    #[test]
    fn add_product_form_reports_missing_fields() {
        let error = form("{}").into_new_product().expect_err("expected violations");

        assert_eq!(violation_paths(error), vec!["name", "description", "price"]);
    }

    #[test]
    fn add_product_form_rejects_long_name_and_bad_price() {
        let long_name = "x".repeat(NAME_MAX_LEN + 1);
        let form = form(&format!(
            r#"{{"name": "{long_name}", "description": "ok", "price": "-1", "tax": "abc", "taxonomy": "/taxonomies/1"}}"#
        ));

        let error = form.into_new_product().expect_err("expected violations");
        let ProductFormError::Violations(violations) = error;

        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[0].message,
            "This value is too long. It should have 100 characters or less."
        );
        assert_eq!(violations[1].property_path, "price");
        assert_eq!(
            violations[1].message,
            "This value should be greater than or equal to 0."
        );
        assert_eq!(violations[2].property_path, "tax");
    }

    #[test]
    fn add_product_form_requires_taxonomy_after_fields_pass() {
        let error = form(r#"{"name": "Lamp", "description": "Desk lamp", "price": "3"}"#)
            .into_new_product()
            .expect_err("expected violation");

        let ProductFormError::Violations(violations) = error;
        assert_eq!(violations, vec![Violation::new("taxonomy", NOT_NULL)]);
    }

    #[test]
    fn add_product_form_rejects_foreign_iri() {
        let error = form(
            r#"{"name": "Lamp", "description": "Desk lamp", "price": "3", "taxonomy": "/products/1"}"#,
        )
        .into_new_product()
        .expect_err("expected violation");

        let ProductFormError::Violations(violations) = error;
        assert_eq!(violations[0].property_path, "taxonomy");
        assert_eq!(violations[0].message, "Invalid IRI \"/products/1\".");
    }

    #[test]
    fn edit_product_form_converts_updates() {
        let form: EditProductForm = serde_json::from_str(
            r#"{"name": " Premium  Lamp ", "price": "20", "image": null, "taxonomy": "/taxonomies/3"}"#,
        )
        .expect("valid json");

        let updates = form.into_update_product().expect("expected success");

        assert_eq!(updates.name.as_deref(), Some("Premium Lamp"));
        assert_eq!(updates.description, None);
        assert_eq!(updates.price, Some(dec("20")));
        assert_eq!(updates.tax, None);
        assert_eq!(updates.taxonomy_id, Some(3));
        assert_eq!(updates.image_id, Some(None));
    }

    #[test]
    fn edit_product_form_leaves_missing_image_untouched() {
        let form: EditProductForm =
            serde_json::from_str(r#"{"name": "Lamp"}"#).expect("valid json");

        let updates = form.into_update_product().expect("expected success");

        assert_eq!(updates.image_id, None);
    }

    #[test]
    fn edit_product_form_rejects_blank_name() {
        let form: EditProductForm =
            serde_json::from_str(r#"{"name": "  ", "price": ""}"#).expect("valid json");

        let error = form.into_update_product().expect_err("expected violations");

        assert_eq!(violation_paths(error), vec!["name", "price"]);
    }

    #[test]
    fn edit_product_form_rejects_control_character_text() {
        let form: EditProductForm =
            serde_json::from_str(r#"{"name": "\u0007", "description": "\u001b"}"#)
                .expect("valid json");

        let error = form.into_update_product().expect_err("expected violations");

        assert_eq!(violation_paths(error), vec!["name", "description"]);
    }
}
