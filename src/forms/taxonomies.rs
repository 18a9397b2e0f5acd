use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::taxonomy::{NewTaxonomy, UpdateTaxonomy};
use crate::forms::{Violation, not_blank, ordered_violations, sanitize_inline_text, scalar_text};

/// Maximum length allowed for a taxonomy name.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const FIELD_ORDER: &[&str] = &["name"];

/// Result type returned by the taxonomy form helpers.
pub type TaxonomyFormResult<T> = Result<T, TaxonomyFormError>;

/// Errors that can occur while processing taxonomy forms.
#[derive(Debug, Error)]
pub enum TaxonomyFormError {
    /// One or more properties failed validation.
    #[error("validation failed")]
    Violations(Vec<Violation>),
}

/// JSON payload accepted when creating a taxonomy.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddTaxonomyForm {
    #[validate(
        required(message = "This value should not be blank."),
        custom(function = "not_blank"),
        length(
            max = NAME_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 255 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
}

impl AddTaxonomyForm {
    /// Validates and sanitizes the payload into a domain `NewTaxonomy`.
    pub fn into_new_taxonomy(self) -> TaxonomyFormResult<NewTaxonomy> {
        self.validate().map_err(|errors| {
            TaxonomyFormError::Violations(ordered_violations(&errors, FIELD_ORDER))
        })?;

        let name = sanitize_inline_text(self.name.as_deref().unwrap_or_default());
        Ok(NewTaxonomy::new(name))
    }
}

/// JSON payload accepted when replacing a taxonomy. A missing name keeps the stored one.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditTaxonomyForm {
    #[validate(
        custom(function = "not_blank"),
        length(
            max = NAME_MAX_LEN_VALIDATOR,
            message = "This value is too long. It should have 255 characters or less."
        )
    )]
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
}

impl EditTaxonomyForm {
    /// Validates and sanitizes the payload into a domain `UpdateTaxonomy`.
    pub fn into_update_taxonomy(self) -> TaxonomyFormResult<UpdateTaxonomy> {
        self.validate().map_err(|errors| {
            TaxonomyFormError::Violations(ordered_violations(&errors, FIELD_ORDER))
        })?;

        Ok(UpdateTaxonomy::new(
            self.name.as_deref().map(sanitize_inline_text),
        ))
    }
}
