use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a category grouping products.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    /// Unique identifier of the taxonomy.
    pub id: i32,
    /// Human-readable name of the taxonomy.
    pub name: String,
    /// Identifiers of the products referencing this taxonomy.
    ///
    /// Filled by a reverse lookup when the taxonomy is loaded; never stored.
    pub product_ids: Vec<i32>,
    /// Timestamp for when the taxonomy record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the taxonomy record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaxonomy {
    /// Human-readable name of the taxonomy.
    pub name: String,
    /// Timestamp captured when the taxonomy payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewTaxonomy {
    /// Construct a new taxonomy payload with a trimmed name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self {
            name,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Patch data applied when updating an existing taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaxonomy {
    /// Optional new name of the taxonomy.
    pub name: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateTaxonomy {
    /// Build a taxonomy update payload.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list taxonomies.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyListQuery {
    /// Optional case-insensitive substring search on the name.
    pub name: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl TaxonomyListQuery {
    /// Construct a query that targets every taxonomy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a partial name match.
    pub fn name(mut self, term: impl Into<String>) -> Self {
        self.name = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Outcome of a taxonomy deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyDeletion {
    /// The taxonomy was removed.
    Deleted,
    /// The taxonomy is still referenced by the given number of products and was kept.
    InUse(usize),
}
