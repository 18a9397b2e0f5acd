use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::taxonomy::{
    NewTaxonomy as DomainNewTaxonomy, Taxonomy as DomainTaxonomy,
    UpdateTaxonomy as DomainUpdateTaxonomy,
};
use crate::models::search_key;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::taxonomies)]
pub struct Taxonomy {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name_search: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::taxonomies)]
pub struct NewTaxonomy<'a> {
    pub name: &'a str,
    pub updated_at: NaiveDateTime,
    pub name_search: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::taxonomies)]
pub struct UpdateTaxonomy<'a> {
    pub name: Option<&'a str>,
    pub updated_at: NaiveDateTime,
    pub name_search: Option<String>,
}

impl From<Taxonomy> for DomainTaxonomy {
    fn from(value: Taxonomy) -> Self {
        Self {
            id: value.id,
            name: value.name,
            product_ids: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewTaxonomy> for NewTaxonomy<'a> {
    fn from(value: &'a DomainNewTaxonomy) -> Self {
        Self {
            name: value.name.as_str(),
            updated_at: value.updated_at,
            name_search: search_key(&value.name),
        }
    }
}

impl<'a> From<&'a DomainUpdateTaxonomy> for UpdateTaxonomy<'a> {
    fn from(value: &'a DomainUpdateTaxonomy) -> Self {
        Self {
            name: value.name.as_deref(),
            updated_at: value.updated_at,
            name_search: value.name.as_deref().map(search_key),
        }
    }
}
