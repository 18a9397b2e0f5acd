//! JSON-LD/Hydra envelopes used by the HTTP layer.
//!
//! Resources are addressed by IRIs of the form `/{collection}/{id}`. Items are
//! wrapped in [`Resource`], lists in [`Collection`], failures in [`ErrorBody`].

use serde::Serialize;

use crate::forms::Violation;

/// Content type returned by every data endpoint.
pub const JSONLD_CONTENT_TYPE: &str = "application/ld+json; charset=utf-8";

/// Collection path of products.
pub const PRODUCTS: &str = "/products";
/// Collection path of taxonomies.
pub const TAXONOMIES: &str = "/taxonomies";
/// Collection path of media objects.
pub const MEDIA_OBJECTS: &str = "/media_objects";

/// Build the IRI of the resource `id` inside `collection`.
pub fn iri(collection: &str, id: i32) -> String {
    format!("{collection}/{id}")
}

/// Extract the identifier from an IRI pointing into `collection`.
///
/// Plain numeric identifiers and absolute URLs are accepted as well.
pub fn parse_iri(value: &str, collection: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(id) = value.parse::<i32>() {
        return Some(id);
    }

    let path = match value.find("://") {
        Some(scheme_end) => {
            let rest = &value[scheme_end + 3..];
            &rest[rest.find('/')?..]
        }
        None => value,
    };

    path.strip_prefix(collection)?
        .strip_prefix('/')?
        .parse::<i32>()
        .ok()
}

/// Single resource with its JSON-LD identifiers.
#[derive(Debug, Serialize)]
pub struct Resource<T> {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Resource<T> {
    /// Wrap a top-level item; the context is derived from the type name.
    pub fn item(id: String, kind: &'static str, body: T) -> Self {
        Self {
            context: Some(context_for(kind)),
            id,
            kind,
            body,
        }
    }

    /// Wrap a collection member, which carries no context of its own.
    pub fn member(id: String, kind: &'static str, body: T) -> Self {
        Self {
            context: None,
            id,
            kind,
            body,
        }
    }
}

/// Paginated list of resources.
#[derive(Debug, Serialize)]
pub struct Collection<T> {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "hydra:member")]
    pub members: Vec<Resource<T>>,
    #[serde(rename = "hydra:totalItems")]
    pub total_items: usize,
    #[serde(rename = "hydra:view", skip_serializing_if = "Option::is_none")]
    pub view: Option<PartialView>,
}

/// Links between the pages of a collection.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PartialView {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "hydra:first")]
    pub first: String,
    #[serde(rename = "hydra:last")]
    pub last: String,
    #[serde(rename = "hydra:previous", skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(rename = "hydra:next", skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of items as returned by the services.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize, per_page: usize) -> Self {
        Self {
            items,
            total,
            page: page.max(1),
            per_page,
        }
    }

    /// Number of pages needed to hold `total` items (at least one).
    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Wrap the page into a collection addressed by `path?query`.
    ///
    /// `query` is the raw query string of the request; its `page` parameter is
    /// replaced in the page links.
    pub fn into_collection<F>(
        self,
        path: &str,
        query: &str,
        kind: &'static str,
        to_member: F,
    ) -> Collection<T>
    where
        F: FnMut(T) -> Resource<T>,
    {
        let view = self.partial_view(path, query);
        Collection {
            context: context_for(kind),
            id: path.to_string(),
            kind: "hydra:Collection",
            total_items: self.total,
            members: self.items.into_iter().map(to_member).collect(),
            view,
        }
    }

    fn partial_view(&self, path: &str, query: &str) -> Option<PartialView> {
        let last = self.last_page();
        if last <= 1 && self.page <= 1 {
            return None;
        }

        let filters = strip_page_param(query);
        let link = |page: usize| {
            let mut params = filters.clone();
            if !params.is_empty() {
                params.push('&');
            }
            params.push_str(&format!("page={page}"));
            with_query(path, &params)
        };

        Some(PartialView {
            id: link(self.page),
            kind: "hydra:PartialCollectionView",
            first: link(1),
            last: link(last),
            previous: (self.page > 1).then(|| link(self.page - 1)),
            next: (self.page < last).then(|| link(self.page + 1)),
        })
    }
}

/// Generic error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "hydra:title")]
    pub title: &'static str,
    #[serde(rename = "hydra:description")]
    pub description: String,
}

impl ErrorBody {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            context: "/contexts/Error",
            kind: "hydra:Error",
            title: "An error occurred",
            description: description.into(),
        }
    }
}

/// Error body listing every failed validation rule.
#[derive(Debug, Serialize)]
pub struct ViolationList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "hydra:title")]
    pub title: &'static str,
    #[serde(rename = "hydra:description")]
    pub description: String,
    pub violations: Vec<Violation>,
}

impl ViolationList {
    pub fn new(violations: Vec<Violation>) -> Self {
        let description = violations
            .iter()
            .map(|violation| format!("{}: {}", violation.property_path, violation.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            context: "/contexts/ConstraintViolationList",
            kind: "ConstraintViolationList",
            title: "An error occurred",
            description,
            violations,
        }
    }
}

fn context_for(kind: &str) -> String {
    format!("/contexts/{kind}")
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn strip_page_param(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty() && *pair != "page" && !pair.starts_with("page="))
        .collect::<Vec<_>>()
        .join("&")
}
