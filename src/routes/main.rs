use actix_web::http::StatusCode;
use actix_web::http::header::ACCEPT;
use actix_web::{HttpRequest, Responder, get, web};
use pushkind_common::routes::render_template;
use serde::Serialize;
use tera::{Context, Tera};

use crate::hydra::{MEDIA_OBJECTS, PRODUCTS, TAXONOMIES};
use crate::routes::jsonld;

/// JSON-LD entrypoint listing the collections served by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Entrypoint {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@id")]
    id: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    product: &'static str,
    taxonomy: &'static str,
    media_object: &'static str,
}

/// Collection listed on the documentation page.
#[derive(Debug, Serialize)]
struct CollectionLink {
    name: &'static str,
    path: &'static str,
    writable: bool,
}

const COLLECTIONS: [CollectionLink; 3] = [
    CollectionLink {
        name: "Product",
        path: PRODUCTS,
        writable: true,
    },
    CollectionLink {
        name: "Taxonomy",
        path: TAXONOMIES,
        writable: true,
    },
    CollectionLink {
        name: "MediaObject",
        path: MEDIA_OBJECTS,
        writable: false,
    },
];

const ENTRYPOINT: Entrypoint = Entrypoint {
    context: "/contexts/Entrypoint",
    id: "/",
    kind: "Entrypoint",
    product: PRODUCTS,
    taxonomy: TAXONOMIES,
    media_object: MEDIA_OBJECTS,
};

/// Serves the documentation page, or the entrypoint when the client prefers JSON.
#[get("/")]
pub async fn show_index(req: HttpRequest, tera: web::Data<Tera>) -> impl Responder {
    if prefers_json(&req) {
        return jsonld(StatusCode::OK, &ENTRYPOINT);
    }

    let mut context = Context::new();
    context.insert("collections", &COLLECTIONS);
    render_template(&tera, "docs/index.html", &context)
}

fn prefers_json(req: &HttpRequest) -> bool {
    let accept = req
        .headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    accept.contains("json") && !accept.contains("html")
}
