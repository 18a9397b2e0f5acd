use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::taxonomies::{AddTaxonomyForm, EditTaxonomyForm};
use crate::hydra::{Resource, TAXONOMIES, iri};
use crate::repository::DieselRepository;
use crate::routes::{error_response, jsonld, parse_query};
use crate::services::taxonomies::{
    TaxonomiesQuery, TaxonomyView, create_taxonomy, get_taxonomy, load_taxonomies_page,
    remove_taxonomy, update_taxonomy,
};

const RESOURCE_TYPE: &str = "Taxonomy";

fn item(view: TaxonomyView) -> Resource<TaxonomyView> {
    Resource::item(iri(TAXONOMIES, view.id), RESOURCE_TYPE, view)
}

#[get("/taxonomies")]
pub async fn list_taxonomies(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<TaxonomiesQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match load_taxonomies_page(repo.get_ref(), query) {
        Ok(page) => {
            let collection =
                page.into_collection(TAXONOMIES, req.query_string(), RESOURCE_TYPE, |view| {
                    Resource::member(iri(TAXONOMIES, view.id), RESOURCE_TYPE, view)
                });
            jsonld(StatusCode::OK, &collection)
        }
        Err(err) => error_response(err, "list taxonomies"),
    }
}

#[get("/taxonomies/{taxonomy_id}")]
pub async fn show_taxonomy(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_taxonomy(repo.get_ref(), path.into_inner()) {
        Ok(view) => jsonld(StatusCode::OK, &item(view)),
        Err(err) => error_response(err, "load taxonomy"),
    }
}

#[post("/taxonomies")]
pub async fn add_taxonomy(
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTaxonomyForm>,
) -> impl Responder {
    match create_taxonomy(repo.get_ref(), form.into_inner()) {
        Ok(view) => jsonld(StatusCode::CREATED, &item(view)),
        Err(err) => error_response(err, "create taxonomy"),
    }
}

#[put("/taxonomies/{taxonomy_id}")]
pub async fn edit_taxonomy(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditTaxonomyForm>,
) -> impl Responder {
    match update_taxonomy(repo.get_ref(), path.into_inner(), form.into_inner()) {
        Ok(view) => jsonld(StatusCode::OK, &item(view)),
        Err(err) => error_response(err, "update taxonomy"),
    }
}

#[delete("/taxonomies/{taxonomy_id}")]
pub async fn delete_taxonomy(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_taxonomy(repo.get_ref(), path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete taxonomy"),
    }
}
