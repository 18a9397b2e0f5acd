use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::products::{AddProductForm, EditProductForm};
use crate::hydra::{PRODUCTS, Resource, iri};
use crate::repository::DieselRepository;
use crate::routes::{error_response, jsonld, parse_query};
use crate::services::products::{self, ProductView, ProductsQuery};

const RESOURCE_TYPE: &str = "Product";

fn item(view: ProductView) -> Resource<ProductView> {
    Resource::item(iri(PRODUCTS, view.id), RESOURCE_TYPE, view)
}

#[get("/products")]
pub async fn list_products(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let query = match parse_query::<ProductsQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match products::load_products_page(repo.get_ref(), query) {
        Ok(page) => {
            let collection =
                page.into_collection(PRODUCTS, req.query_string(), RESOURCE_TYPE, |view| {
                    Resource::member(iri(PRODUCTS, view.id), RESOURCE_TYPE, view)
                });
            jsonld(StatusCode::OK, &collection)
        }
        Err(err) => error_response(err, "list products"),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), path.into_inner()) {
        Ok(view) => jsonld(StatusCode::OK, &item(view)),
        Err(err) => error_response(err, "load product"),
    }
}

#[post("/products")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), form.into_inner()) {
        Ok(view) => jsonld(StatusCode::CREATED, &item(view)),
        Err(err) => error_response(err, "create product"),
    }
}

#[put("/products/{product_id}")]
pub async fn edit_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    match products::update_product(repo.get_ref(), path.into_inner(), form.into_inner()) {
        Ok(view) => jsonld(StatusCode::OK, &item(view)),
        Err(err) => error_response(err, "update product"),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::remove_product(repo.get_ref(), path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete product"),
    }
}
