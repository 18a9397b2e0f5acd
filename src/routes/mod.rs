use actix_files::Files;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ServerConfig;
use crate::hydra::{ErrorBody, JSONLD_CONTENT_TYPE, ViolationList};
use crate::services::ServiceError;

pub mod main;
pub mod media_objects;
pub mod products;
pub mod taxonomies;

/// Maximum nesting accepted in bracketed query parameters such as `price[gte]`.
const QUERY_MAX_DEPTH: usize = 5;

/// Register every route of the service on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig, server_config: &ServerConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(Files::new(
            &server_config.upload_url_prefix,
            &server_config.upload_dir,
        ))
        .service(main::show_index)
        .service(products::list_products)
        .service(products::show_product)
        .service(products::add_product)
        .service(products::edit_product)
        .service(products::delete_product)
        .service(taxonomies::list_taxonomies)
        .service(taxonomies::show_taxonomy)
        .service(taxonomies::add_taxonomy)
        .service(taxonomies::edit_taxonomy)
        .service(taxonomies::delete_taxonomy)
        .service(media_objects::list_media_objects)
        .service(media_objects::show_media_object)
        .service(media_objects::upload_media_object);
}

/// Serialize `body` as JSON-LD with the given status.
pub fn jsonld<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(JSONLD_CONTENT_TYPE)
        .json(body)
}

/// Translate a service failure into a hydra error response.
///
/// Persistence and storage failures are logged with `action` and hidden
/// behind a generic 500.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Validation(violations) => {
            jsonld(StatusCode::BAD_REQUEST, &ViolationList::new(violations))
        }
        ServiceError::BadRequest(message) => {
            jsonld(StatusCode::BAD_REQUEST, &ErrorBody::new(message))
        }
        ServiceError::NotFound => jsonld(StatusCode::NOT_FOUND, &ErrorBody::new("Not Found")),
        ServiceError::Conflict(message) => jsonld(StatusCode::CONFLICT, &ErrorBody::new(message)),
        err @ (ServiceError::Repository(_) | ServiceError::Storage(_)) => {
            log::error!("Failed to {action}: {err}");
            jsonld(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new("Internal Server Error"),
            )
        }
    }
}

/// Parse the query string, accepting bracketed keys in raw or percent-encoded form.
fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> Result<T, HttpResponse> {
    serde_qs::Config::new(QUERY_MAX_DEPTH, false)
        .deserialize_str::<T>(req.query_string())
        .map_err(|err| {
            log::debug!("Rejected query string `{}`: {err}", req.query_string());
            jsonld(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new(format!("Invalid query string: {err}")),
            )
        })
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            let response = jsonld(StatusCode::BAD_REQUEST, &ErrorBody::new(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = jsonld(StatusCode::NOT_FOUND, &ErrorBody::new("Not Found"));
        InternalError::from_response(err, response).into()
    })
}
