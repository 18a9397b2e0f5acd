use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, get, post, web};

use crate::config::ServerConfig;
use crate::forms::media_objects::UploadMediaObjectForm;
use crate::hydra::{MEDIA_OBJECTS, Resource, iri};
use crate::repository::DieselRepository;
use crate::routes::{error_response, jsonld, parse_query};
use crate::services::media_objects::{
    MediaObjectView, MediaObjectsQuery, get_media_object, load_media_objects_page,
    upload_media_object as store_media_object,
};

const RESOURCE_TYPE: &str = "http://schema.org/MediaObject";
const CONTEXT_TYPE: &str = "MediaObject";

fn item(view: MediaObjectView) -> Resource<MediaObjectView> {
    let mut resource = Resource::item(iri(MEDIA_OBJECTS, view.id), RESOURCE_TYPE, view);
    resource.context = Some(format!("/contexts/{CONTEXT_TYPE}"));
    resource
}

#[get("/media_objects")]
pub async fn list_media_objects(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let query = match parse_query::<MediaObjectsQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let storage = server_config.media_storage();
    match load_media_objects_page(repo.get_ref(), &storage, query) {
        Ok(page) => {
            let collection =
                page.into_collection(MEDIA_OBJECTS, req.query_string(), CONTEXT_TYPE, |view| {
                    Resource::member(iri(MEDIA_OBJECTS, view.id), RESOURCE_TYPE, view)
                });
            jsonld(StatusCode::OK, &collection)
        }
        Err(err) => error_response(err, "list media objects"),
    }
}

#[get("/media_objects/{media_id}")]
pub async fn show_media_object(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let storage = server_config.media_storage();
    match get_media_object(repo.get_ref(), &storage, path.into_inner()) {
        Ok(view) => jsonld(StatusCode::OK, &item(view)),
        Err(err) => error_response(err, "load media object"),
    }
}

/// Accepts a multipart upload with a `file` part.
///
/// Requests that are not valid multipart bodies are treated like a missing file.
#[post("/media_objects")]
pub async fn upload_media_object(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    form: Result<MultipartForm<UploadMediaObjectForm>, actix_web::Error>,
) -> impl Responder {
    let form = match form {
        Ok(MultipartForm(form)) => form,
        Err(err) => {
            log::debug!("Unreadable media upload: {err}");
            UploadMediaObjectForm { file: None }
        }
    };

    let storage = server_config.media_storage();
    match store_media_object(repo.get_ref(), &storage, form) {
        Ok(view) => jsonld(StatusCode::CREATED, &item(view)),
        Err(err) => error_response(err, "upload media object"),
    }
}
