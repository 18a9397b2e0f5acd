use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use pushkind_common::routes::empty_string_as_none;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_ITEMS_PER_PAGE;
use crate::domain::media_object::{MediaObject, MediaObjectListQuery, NewMediaObject};
use crate::forms::media_objects::{MediaUpload, UploadMediaObjectForm};
use crate::hydra::Page;
use crate::repository::{MediaObjectReader, MediaObjectWriter};
use crate::services::{ServiceError, ServiceResult, requested_page};

/// Attempts made to find a free file name before giving up.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Query parameters accepted by the media objects collection.
#[derive(Debug, Default, Deserialize)]
pub struct MediaObjectsQuery {
    /// Page requested by the client (1-based).
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<String>,
}

/// Location uploads are written to and served from.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    pub upload_dir: PathBuf,
    pub url_prefix: String,
}

/// Media object as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObjectView {
    pub id: i32,
    pub content_url: String,
}

impl MediaObjectView {
    fn new(media: MediaObject, storage: &MediaStorage) -> Self {
        Self {
            content_url: media.content_url(&storage.url_prefix),
            id: media.id,
        }
    }
}

/// Loads one page of media objects.
pub fn load_media_objects_page<R>(
    repo: &R,
    storage: &MediaStorage,
    query: MediaObjectsQuery,
) -> ServiceResult<Page<MediaObjectView>>
where
    R: MediaObjectReader + ?Sized,
{
    let page = requested_page(query.page.as_deref());
    let list_query = MediaObjectListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_media_objects(list_query)?;
    let items = items
        .into_iter()
        .map(|media| MediaObjectView::new(media, storage))
        .collect();

    Ok(Page::new(items, total, page, DEFAULT_ITEMS_PER_PAGE))
}

/// Loads a single media object.
pub fn get_media_object<R>(
    repo: &R,
    storage: &MediaStorage,
    media_id: i32,
) -> ServiceResult<MediaObjectView>
where
    R: MediaObjectReader + ?Sized,
{
    repo.get_media_object_by_id(media_id)?
        .map(|media| MediaObjectView::new(media, storage))
        .ok_or(ServiceError::NotFound)
}

/// Stores the uploaded file and registers it as a media object.
///
/// The stored file is removed again when the record cannot be created.
pub fn upload_media_object<R>(
    repo: &R,
    storage: &MediaStorage,
    form: UploadMediaObjectForm,
) -> ServiceResult<MediaObjectView>
where
    R: MediaObjectWriter + ?Sized,
{
    let upload = form
        .into_upload()
        .map_err(|err| ServiceError::BadRequest(err.to_string()))?;

    let stored_path = store_upload(&storage.upload_dir, &upload)?;
    let file_name = stored_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match repo.create_media_object(&NewMediaObject::new(file_name)) {
        Ok(media) => {
            log::info!("Stored media object {} at {}", media.id, stored_path.display());
            Ok(MediaObjectView::new(media, storage))
        }
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(&stored_path) {
                log::error!(
                    "Failed to remove {} after a failed insert: {remove_err}",
                    stored_path.display()
                );
            }
            Err(ServiceError::from(err))
        }
    }
}

/// Copy the upload into `upload_dir` under a name no other file uses yet.
fn store_upload(upload_dir: &Path, upload: &MediaUpload) -> io::Result<PathBuf> {
    fs::create_dir_all(upload_dir)?;

    let (mut target, path) = create_unique_file(upload_dir, &upload.file_name)?;
    let copied = File::open(upload.file.file.path())
        .and_then(|mut source| io::copy(&mut source, &mut target));

    if let Err(err) = copied {
        let _ = fs::remove_file(&path);
        return Err(err);
    }

    Ok(path)
}

fn create_unique_file(upload_dir: &Path, file_name: &str) -> io::Result<(File, PathBuf)> {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (file_name, None),
    };

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = match (attempt, extension) {
            (0, _) => file_name.to_string(),
            (n, Some(extension)) => format!("{stem}-{n}.{extension}"),
            (n, None) => format!("{stem}-{n}"),
        };
        let path = upload_dir.join(candidate);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for `{file_name}`"),
    ))
}
