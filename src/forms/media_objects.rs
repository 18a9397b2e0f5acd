use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use thiserror::Error;

/// Name used when the uploaded file carries no usable name.
const FALLBACK_FILE_NAME: &str = "upload";

/// Longest stored file name, extension included.
const FILE_NAME_MAX_LEN: usize = 128;

#[derive(MultipartForm)]
/// Multipart form for uploading a media object.
pub struct UploadMediaObjectForm {
    #[multipart(limit = "10MB")]
    /// Uploaded file; the request is rejected when it is missing.
    pub file: Option<TempFile>,
}

#[derive(Debug, Error)]
/// Errors that can occur while reading an uploaded media object.
pub enum UploadMediaObjectFormError {
    #[error("\"file\" is required")]
    MissingFile,
}

/// File accepted from the upload form, ready to be stored.
#[derive(Debug)]
pub struct MediaUpload {
    /// Sanitized file name suggested by the client.
    pub file_name: String,
    /// Uploaded bytes, kept in a temporary file until stored.
    pub file: TempFile,
}

impl UploadMediaObjectForm {
    /// Extract the uploaded file together with a safe file name.
    pub fn into_upload(self) -> Result<MediaUpload, UploadMediaObjectFormError> {
        let file = self.file.ok_or(UploadMediaObjectFormError::MissingFile)?;
        let file_name = sanitize_file_name(file.file_name.as_deref().unwrap_or_default());
        Ok(MediaUpload { file_name, file })
    }
}

/// Reduce a client supplied file name to `[A-Za-z0-9._-]`, without any directory part.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut sanitized: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.len() > FILE_NAME_MAX_LEN {
        sanitized = sanitized.split_off(sanitized.len() - FILE_NAME_MAX_LEN);
    }

    if sanitized.trim_matches(['_', '.']).is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized
    }
}
