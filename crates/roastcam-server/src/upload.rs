use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::RouteError;
use crate::state::AppState;

/// Multipart field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

/// MIME type sent upstream when the part does not declare a usable one
const DEFAULT_MIME_TYPE: &str = "image/png";

/// One uploaded photo, materialized in the upload directory
///
/// The backing file is removed by [`UploadedImage::release`], or on drop if
/// the request is abandoned before release.
#[derive(Debug)]
pub struct UploadedImage {
    file: NamedTempFile,
    mime_type: String,
}

impl UploadedImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Read the uploaded bytes back from disk
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.path()).await
    }

    /// Delete the temp file, best effort
    ///
    /// A failed delete is logged and otherwise ignored; it never changes the
    /// response sent to the client.
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove upload");
        }
    }
}

/// Extractor for the `photo` file part of a multipart upload
///
/// Rejects with [`RouteError::NoPhoto`] when the request is not multipart or
/// has no `photo` file part. Other fields are ignored, as is anything after
/// the first `photo` file.
pub struct PhotoUpload(pub UploadedImage);

impl FromRequest<AppState> for PhotoUpload {
    type Rejection = RouteError;

    async fn from_request(request: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(mut multipart) = Multipart::from_request(request, state).await else {
            return Err(RouteError::NoPhoto);
        };

        while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
            if field.name() != Some(PHOTO_FIELD) || field.file_name().is_none() {
                continue;
            }

            let image = store(field, state.upload_dir()).await?;
            tracing::debug!(path = %image.path().display(), mime_type = image.mime_type(), "photo stored");
            return Ok(Self(image));
        }

        Err(RouteError::NoPhoto)
    }
}

/// Stream one file part into a uniquely named temp file
async fn store(mut field: Field<'_>, upload_dir: &Path) -> Result<UploadedImage, RouteError> {
    let mime_type = field
        .content_type()
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    let temp = tempfile::Builder::new().prefix("photo-").tempfile_in(upload_dir)?;
    let mut writer = tokio::fs::File::from_std(temp.as_file().try_clone()?);

    // Dropping `temp` on any early return removes the partial file
    while let Some(chunk) = field.chunk().await.map_err(invalid_upload)? {
        writer.write_all(&chunk).await?;
    }
    writer.flush().await?;

    Ok(UploadedImage { file: temp, mime_type })
}

fn invalid_upload(error: MultipartError) -> RouteError {
    RouteError::InvalidUpload {
        status: error.status(),
        message: error.body_text(),
    }
}
