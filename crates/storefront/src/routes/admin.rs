//! Admin image upload route handlers.
//!
//! A thin page over `POST /api/upload-image`. The featured/gallery choice
//! only narrows the file picker (featured plans want PNG artwork); the
//! server forwards whatever was picked without re-checking the type.
//!
//! Upload failures of every sort surface the same generic message. The
//! backend's own error text and the transport detail stay in the logs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::plans::ImageUpload;
use crate::state::AppState;

const UPLOAD_FAILED_MESSAGE: &str = "image upload failed";

/// Admin images page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/images.html")]
pub struct AdminImagesTemplate {}

/// Upload outcome fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/upload_result.html")]
pub struct UploadResultTemplate {
    pub url: Option<String>,
    pub kind: String,
    pub message: Option<String>,
}

/// Display the image upload page.
#[instrument]
pub async fn show() -> AdminImagesTemplate {
    AdminImagesTemplate {}
}

/// Handle an image upload (HTMX).
///
/// Reads the `kind` and `image` parts of the multipart form, forwards the
/// file to the backend, and renders the hosted URL on success.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut kind: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload form: {e}")))?
    {
        match field.name() {
            Some("kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid upload form: {e}")))?;
                kind = Some(value);
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload.png").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid upload form: {e}")))?;
                image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let kind = match kind.as_deref() {
        Some("gallery") => "gallery".to_owned(),
        _ => "featured".to_owned(),
    };
    let Some(image) = image else {
        return Err(AppError::BadRequest("no image attached".into()));
    };

    add_breadcrumb(
        "admin",
        "Uploading image",
        Some(&[("kind", &kind), ("filename", &image.filename)]),
    );

    match state.plans().upload_image(image).await {
        Ok(url) => Ok(UploadResultTemplate {
            url: Some(url),
            kind,
            message: None,
        }
        .into_response()),
        Err(e) => {
            tracing::error!("Image upload failed: {e}");
            Ok(UploadResultTemplate {
                url: None,
                kind,
                message: Some(UPLOAD_FAILED_MESSAGE.to_owned()),
            }
            .into_response())
        }
    }
}
