//! Multipart form collection. Maps the upload widget's fields onto `SubmissionForm`.

use crate::domain::DomainError;
use crate::usecases::{SubmissionForm, UploadedFile};
use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use tracing::debug;

/// Read every part of the submission. Unknown fields are skipped.
///
/// Only the first non-empty `image` part is kept, and it may not exceed
/// `max_image_bytes`. On failure the fields read so far come back with the
/// error so the page can be re-rendered with them.
pub async fn collect_submission(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> Result<SubmissionForm, (SubmissionForm, DomainError)> {
    let mut form = SubmissionForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((form, upload_error(e))),
        };
        let name = field.name().unwrap_or_default().to_string();
        let read = match name.as_str() {
            "api_key" => field.text().await.map(|v| form.api_key = v),
            "location" => field.text().await.map(|v| form.location = v),
            "budget_min" => field.text().await.map(|v| form.budget_min = v),
            "budget_max" => field.text().await.map(|v| form.budget_max = v),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = match read_limited(field, max_image_bytes).await {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => {
                        let too_large = DomainError::InvalidInput(format!(
                            "upload exceeds the size limit of {} bytes",
                            max_image_bytes
                        ));
                        return Err((form, too_large));
                    }
                    Err(e) => return Err((form, upload_error(e))),
                };
                debug!(file = %file_name, bytes = bytes.len(), "image part received");
                let has_image = form.image.as_ref().is_some_and(|f| !f.bytes.is_empty());
                if !has_image {
                    form.image = Some(UploadedFile { file_name, bytes });
                }
                Ok(())
            }
            other => {
                debug!(field = other, "ignoring unknown form field");
                Ok(())
            }
        };
        if let Err(e) = read {
            return Err((form, upload_error(e)));
        }
    }

    Ok(form)
}

/// Buffer a file part chunk by chunk. `None` once it grows past `limit`.
async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Option<Vec<u8>>, MultipartError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

fn upload_error(e: MultipartError) -> DomainError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::InvalidInput("upload exceeds the size limit".to_string())
    } else {
        DomainError::InvalidInput(format!("could not read form data: {}", e.body_text()))
    }
}
