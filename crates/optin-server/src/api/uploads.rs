//! `POST /api/v1/uploads`: multipart image upload.
//!
//! Expects a `file` part and a `type` part (`logo` or `image`). Accepted
//! images come back as a data URL ready to be applied to the draft.

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use optin_core::upload::accept_upload;
use optin_core::{UploadError, UploadKind, UploadedAsset};

use crate::middleware::RequestId;

use super::{ApiError, ApiLimits, ApiResponse, AppState, ResponseMeta};

struct FilePart {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

fn upload_error(request_id: &str, error: &UploadError) -> ApiError {
    let code = match error {
        UploadError::TooLarge { .. } => "payload_too_large",
        UploadError::NoFile | UploadError::InvalidType(_) | UploadError::InvalidKind(_) => {
            "bad_request"
        }
    };
    ApiError::new(request_id, code, error.to_string())
}

fn multipart_error(request_id: &str, error: &MultipartError, limits: ApiLimits) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let too_large = UploadError::TooLarge {
            size: limits.upload_body_limit_bytes,
            max: limits.upload_max_bytes,
        };
        return upload_error(request_id, &too_large);
    }
    ApiError::new(request_id, "bad_request", error.body_text())
}

pub(super) async fn upload_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<UploadedAsset>>, ApiError> {
    let rid = &req_id.0;
    let limits = state.limits;
    let mut multipart =
        multipart.map_err(|e| ApiError::new(rid.clone(), "bad_request", e.body_text()))?;

    let mut kind: Option<String> = None;
    let mut file: Option<FilePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(rid, &e, limits))?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(rid, &e, limits))?;
                kind = Some(text);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(rid, &e, limits))?;
                file = Some(FilePart {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let kind: UploadKind = kind
        .as_deref()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|e| upload_error(rid, &e))?;
    let file = file.ok_or_else(|| upload_error(rid, &UploadError::NoFile))?;

    let asset = accept_upload(
        kind,
        &file.filename,
        &file.content_type,
        &file.bytes,
        limits.upload_max_bytes,
    )
    .map_err(|e| {
        tracing::info!(kind = %kind, error = %e, "upload rejected");
        upload_error(rid, &e)
    })?;

    tracing::info!(kind = %kind, size = asset.size, content_type = %asset.content_type, "image uploaded");
    Ok(Json(ApiResponse {
        data: asset,
        meta: ResponseMeta::new(req_id.0),
    }))
}
