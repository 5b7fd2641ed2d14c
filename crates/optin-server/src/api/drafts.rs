//! Stateless draft editing. The client owns the draft; these routes apply
//! editor commands to it or render it, and never touch the database.

use axum::{Extension, Json};
use optin_core::normalize::canonicalize;
use optin_core::{ButtonKey, Device, EditCommand, Editor, PopupConfig, PreviewLayout, PreviewOptions};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ApplyCommandsRequest {
    pub draft: PopupConfig,
    #[serde(default)]
    pub commands: Vec<EditCommand>,
}

#[derive(Debug, Serialize)]
pub(super) struct ApplyCommandsResponse {
    pub draft: PopupConfig,
    pub applied: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct DraftPreviewRequest {
    pub draft: PopupConfig,
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub device: Device,
    pub selected_button: Option<ButtonKey>,
}

/// POST /api/v1/drafts/apply: apply commands in order, all or nothing.
#[allow(clippy::unused_async)]
pub(super) async fn apply_commands(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ApplyCommandsRequest>,
) -> Result<Json<ApiResponse<ApplyCommandsResponse>>, ApiError> {
    let applied = body.commands.len();
    let mut editor = Editor::new(canonicalize(body.draft));

    editor.apply_all(body.commands).map_err(|(index, e)| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("command {index}: {e}"),
        )
    })?;

    Ok(Json(ApiResponse {
        data: ApplyCommandsResponse {
            draft: editor.into_draft(),
            applied,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/drafts/preview: render an unsaved draft.
#[allow(clippy::unused_async)]
pub(super) async fn preview_draft(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DraftPreviewRequest>,
) -> Json<ApiResponse<PreviewLayout>> {
    let options = PreviewOptions {
        device: body.device,
        selected_button: body.selected_button,
    };
    let layout = optin_core::render(&canonicalize(body.draft), body.step, &options);

    Json(ApiResponse {
        data: layout,
        meta: ResponseMeta::new(req_id.0),
    })
}
