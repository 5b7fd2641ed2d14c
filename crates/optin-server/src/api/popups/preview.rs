use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use optin_core::{ButtonKey, Device, PreviewLayout, PreviewOptions};
use serde::Deserialize;

use crate::middleware::{RequestId, Shop};

use super::super::{ApiError, ApiResponse, AppState, ResponseMeta};
use super::{parse_popup_id, resolve_popup};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct PreviewQuery {
    pub step: Option<usize>,
    pub device: Option<Device>,
    pub selected_button: Option<ButtonKey>,
}

impl PreviewQuery {
    pub(in crate::api) fn options(&self) -> PreviewOptions {
        PreviewOptions {
            device: self.device.unwrap_or_default(),
            selected_button: self.selected_button.clone(),
        }
    }
}

/// GET /api/v1/popups/{popup_id}/preview?step=&device=&selected_button=
pub(in crate::api) async fn preview_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Path(popup_id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<ApiResponse<PreviewLayout>>, ApiError> {
    let rid = &req_id.0;
    let popup_id = parse_popup_id(rid, &popup_id)?;
    let draft = resolve_popup(&state.pool, &shop.0, popup_id, rid).await?;

    let layout = optin_core::render(&draft, query.step.unwrap_or(0), &query.options());

    Ok(Json(ApiResponse {
        data: layout,
        meta: ResponseMeta::new(req_id.0),
    }))
}
