use axum::{
    extract::{Path, State},
    Extension, Json,
};
use optin_core::PopupConfig;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{RequestId, Shop};

use super::super::{ApiError, ApiResponse, AppState, ResponseMeta};
use super::{map_popup_db_error, parse_popup_id, resolve_popup};

#[derive(Debug, Serialize)]
pub(in crate::api) struct DeletePopupResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// GET /api/v1/popups/{popup_id}: the stored popup, normalized into a draft.
pub(in crate::api) async fn get_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Path(popup_id): Path<String>,
) -> Result<Json<ApiResponse<PopupConfig>>, ApiError> {
    let rid = &req_id.0;
    let popup_id = parse_popup_id(rid, &popup_id)?;
    let draft = resolve_popup(&state.pool, &shop.0, popup_id, rid).await?;

    Ok(Json(ApiResponse {
        data: draft,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/popups/{popup_id}
pub(in crate::api) async fn delete_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Path(popup_id): Path<String>,
) -> Result<Json<ApiResponse<DeletePopupResponse>>, ApiError> {
    let rid = &req_id.0;
    let popup_id = parse_popup_id(rid, &popup_id)?;

    optin_db::delete_popup(&state.pool, &shop.0, popup_id)
        .await
        .map_err(|e| map_popup_db_error(rid, popup_id, &e))?;

    tracing::info!(popup_id = %popup_id, "popup deleted");
    Ok(Json(ApiResponse {
        data: DeletePopupResponse {
            id: popup_id,
            deleted: true,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
