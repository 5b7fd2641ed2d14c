//! Popup write handlers: create and save.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use optin_core::{validate_name, PopupConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{RequestId, Shop};

use super::super::{map_db_error, validation_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::{map_popup_db_error, parse_popup_id, validate_link_urls};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreatePopupRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatePopupResponse {
    pub id: Uuid,
    pub name: String,
}

/// POST /api/v1/popups: create a popup with seeded defaults.
pub(in crate::api) async fn create_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Json(body): Json<CreatePopupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatePopupResponse>>), ApiError> {
    let rid = &req_id.0;

    let name = validate_name(&body.name).map_err(|e| validation_error(rid, &e))?;
    let record = PopupConfig::new_record(name);

    let row = optin_db::create_popup(&state.pool, &shop.0, &record)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(popup_id = %row.public_id, shop = %shop.0, "popup created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreatePopupResponse {
                id: row.public_id,
                name: row.name,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/popups/{popup_id}: validate a whole draft and persist it.
///
/// Nothing is written when validation fails, so the caller's draft stays the
/// source of truth and the save can be retried.
pub(in crate::api) async fn save_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Path(popup_id): Path<String>,
    Json(mut draft): Json<PopupConfig>,
) -> Result<Json<ApiResponse<PopupConfig>>, ApiError> {
    let rid = &req_id.0;
    let popup_id = parse_popup_id(rid, &popup_id)?;
    draft.id = popup_id;

    draft.validate().map_err(|e| validation_error(rid, &e))?;
    validate_link_urls(rid, &draft)?;

    let row = optin_db::update_popup(&state.pool, &shop.0, &draft)
        .await
        .map_err(|e| map_popup_db_error(rid, popup_id, &e))?;

    tracing::info!(popup_id = %popup_id, sections = draft.sections.len(), "popup saved");
    Ok(Json(ApiResponse {
        data: row.into_config(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
