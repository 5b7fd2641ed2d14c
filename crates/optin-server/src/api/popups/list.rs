use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{RequestId, Shop};

use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::{map_popup_db_error, parse_popup_id};

#[derive(Debug, Serialize)]
pub(in crate::api) struct PopupListItem {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub is_multi_step: bool,
    pub views: i64,
    pub subscribers: i64,
    pub conversion_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<optin_db::PopupSummary> for PopupListItem {
    fn from(row: optin_db::PopupSummary) -> Self {
        Self {
            id: row.public_id,
            name: row.name,
            is_active: row.is_active,
            is_multi_step: row.is_multi_step,
            views: row.views,
            subscribers: row.subscribers,
            conversion_rate: row.conversion_rate,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// GET /api/v1/popups
pub(in crate::api) async fn list_popups(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
) -> Result<Json<ApiResponse<Vec<PopupListItem>>>, ApiError> {
    let rows = optin_db::list_popups_by_shop(&state.pool, &shop.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PopupListItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/popups/{popup_id}/toggle
pub(in crate::api) async fn toggle_popup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(shop): Extension<Shop>,
    Path(popup_id): Path<String>,
) -> Result<Json<ApiResponse<PopupListItem>>, ApiError> {
    let rid = &req_id.0;
    let popup_id = parse_popup_id(rid, &popup_id)?;

    let row = optin_db::toggle_popup_active(&state.pool, &shop.0, popup_id)
        .await
        .map_err(|e| map_popup_db_error(rid, popup_id, &e))?;

    tracing::info!(popup_id = %popup_id, is_active = row.is_active, "popup toggled");
    Ok(Json(ApiResponse {
        data: PopupListItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
