//! Popup record handlers, all scoped to the session shop.
//!
//! - `GET    /api/v1/popups`                     list view summaries
//! - `POST   /api/v1/popups`                     create with seeded defaults
//! - `GET    /api/v1/popups/{popup_id}`          canonical draft
//! - `PUT    /api/v1/popups/{popup_id}`          save a draft
//! - `DELETE /api/v1/popups/{popup_id}`          delete
//! - `POST   /api/v1/popups/{popup_id}/toggle`   flip `is_active`
//! - `GET    /api/v1/popups/{popup_id}/preview`  preview layout

mod detail;
mod list;
mod preview;
mod write;

pub(super) use detail::{delete_popup, get_popup};
pub(super) use list::{list_popups, toggle_popup};
pub(super) use preview::preview_popup;
pub(super) use write::{create_popup, save_popup};

use optin_core::PopupConfig;
use uuid::Uuid;

use super::{map_db_error, ApiError};

fn popup_not_found(request_id: &str, popup_id: &str) -> ApiError {
    ApiError::new(
        request_id,
        "not_found",
        format!("popup '{popup_id}' not found"),
    )
}

/// Parse the path id. A malformed id cannot belong to any shop, so it is a 404.
fn parse_popup_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| popup_not_found(request_id, raw))
}

fn map_popup_db_error(request_id: &str, popup_id: Uuid, error: &optin_db::DbError) -> ApiError {
    match error {
        optin_db::DbError::NotFound => popup_not_found(request_id, &popup_id.to_string()),
        other => map_db_error(request_id.to_owned(), other),
    }
}

/// Load a popup owned by `shop` as its canonical draft, returning 404 if absent.
async fn resolve_popup(
    pool: &sqlx::PgPool,
    shop: &str,
    popup_id: Uuid,
    request_id: &str,
) -> Result<PopupConfig, ApiError> {
    optin_db::get_popup(pool, shop, popup_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .map(optin_db::PopupRow::into_config)
        .ok_or_else(|| popup_not_found(request_id, &popup_id.to_string()))
}

/// Link buttons must point somewhere a browser can follow: an absolute
/// http(s) URL or a site-relative path.
pub(super) fn validate_link_urls(request_id: &str, popup: &PopupConfig) -> Result<(), ApiError> {
    for (button_id, url) in popup.link_urls() {
        let url = url.trim();
        if url.starts_with('/') {
            continue;
        }
        let valid = reqwest::Url::parse(url)
            .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            return Err(ApiError::new(
                request_id,
                "validation_error",
                format!("button {button_id}: '{url}' is not a valid link URL"),
            ));
        }
    }
    Ok(())
}
