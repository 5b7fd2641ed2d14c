//! Database operations for the `popups` table.
//!
//! Every query is scoped by `(public_id, shop)`; a popup owned by another
//! shop is indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use optin_core::codec::{decode_buttons, decode_sections, encode_buttons, encode_sections};
use optin_core::design::DEFAULT_LOGO_WIDTH;
use optin_core::normalize::canonicalize;
use optin_core::{DesignValues, DiscountSettings, LegacyContent, PopupConfig};
use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::DbError;

macro_rules! popup_row_columns {
    () => {
        "id, public_id, shop, name, is_active, is_multi_step, sections, custom_buttons, \
         heading, description, email_placeholder, enable_phone_field, phone_required, \
         phone_placeholder, footer_text, popup_background, text_heading, text_description, \
         text_input, text_consent, text_error, text_label, text_footer, primary_btn_bg, \
         primary_btn_text, secondary_btn_text, custom_btn_bg, custom_btn_text, logo_url, \
         logo_width, image_url, image_position, display_size, corner_radius, alignment, \
         hide_on_mobile, background_on_mobile, discount_type, discount_value, discount_code, \
         views, subscribers, conversion_rate, created_at, updated_at"
    };
}

macro_rules! popup_summary_columns {
    () => {
        "public_id, name, is_active, is_multi_step, views, subscribers, conversion_rate, \
         created_at, updated_at"
    };
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A full row from the `popups` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PopupRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub name: String,
    pub is_active: bool,
    pub is_multi_step: bool,
    /// JSON text blob; `NULL` on records that predate sections.
    pub sections: Option<String>,
    pub custom_buttons: Option<String>,
    pub heading: String,
    pub description: String,
    pub email_placeholder: String,
    pub enable_phone_field: bool,
    pub phone_required: bool,
    pub phone_placeholder: String,
    pub footer_text: String,
    pub popup_background: String,
    pub text_heading: String,
    pub text_description: String,
    pub text_input: String,
    pub text_consent: String,
    pub text_error: String,
    pub text_label: String,
    pub text_footer: String,
    pub primary_btn_bg: String,
    pub primary_btn_text: String,
    pub secondary_btn_text: String,
    pub custom_btn_bg: String,
    pub custom_btn_text: String,
    pub logo_url: String,
    pub logo_width: i32,
    pub image_url: String,
    pub image_position: String,
    pub display_size: String,
    pub corner_radius: String,
    pub alignment: String,
    pub hide_on_mobile: bool,
    pub background_on_mobile: bool,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub discount_code: Option<String>,
    pub views: i64,
    pub subscribers: i64,
    pub conversion_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The list-view projection. Counters are stored values, never computed here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PopupSummary {
    pub public_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub is_multi_step: bool,
    pub views: i64,
    pub subscribers: i64,
    pub conversion_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopupRow {
    /// Decode the stored blobs and produce the canonical editor draft.
    ///
    /// Undecodable blobs degrade to empty lists; a popup left without
    /// sections gets one synthesized from its legacy fields.
    #[must_use]
    pub fn into_config(self) -> PopupConfig {
        let sections = decode_sections(self.sections.as_deref());
        let custom_buttons = decode_buttons(self.custom_buttons.as_deref());

        let design = DesignValues {
            popup_background: self.popup_background,
            text_heading: self.text_heading,
            text_description: self.text_description,
            text_input: self.text_input,
            text_consent: self.text_consent,
            text_error: self.text_error,
            text_label: self.text_label,
            text_footer: self.text_footer,
            primary_btn_bg: self.primary_btn_bg,
            primary_btn_text: self.primary_btn_text,
            secondary_btn_text: self.secondary_btn_text,
            custom_btn_bg: self.custom_btn_bg,
            custom_btn_text: self.custom_btn_text,
            logo_url: self.logo_url,
            logo_width: u32::try_from(self.logo_width).unwrap_or(DEFAULT_LOGO_WIDTH),
            image_url: self.image_url,
            image_position: self.image_position.into(),
            display_size: self.display_size.into(),
            corner_radius: self.corner_radius.into(),
            alignment: self.alignment.into(),
            hide_on_mobile: self.hide_on_mobile,
            background_on_mobile: self.background_on_mobile,
        };

        canonicalize(PopupConfig {
            id: self.public_id,
            name: self.name,
            is_active: self.is_active,
            is_multi_step: self.is_multi_step,
            sections,
            footer_text: self.footer_text,
            design,
            custom_buttons,
            discount: DiscountSettings {
                discount_type: self.discount_type,
                discount_value: self.discount_value,
                discount_code: self.discount_code,
            },
            legacy: LegacyContent {
                heading: self.heading,
                description: self.description,
                email_placeholder: self.email_placeholder,
                enable_phone_field: self.enable_phone_field,
                phone_required: self.phone_required,
                phone_placeholder: self.phone_placeholder,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Blob encoding
// ---------------------------------------------------------------------------

struct EncodedBlobs {
    sections: Option<String>,
    custom_buttons: String,
}

impl EncodedBlobs {
    fn from_config(popup: &PopupConfig) -> Result<Self, DbError> {
        // A record without sections is stored as NULL so it loads through the
        // legacy path, like records written before sections existed.
        let sections = if popup.sections.is_empty() {
            None
        } else {
            Some(encode_sections(&popup.sections)?)
        };
        Ok(Self {
            sections,
            custom_buttons: encode_buttons(&popup.custom_buttons)?,
        })
    }
}

type PopupQuery<'q> = QueryAs<'q, Postgres, PopupRow, PgArguments>;

/// Bind the 36 editor-owned columns as `$1..$36`, in the order used by both
/// the insert and the update statement. `is_active` is not among them; only
/// the insert and the toggle write it.
fn bind_editable<'q>(
    query: PopupQuery<'q>,
    popup: &'q PopupConfig,
    blobs: &'q EncodedBlobs,
) -> PopupQuery<'q> {
    let design = &popup.design;
    query
        .bind(popup.name.trim())
        .bind(popup.is_multi_step)
        .bind(blobs.sections.as_deref())
        .bind(blobs.custom_buttons.as_str())
        .bind(popup.legacy.heading.as_str())
        .bind(popup.legacy.description.as_str())
        .bind(popup.legacy.email_placeholder.as_str())
        .bind(popup.legacy.enable_phone_field)
        .bind(popup.legacy.phone_required)
        .bind(popup.legacy.phone_placeholder.as_str())
        .bind(popup.footer_text.as_str())
        .bind(design.popup_background.as_str())
        .bind(design.text_heading.as_str())
        .bind(design.text_description.as_str())
        .bind(design.text_input.as_str())
        .bind(design.text_consent.as_str())
        .bind(design.text_error.as_str())
        .bind(design.text_label.as_str())
        .bind(design.text_footer.as_str())
        .bind(design.primary_btn_bg.as_str())
        .bind(design.primary_btn_text.as_str())
        .bind(design.secondary_btn_text.as_str())
        .bind(design.custom_btn_bg.as_str())
        .bind(design.custom_btn_text.as_str())
        .bind(design.logo_url.as_str())
        .bind(i32::try_from(design.logo_width).unwrap_or(i32::MAX))
        .bind(design.image_url.as_str())
        .bind(design.image_position.as_str())
        .bind(design.display_size.as_str())
        .bind(design.corner_radius.as_str())
        .bind(design.alignment.as_str())
        .bind(design.hide_on_mobile)
        .bind(design.background_on_mobile)
        .bind(popup.discount.discount_type.as_str())
        .bind(popup.discount.discount_value)
        .bind(popup.discount.discount_code.as_deref())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the shop's popups for the list view, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_popups_by_shop(pool: &PgPool, shop: &str) -> Result<Vec<PopupSummary>, DbError> {
    let rows = sqlx::query_as::<_, PopupSummary>(concat!(
        "SELECT ",
        popup_summary_columns!(),
        " FROM popups WHERE shop = $1 ORDER BY updated_at DESC, id DESC"
    ))
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single popup owned by `shop`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_popup(
    pool: &PgPool,
    shop: &str,
    public_id: Uuid,
) -> Result<Option<PopupRow>, DbError> {
    let row = sqlx::query_as::<_, PopupRow>(concat!(
        "SELECT ",
        popup_row_columns!(),
        " FROM popups WHERE public_id = $1 AND shop = $2"
    ))
    .bind(public_id)
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a popup for `shop`, keeping the config's id as the public id.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if a blob cannot be serialized, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn create_popup(
    pool: &PgPool,
    shop: &str,
    popup: &PopupConfig,
) -> Result<PopupRow, DbError> {
    let blobs = EncodedBlobs::from_config(popup)?;
    let query = sqlx::query_as::<_, PopupRow>(concat!(
        "INSERT INTO popups (name, is_multi_step, sections, custom_buttons, \
                heading, description, email_placeholder, enable_phone_field, phone_required, \
                phone_placeholder, footer_text, popup_background, text_heading, text_description, \
                text_input, text_consent, text_error, text_label, text_footer, primary_btn_bg, \
                primary_btn_text, secondary_btn_text, custom_btn_bg, custom_btn_text, logo_url, \
                logo_width, image_url, image_position, display_size, corner_radius, alignment, \
                hide_on_mobile, background_on_mobile, discount_type, discount_value, discount_code, \
                is_active, public_id, shop) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                 $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33, \
                 $34, $35, $36, $37, $38, $39) \
         RETURNING ",
        popup_row_columns!()
    ));

    let row = bind_editable(query, popup, &blobs)
        .bind(popup.is_active)
        .bind(popup.id)
        .bind(shop)
        .fetch_one(pool)
        .await?;

    tracing::debug!(popup_id = %row.public_id, shop, "popup created");
    Ok(row)
}

/// Overwrites every editor-owned field of a popup owned by `shop` and bumps
/// `updated_at`. `is_active` is left alone so a toggle made elsewhere
/// survives saving an older draft.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the popup does not exist for this shop,
/// [`DbError::Encode`] if a blob cannot be serialized, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_popup(
    pool: &PgPool,
    shop: &str,
    popup: &PopupConfig,
) -> Result<PopupRow, DbError> {
    let blobs = EncodedBlobs::from_config(popup)?;
    let query = sqlx::query_as::<_, PopupRow>(concat!(
        "UPDATE popups SET \
            name = $1, is_multi_step = $2, sections = $3, custom_buttons = $4, \
            heading = $5, description = $6, email_placeholder = $7, enable_phone_field = $8, \
            phone_required = $9, phone_placeholder = $10, footer_text = $11, \
            popup_background = $12, text_heading = $13, text_description = $14, \
            text_input = $15, text_consent = $16, text_error = $17, text_label = $18, \
            text_footer = $19, primary_btn_bg = $20, primary_btn_text = $21, \
            secondary_btn_text = $22, custom_btn_bg = $23, custom_btn_text = $24, \
            logo_url = $25, logo_width = $26, image_url = $27, image_position = $28, \
            display_size = $29, corner_radius = $30, alignment = $31, hide_on_mobile = $32, \
            background_on_mobile = $33, discount_type = $34, discount_value = $35, \
            discount_code = $36, updated_at = NOW() \
         WHERE public_id = $37 AND shop = $38 \
         RETURNING ",
        popup_row_columns!()
    ));

    bind_editable(query, popup, &blobs)
        .bind(popup.id)
        .bind(shop)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Deletes a popup owned by `shop`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matched, or [`DbError::Sqlx`] if
/// the delete fails.
pub async fn delete_popup(pool: &PgPool, shop: &str, public_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM popups WHERE public_id = $1 AND shop = $2")
        .bind(public_id)
        .bind(shop)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Flips `is_active` on a popup owned by `shop` and returns its new summary.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matched, or [`DbError::Sqlx`] if
/// the update fails.
pub async fn toggle_popup_active(
    pool: &PgPool,
    shop: &str,
    public_id: Uuid,
) -> Result<PopupSummary, DbError> {
    sqlx::query_as::<_, PopupSummary>(concat!(
        "UPDATE popups SET is_active = NOT is_active, updated_at = NOW() \
         WHERE public_id = $1 AND shop = $2 \
         RETURNING ",
        popup_summary_columns!()
    ))
    .bind(public_id)
    .bind(shop)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}
