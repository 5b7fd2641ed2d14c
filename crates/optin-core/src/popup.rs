use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::button::{Button, ButtonAction, ButtonId, ButtonStyleKind};
use crate::color::is_valid_hex;
use crate::design::DesignValues;
use crate::section::{
    is_densely_ordered, Section, DEFAULT_DESCRIPTION, DEFAULT_EMAIL_PLACEHOLDER,
    DEFAULT_FOOTER_TEXT, DEFAULT_HEADING, DEFAULT_PHONE_PLACEHOLDER,
};
use crate::ValidationError;

pub const MAX_NAME_LEN: usize = 50;
pub const LOGO_WIDTH_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Discount configuration. Passed through untouched by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountSettings {
    pub discount_type: String,
    pub discount_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

impl Default for DiscountSettings {
    fn default() -> Self {
        Self {
            discount_type: "percentage".to_string(),
            discount_value: Decimal::from(10),
            discount_code: None,
        }
    }
}

/// Pre-sections top-level content. Still written on create and read when a
/// stored popup has no sections yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyContent {
    pub heading: String,
    pub description: String,
    pub email_placeholder: String,
    pub enable_phone_field: bool,
    pub phone_required: bool,
    pub phone_placeholder: String,
}

impl Default for LegacyContent {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            email_placeholder: DEFAULT_EMAIL_PLACEHOLDER.to_string(),
            enable_phone_field: false,
            phone_required: false,
            phone_placeholder: DEFAULT_PHONE_PLACEHOLDER.to_string(),
        }
    }
}

/// The canonical in-memory popup: what the editor mutates and the preview
/// renders.
///
/// Global design fields, discount fields and legacy content are flattened into
/// the top level so the JSON shape matches the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_multi_step: bool,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub footer_text: String,
    #[serde(flatten)]
    pub design: DesignValues,
    /// Top-level button list kept for older records.
    #[serde(default)]
    pub custom_buttons: Vec<Button>,
    #[serde(flatten)]
    pub discount: DiscountSettings,
    #[serde(flatten)]
    pub legacy: LegacyContent,
}

impl PopupConfig {
    /// The record a "new popup" submission produces, before any section has
    /// been materialized. Loading it through [`crate::codec`] yields the
    /// one-section canonical draft.
    #[must_use]
    pub fn new_record(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            is_active: false,
            is_multi_step: false,
            sections: Vec::new(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
            design: DesignValues::default(),
            custom_buttons: vec![Button {
                id: ButtonId::default_id(),
                text: "Join Now".to_string(),
                action: ButtonAction::ClosePopup,
                url: String::new(),
                style: ButtonStyleKind::Outline,
                button_style: None,
            }],
            discount: DiscountSettings::default(),
            legacy: LegacyContent::default(),
        }
    }

    #[must_use]
    pub fn section(&self, id: crate::SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: crate::SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn section_index(&self, id: crate::SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Check a draft before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;

        if self.sections.is_empty() {
            return Err(ValidationError::NoSections);
        }
        if !is_densely_ordered(&self.sections) {
            return Err(ValidationError::SectionOrder);
        }

        for (field, value) in self.design.colors() {
            check_color("global", field, value)?;
        }
        check_logo_width(self.design.logo_width)?;

        for section in &self.sections {
            let scope = format!("section {}", section.id);
            for (field, value) in section.design.colors() {
                check_color(&scope, field, value)?;
            }
            if let Some(width) = section.design.logo_width {
                check_logo_width(width)?;
            }
            if let Some(style) = &section.content.primary_button_style {
                check_optional_color(&scope, "primaryButtonStyle.backgroundColor", style.background_color.as_deref())?;
                check_optional_color(&scope, "primaryButtonStyle.textColor", style.text_color.as_deref())?;
            }
            for button in &section.content.custom_buttons {
                check_button(&scope, button)?;
            }
        }

        for button in &self.custom_buttons {
            check_button("global", button)?;
        }

        Ok(())
    }

    /// Every `link` button url in the draft, for callers that want a stricter
    /// url check than non-emptiness.
    pub fn link_urls(&self) -> impl Iterator<Item = (&ButtonId, &str)> {
        self.sections
            .iter()
            .flat_map(|s| s.content.custom_buttons.iter())
            .chain(self.custom_buttons.iter())
            .filter(|b| b.action == ButtonAction::Link)
            .map(|b| (&b.id, b.url.as_str()))
    }
}

/// Validate a popup name: trimmed, non-empty, at most [`MAX_NAME_LEN`] chars.
///
/// # Errors
///
/// Returns [`ValidationError::NameRequired`] or [`ValidationError::NameTooLong`].
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(trimmed)
}

fn check_color(scope: &str, field: &str, value: &str) -> Result<(), ValidationError> {
    if is_valid_hex(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor {
            scope: scope.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

fn check_optional_color(scope: &str, field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| check_color(scope, field, v))
}

fn check_logo_width(width: u32) -> Result<(), ValidationError> {
    if LOGO_WIDTH_RANGE.contains(&width) {
        Ok(())
    } else {
        Err(ValidationError::LogoWidth(width))
    }
}

fn check_button(scope: &str, button: &Button) -> Result<(), ValidationError> {
    if button.action == ButtonAction::Link && button.url.trim().is_empty() {
        return Err(ValidationError::MissingLinkUrl {
            scope: scope.to_string(),
            button: button.id.to_string(),
        });
    }
    if let Some(style) = &button.button_style {
        let field = format!("button {} style", button.id);
        check_optional_color(scope, &field, style.background_color.as_deref())?;
        check_optional_color(scope, &field, style.text_color.as_deref())?;
    }
    Ok(())
}
