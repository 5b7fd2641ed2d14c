//! Visual configuration of a popup: the global design values and the sparse
//! per-section override set that cascades over them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_POPUP_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_TEXT_HEADING: &str = "#000000";
pub const DEFAULT_TEXT_DESCRIPTION: &str = "#666666";
pub const DEFAULT_TEXT_INPUT: &str = "#000000";
pub const DEFAULT_TEXT_CONSENT: &str = "#666666";
pub const DEFAULT_TEXT_ERROR: &str = "#FF0000";
pub const DEFAULT_TEXT_LABEL: &str = "#000000";
pub const DEFAULT_TEXT_FOOTER: &str = "#999999";
pub const DEFAULT_PRIMARY_BTN_BG: &str = "#000000";
pub const DEFAULT_PRIMARY_BTN_TEXT: &str = "#FFFFFF";
pub const DEFAULT_SECONDARY_BTN_TEXT: &str = "#666666";
pub const DEFAULT_CUSTOM_BTN_BG: &str = "#E5E5E5";
pub const DEFAULT_CUSTOM_BTN_TEXT: &str = "#000000";
pub const DEFAULT_LOGO_WIDTH: u32 = 35;

/// Where the popup image is placed relative to the content column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ImagePosition {
    Left,
    Right,
    Top,
    Background,
    #[default]
    None,
}

impl From<String> for ImagePosition {
    fn from(value: String) -> Self {
        match value.as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "background" => Self::Background,
            _ => Self::None,
        }
    }
}

impl ImagePosition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Background => "background",
            Self::None => "none",
        }
    }

    /// `true` for the two side-by-side placements.
    #[must_use]
    pub fn is_side(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DisplaySize {
    Small,
    #[default]
    Standard,
    Large,
}

impl From<String> for DisplaySize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Standard,
        }
    }
}

impl DisplaySize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Standard => "standard",
            Self::Large => "large",
        }
    }

    /// Maximum container width on the desktop target, in pixels.
    #[must_use]
    pub fn max_width_px(self) -> u32 {
        match self {
            Self::Small => 400,
            Self::Standard => 500,
            Self::Large => 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CornerRadius {
    Square,
    #[default]
    Standard,
    Rounded,
}

impl From<String> for CornerRadius {
    fn from(value: String) -> Self {
        match value.as_str() {
            "square" => Self::Square,
            "rounded" => Self::Rounded,
            _ => Self::Standard,
        }
    }
}

impl CornerRadius {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Standard => "standard",
            Self::Rounded => "rounded",
        }
    }

    #[must_use]
    pub fn px(self) -> u32 {
        match self {
            Self::Square => 0,
            Self::Standard => 8,
            Self::Rounded => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl From<String> for Alignment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

impl Alignment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// The fully populated design of a popup.
///
/// Used both for the popup's global fields and for the effective design a
/// resolver produces. Empty `logo_url` / `image_url` mean "no asset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignValues {
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
    pub logo_width: u32,
    pub image_url: String,
    pub image_position: ImagePosition,
    pub display_size: DisplaySize,
    pub corner_radius: CornerRadius,
    pub alignment: Alignment,
    pub hide_on_mobile: bool,
    pub background_on_mobile: bool,
}

impl Default for DesignValues {
    fn default() -> Self {
        Self {
            popup_background: DEFAULT_POPUP_BACKGROUND.to_string(),
            text_heading: DEFAULT_TEXT_HEADING.to_string(),
            text_description: DEFAULT_TEXT_DESCRIPTION.to_string(),
            text_input: DEFAULT_TEXT_INPUT.to_string(),
            text_consent: DEFAULT_TEXT_CONSENT.to_string(),
            text_error: DEFAULT_TEXT_ERROR.to_string(),
            text_label: DEFAULT_TEXT_LABEL.to_string(),
            text_footer: DEFAULT_TEXT_FOOTER.to_string(),
            primary_btn_bg: DEFAULT_PRIMARY_BTN_BG.to_string(),
            primary_btn_text: DEFAULT_PRIMARY_BTN_TEXT.to_string(),
            secondary_btn_text: DEFAULT_SECONDARY_BTN_TEXT.to_string(),
            custom_btn_bg: DEFAULT_CUSTOM_BTN_BG.to_string(),
            custom_btn_text: DEFAULT_CUSTOM_BTN_TEXT.to_string(),
            logo_url: String::new(),
            logo_width: DEFAULT_LOGO_WIDTH,
            image_url: String::new(),
            image_position: ImagePosition::None,
            display_size: DisplaySize::Standard,
            corner_radius: CornerRadius::Standard,
            alignment: Alignment::Center,
            hide_on_mobile: false,
            background_on_mobile: false,
        }
    }
}

impl DesignValues {
    /// Overlay every present key of `overrides` onto a copy of `self`.
    ///
    /// Fallback is per key: an absent override keeps the value from `self`.
    #[must_use]
    pub fn overlay(&self, overrides: &DesignOverrides) -> Self {
        let mut out = self.clone();
        overrides.apply_to(&mut out);
        out
    }

    /// Iterate the color fields as `(camelCase name, value)` pairs.
    pub fn colors(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("popupBackground", self.popup_background.as_str()),
            ("textHeading", self.text_heading.as_str()),
            ("textDescription", self.text_description.as_str()),
            ("textInput", self.text_input.as_str()),
            ("textConsent", self.text_consent.as_str()),
            ("textError", self.text_error.as_str()),
            ("textLabel", self.text_label.as_str()),
            ("textFooter", self.text_footer.as_str()),
            ("primaryBtnBg", self.primary_btn_bg.as_str()),
            ("primaryBtnText", self.primary_btn_text.as_str()),
            ("secondaryBtnText", self.secondary_btn_text.as_str()),
            ("customBtnBg", self.custom_btn_bg.as_str()),
            ("customBtnText", self.custom_btn_text.as_str()),
        ]
        .into_iter()
    }
}

/// Sparse design overrides stored on a section. Also doubles as a patch:
/// applying it writes only the keys that are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_consent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_btn_bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_btn_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_btn_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_btn_bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_btn_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_position: Option<ImagePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_size: Option<DisplaySize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<CornerRadius>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_on_mobile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_on_mobile: Option<bool>,
}

macro_rules! overlay_fields {
    ($src:expr, $dst:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = &$src.$field {
                $dst.$field = v.clone();
            }
        )+
    };
}

macro_rules! merge_fields {
    ($src:expr, $dst:expr; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field.clone_from(&$src.$field);
            }
        )+
    };
}

impl DesignOverrides {
    /// The full override set a freshly created section is seeded with.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from(&DesignValues::default())
    }

    /// Write every present key onto `target`.
    pub fn apply_to(&self, target: &mut DesignValues) {
        overlay_fields!(self, target;
            popup_background, text_heading, text_description, text_input,
            text_consent, text_error, text_label, text_footer,
            primary_btn_bg, primary_btn_text, secondary_btn_text,
            custom_btn_bg, custom_btn_text, logo_url, logo_width, image_url,
            image_position, display_size, corner_radius, alignment,
            hide_on_mobile, background_on_mobile,
        );
    }

    /// Merge another override set into this one; keys present in `patch` win.
    pub fn merge(&mut self, patch: &DesignOverrides) {
        merge_fields!(patch, self;
            popup_background, text_heading, text_description, text_input,
            text_consent, text_error, text_label, text_footer,
            primary_btn_bg, primary_btn_text, secondary_btn_text,
            custom_btn_bg, custom_btn_text, logo_url, logo_width, image_url,
            image_position, display_size, corner_radius, alignment,
            hide_on_mobile, background_on_mobile,
        );
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Present color keys as `(camelCase name, value)` pairs.
    pub fn colors(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("popupBackground", self.popup_background.as_deref()),
            ("textHeading", self.text_heading.as_deref()),
            ("textDescription", self.text_description.as_deref()),
            ("textInput", self.text_input.as_deref()),
            ("textConsent", self.text_consent.as_deref()),
            ("textError", self.text_error.as_deref()),
            ("textLabel", self.text_label.as_deref()),
            ("textFooter", self.text_footer.as_deref()),
            ("primaryBtnBg", self.primary_btn_bg.as_deref()),
            ("primaryBtnText", self.primary_btn_text.as_deref()),
            ("secondaryBtnText", self.secondary_btn_text.as_deref()),
            ("customBtnBg", self.custom_btn_bg.as_deref()),
            ("customBtnText", self.custom_btn_text.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

impl From<&DesignValues> for DesignOverrides {
    fn from(values: &DesignValues) -> Self {
        Self {
            popup_background: Some(values.popup_background.clone()),
            text_heading: Some(values.text_heading.clone()),
            text_description: Some(values.text_description.clone()),
            text_input: Some(values.text_input.clone()),
            text_consent: Some(values.text_consent.clone()),
            text_error: Some(values.text_error.clone()),
            text_label: Some(values.text_label.clone()),
            text_footer: Some(values.text_footer.clone()),
            primary_btn_bg: Some(values.primary_btn_bg.clone()),
            primary_btn_text: Some(values.primary_btn_text.clone()),
            secondary_btn_text: Some(values.secondary_btn_text.clone()),
            custom_btn_bg: Some(values.custom_btn_bg.clone()),
            custom_btn_text: Some(values.custom_btn_text.clone()),
            logo_url: Some(values.logo_url.clone()),
            logo_width: Some(values.logo_width),
            image_url: Some(values.image_url.clone()),
            image_position: Some(values.image_position),
            display_size: Some(values.display_size),
            corner_radius: Some(values.corner_radius),
            alignment: Some(values.alignment),
            hide_on_mobile: Some(values.hide_on_mobile),
            background_on_mobile: Some(values.background_on_mobile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let overrides: DesignOverrides = serde_json::from_str(
            r#"{"imagePosition":"diagonal","displaySize":"huge","cornerRadius":"pill","alignment":"justify"}"#,
        )
        .expect("lenient enums");
        assert_eq!(overrides.image_position, Some(ImagePosition::None));
        assert_eq!(overrides.display_size, Some(DisplaySize::Standard));
        assert_eq!(overrides.corner_radius, Some(CornerRadius::Standard));
        assert_eq!(overrides.alignment, Some(Alignment::Center));
    }

    #[test]
    fn overlay_is_per_key() {
        let global = DesignValues {
            popup_background: "#FFFFFF".to_string(),
            text_heading: "#111111".to_string(),
            ..DesignValues::default()
        };
        let overrides = DesignOverrides {
            popup_background: Some("#112233".to_string()),
            ..DesignOverrides::default()
        };
        let effective = global.overlay(&overrides);
        assert_eq!(effective.popup_background, "#112233");
        assert_eq!(effective.text_heading, "#111111");
    }

    #[test]
    fn empty_string_override_still_wins() {
        let global = DesignValues {
            logo_url: "https://cdn.example.com/logo.png".to_string(),
            ..DesignValues::default()
        };
        let overrides = DesignOverrides {
            logo_url: Some(String::new()),
            ..DesignOverrides::default()
        };
        assert_eq!(global.overlay(&overrides).logo_url, "");
    }

    #[test]
    fn seeded_overrides_cover_every_key() {
        let seeded = DesignOverrides::seeded();
        let json = serde_json::to_value(&seeded).expect("serialize");
        assert_eq!(json.as_object().map(serde_json::Map::len), Some(22));
        assert_eq!(json["imagePosition"], "none");
        assert_eq!(json["logoWidth"], 35);
    }

    #[test]
    fn merge_keeps_absent_keys() {
        let mut base = DesignOverrides {
            text_heading: Some("#000000".to_string()),
            ..DesignOverrides::default()
        };
        base.merge(&DesignOverrides {
            popup_background: Some("#ABCDEF".to_string()),
            ..DesignOverrides::default()
        });
        assert_eq!(base.text_heading.as_deref(), Some("#000000"));
        assert_eq!(base.popup_background.as_deref(), Some("#ABCDEF"));
    }
}
