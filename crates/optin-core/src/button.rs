use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EditorError;

/// Identifier of a button within its owning list.
///
/// Freshly created buttons get numeric ids; seeded buttons carry the literal
/// id `"default"`, so both shapes must survive a round trip. A numeric string
/// such as `"123"` decodes as `Number(123)` so it matches the `custom-123` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ButtonId {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredButtonId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for ButtonId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match StoredButtonId::deserialize(deserializer)? {
            StoredButtonId::Number(n) => Self::Number(n),
            StoredButtonId::Text(text) => Self::from(text.as_str()),
        })
    }
}

impl ButtonId {
    #[must_use]
    pub fn default_id() -> Self {
        Self::Text("default".to_string())
    }

    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ButtonId {
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map_or_else(|_| Self::Text(value.to_string()), Self::Number)
    }
}

/// What happens when the visitor clicks a button.
///
/// Historical spellings `close` and `continue` are accepted and normalized to
/// `close_popup` and `navigate`. Anything unrecognized or missing is treated
/// as `custom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ButtonAction {
    Link,
    ClosePopup,
    Submit,
    Navigate,
    #[default]
    Custom,
}

impl From<String> for ButtonAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "link" => Self::Link,
            "close_popup" | "close" => Self::ClosePopup,
            "submit" => Self::Submit,
            "navigate" | "continue" | "next" => Self::Navigate,
            _ => Self::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ButtonStyleKind {
    Filled,
    #[default]
    Outline,
    Plain,
}

impl From<String> for ButtonStyleKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "filled" => Self::Filled,
            "plain" => Self::Plain,
            _ => Self::Outline,
        }
    }
}

/// Sparse per-button color/style override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyleKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: ButtonId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub action: ButtonAction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default)]
    pub style: ButtonStyleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_style: Option<ButtonStyleOverride>,
}

impl Button {
    pub const DEFAULT_TEXT: &'static str = "New Button";

    /// The button every new section starts with.
    #[must_use]
    pub fn section_default() -> Self {
        Self {
            id: ButtonId::default_id(),
            text: Self::DEFAULT_TEXT.to_string(),
            action: ButtonAction::ClosePopup,
            url: String::new(),
            style: ButtonStyleKind::Outline,
            button_style: None,
        }
    }

    /// A blank link button, as created by the "add button" action.
    #[must_use]
    pub fn new_link(id: i64) -> Self {
        Self {
            id: ButtonId::Number(id),
            text: Self::DEFAULT_TEXT.to_string(),
            action: ButtonAction::Link,
            url: String::new(),
            style: ButtonStyleKind::Outline,
            button_style: None,
        }
    }

    pub fn apply(&mut self, patch: &ButtonPatch) {
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
        if let Some(url) = &patch.url {
            self.url.clone_from(url);
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
    }
}

/// Partial update for a button's content fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonPatch {
    pub text: Option<String>,
    pub action: Option<ButtonAction>,
    pub url: Option<String>,
    pub style: Option<ButtonStyleKind>,
}

/// Key used by the style-selection UI: `"primary"` or `"custom-<id>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonKey {
    Primary,
    Custom(ButtonId),
}

impl FromStr for ButtonKey {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "primary" {
            return Ok(Self::Primary);
        }
        match s.strip_prefix("custom-") {
            Some(id) if !id.is_empty() => Ok(Self::Custom(ButtonId::from(id))),
            _ => Err(EditorError::InvalidButtonKey(s.to_string())),
        }
    }
}

impl fmt::Display for ButtonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Custom(id) => write!(f, "custom-{id}"),
        }
    }
}

impl Serialize for ButtonKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ButtonKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One field of a button's style, as edited by the design tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonStyleField {
    BackgroundColor,
    TextColor,
    Style,
}

/// A button style with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedButtonStyle {
    pub background_color: String,
    pub text_color: String,
    pub style: ButtonStyleKind,
}
