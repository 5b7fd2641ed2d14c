use std::fmt;

use serde::{Deserialize, Serialize};

use crate::button::{Button, ButtonId, ButtonStyleOverride};
use crate::design::DesignOverrides;

pub const DEFAULT_HEADING: &str = "Get 10% OFF your order";
pub const DEFAULT_DESCRIPTION: &str = "Sign up and unlock your instant discount.";
pub const DEFAULT_EMAIL_PLACEHOLDER: &str = "Email address";
pub const DEFAULT_PHONE_PLACEHOLDER: &str = "Phone number";
pub const DEFAULT_FOOTER_TEXT: &str =
    "You are signing up to receive communication via email and can unsubscribe at any time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical section type. Older stored variants are folded into this one at
/// load time by [`crate::codec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Universal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionContent {
    pub heading: String,
    pub description: String,
    pub enable_email_capture: bool,
    pub email_placeholder: String,
    pub enable_phone_capture: bool,
    pub phone_placeholder: String,
    pub phone_required: bool,
    pub custom_buttons: Vec<Button>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_button_style: Option<ButtonStyleOverride>,
    pub footer_text: String,
    pub image_url: String,
}

impl SectionContent {
    #[must_use]
    pub fn button(&self, id: &ButtonId) -> Option<&Button> {
        self.custom_buttons.iter().find(|b| &b.id == id)
    }

    pub fn button_mut(&mut self, id: &ButtonId) -> Option<&mut Button> {
        self.custom_buttons.iter_mut().find(|b| &b.id == id)
    }
}

/// Partial update for a section's content. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPatch {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub enable_email_capture: Option<bool>,
    pub email_placeholder: Option<String>,
    pub enable_phone_capture: Option<bool>,
    pub phone_placeholder: Option<String>,
    pub phone_required: Option<bool>,
    pub footer_text: Option<String>,
    pub image_url: Option<String>,
}

impl ContentPatch {
    pub fn apply_to(&self, content: &mut SectionContent) {
        if let Some(v) = &self.heading {
            content.heading.clone_from(v);
        }
        if let Some(v) = &self.description {
            content.description.clone_from(v);
        }
        if let Some(v) = self.enable_email_capture {
            content.enable_email_capture = v;
        }
        if let Some(v) = &self.email_placeholder {
            content.email_placeholder.clone_from(v);
        }
        if let Some(v) = self.enable_phone_capture {
            content.enable_phone_capture = v;
        }
        if let Some(v) = &self.phone_placeholder {
            content.phone_placeholder.clone_from(v);
        }
        if let Some(v) = self.phone_required {
            content.phone_required = v;
        }
        if let Some(v) = &self.footer_text {
            content.footer_text.clone_from(v);
        }
        if let Some(v) = &self.image_url {
            content.image_url.clone_from(v);
        }
    }
}

/// One step of a popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "type", default)]
    pub kind: SectionKind,
    /// Editor-only label.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub content: SectionContent,
    #[serde(default)]
    pub design: DesignOverrides,
}

impl Section {
    /// A section as created by the "add section" action: neutral copy, email
    /// capture off, one default button and a fully seeded design.
    ///
    /// `number` is the 1-based position the section will occupy.
    #[must_use]
    pub fn blank(id: SectionId, number: usize) -> Self {
        let label = format!("Section {number}");
        Self {
            id,
            kind: SectionKind::Universal,
            title: label.clone(),
            order: number.saturating_sub(1),
            content: SectionContent {
                heading: label,
                description: "Add your content here".to_string(),
                enable_email_capture: false,
                email_placeholder: DEFAULT_EMAIL_PLACEHOLDER.to_string(),
                enable_phone_capture: false,
                phone_placeholder: DEFAULT_PHONE_PLACEHOLDER.to_string(),
                phone_required: false,
                custom_buttons: vec![Button::section_default()],
                primary_button_style: None,
                footer_text: String::new(),
                image_url: String::new(),
            },
            design: DesignOverrides::seeded(),
        }
    }
}

/// Rewrite every section's `order` to match its index.
pub fn renumber(sections: &mut [Section]) {
    for (index, section) in sections.iter_mut().enumerate() {
        section.order = index;
    }
}

/// `true` when `order` values are exactly `0..len` in array order.
#[must_use]
pub fn is_densely_ordered(sections: &[Section]) -> bool {
    sections.iter().enumerate().all(|(i, s)| s.order == i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_section_has_one_default_button() {
        let section = Section::blank(SectionId(7), 2);
        assert_eq!(section.title, "Section 2");
        assert_eq!(section.order, 1);
        assert_eq!(section.content.custom_buttons.len(), 1);
        assert_eq!(section.content.custom_buttons[0].id, ButtonId::default_id());
        assert!(!section.content.enable_email_capture);
        assert_eq!(section.design, DesignOverrides::seeded());
    }

    #[test]
    fn type_tag_serializes_as_universal() {
        let json = serde_json::to_value(Section::blank(SectionId(1), 1)).expect("serialize");
        assert_eq!(json["type"], "universal");
        assert_eq!(json["id"], 1);
        assert_eq!(json["content"]["enableEmailCapture"], false);
        assert!(json["content"].get("primaryButtonStyle").is_none());
    }

    #[test]
    fn renumber_makes_order_dense() {
        let mut sections = vec![
            Section::blank(SectionId(1), 3),
            Section::blank(SectionId(2), 9),
        ];
        assert!(!is_densely_ordered(&sections));
        renumber(&mut sections);
        assert!(is_densely_ordered(&sections));
    }

    #[test]
    fn content_patch_only_touches_present_fields() {
        let mut content = Section::blank(SectionId(1), 1).content;
        ContentPatch {
            heading: Some("Hello".to_string()),
            enable_phone_capture: Some(true),
            ..ContentPatch::default()
        }
        .apply_to(&mut content);
        assert_eq!(content.heading, "Hello");
        assert!(content.enable_phone_capture);
        assert_eq!(content.description, "Add your content here");
    }
}
