//! One-time migration of stored popups into the canonical draft shape.
//!
//! Two historical layouts exist: records with no `sections` at all (content
//! lives in top-level legacy fields) and records whose sections use the typed
//! `intro` / `email_capture` / `custom` variants. Both are folded into
//! `universal` sections here, at load, so nothing downstream branches on
//! section type.

use serde::Deserialize;
use serde_json::Value;

use crate::button::{Button, ButtonAction, ButtonId, ButtonStyleKind};
use crate::design::DesignOverrides;
use crate::popup::PopupConfig;
use crate::section::{
    renumber, Section, SectionContent, SectionId, SectionKind, DEFAULT_DESCRIPTION,
    DEFAULT_EMAIL_PLACEHOLDER, DEFAULT_FOOTER_TEXT, DEFAULT_HEADING, DEFAULT_PHONE_PLACEHOLDER,
};

const MIGRATED_SECTION_TITLE: &str = "Email Capture";

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StoredSection {
    Universal(Section),
    Intro(TypedSection),
    EmailCapture(TypedSection),
    Custom(TypedSection),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypedSection {
    id: SectionId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    order: usize,
    #[serde(default)]
    content: TypedContent,
    #[serde(default)]
    design: DesignOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TypedContent {
    heading: String,
    description: String,
    email_placeholder: Option<String>,
    primary_button: Option<String>,
    secondary_button: Option<String>,
    button_text: Option<String>,
    footer_text: String,
    image_url: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn legacy_button(id: &str, text: String, action: ButtonAction, style: ButtonStyleKind) -> Button {
    Button {
        id: ButtonId::Text(id.to_string()),
        text,
        action,
        url: String::new(),
        style,
        button_style: None,
    }
}

impl TypedSection {
    fn into_universal(self, email_capture: bool) -> Section {
        let TypedContent {
            heading,
            description,
            email_placeholder,
            primary_button,
            secondary_button,
            button_text,
            footer_text,
            image_url,
        } = self.content;

        let mut buttons = Vec::new();
        if email_capture {
            let text = non_empty(primary_button)
                .or_else(|| non_empty(button_text))
                .unwrap_or_else(|| "Claim discount".to_string());
            buttons.push(legacy_button("primary", text, ButtonAction::Submit, ButtonStyleKind::Filled));
        } else {
            let text = non_empty(button_text)
                .or_else(|| non_empty(primary_button))
                .unwrap_or_else(|| "Continue".to_string());
            buttons.push(legacy_button("primary", text, ButtonAction::Navigate, ButtonStyleKind::Filled));
        }
        if let Some(text) = non_empty(secondary_button) {
            buttons.push(legacy_button("secondary", text, ButtonAction::Navigate, ButtonStyleKind::Plain));
        }

        Section {
            id: self.id,
            kind: SectionKind::Universal,
            title: self.title,
            order: self.order,
            content: SectionContent {
                heading,
                description,
                enable_email_capture: email_capture,
                email_placeholder: non_empty(email_placeholder)
                    .unwrap_or_else(|| DEFAULT_EMAIL_PLACEHOLDER.to_string()),
                enable_phone_capture: false,
                phone_placeholder: DEFAULT_PHONE_PLACEHOLDER.to_string(),
                phone_required: false,
                custom_buttons: buttons,
                primary_button_style: None,
                footer_text,
                image_url,
            },
            design: self.design,
        }
    }
}

/// Decode one stored section of any generation into the canonical shape.
///
/// A missing `type` is read as `universal`.
///
/// # Errors
///
/// Returns the `serde_json` error when the value is not a section at all.
pub fn section_from_stored(mut value: Value) -> Result<Section, serde_json::Error> {
    if let Value::Object(map) = &mut value {
        let untyped = map.get("type").map_or(true, Value::is_null);
        if untyped {
            map.insert("type".to_string(), Value::String("universal".to_string()));
        }
    }
    Ok(match serde_json::from_value::<StoredSection>(value)? {
        StoredSection::Universal(section) => section,
        StoredSection::EmailCapture(typed) => typed.into_universal(true),
        StoredSection::Intro(typed) | StoredSection::Custom(typed) => typed.into_universal(false),
    })
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Build the single section a popup without stored sections is shown as.
#[must_use]
pub fn section_from_legacy(popup: &PopupConfig) -> Section {
    let buttons = if popup.custom_buttons.is_empty() {
        vec![Button::section_default()]
    } else {
        popup.custom_buttons.clone()
    };

    Section {
        id: SectionId(1),
        kind: SectionKind::Universal,
        title: MIGRATED_SECTION_TITLE.to_string(),
        order: 0,
        content: SectionContent {
            heading: or_default(&popup.legacy.heading, DEFAULT_HEADING),
            description: or_default(&popup.legacy.description, DEFAULT_DESCRIPTION),
            enable_email_capture: true,
            email_placeholder: or_default(&popup.legacy.email_placeholder, DEFAULT_EMAIL_PLACEHOLDER),
            enable_phone_capture: popup.legacy.enable_phone_field,
            phone_placeholder: or_default(&popup.legacy.phone_placeholder, DEFAULT_PHONE_PLACEHOLDER),
            phone_required: popup.legacy.phone_required,
            custom_buttons: buttons,
            primary_button_style: None,
            footer_text: or_default(&popup.footer_text, DEFAULT_FOOTER_TEXT),
            image_url: String::new(),
        },
        design: DesignOverrides::seeded(),
    }
}

/// Bring a freshly decoded popup into canonical form: synthesize a section
/// when none survived decoding, then make `order` match array position.
#[must_use]
pub fn canonicalize(mut popup: PopupConfig) -> PopupConfig {
    if popup.sections.is_empty() {
        tracing::debug!(popup_id = %popup.id, "synthesizing section from legacy fields");
        popup.sections.push(section_from_legacy(&popup));
    }
    renumber(&mut popup.sections);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_canonicalizes_to_one_universal_section() {
        let draft = canonicalize(PopupConfig::new_record("Spring Sale"));
        assert_eq!(draft.sections.len(), 1);
        let section = &draft.sections[0];
        assert_eq!(section.kind, SectionKind::Universal);
        assert_eq!(section.order, 0);
        assert!(section.content.enable_email_capture);
        assert_eq!(section.content.custom_buttons.len(), 1);
        let button = &section.content.custom_buttons[0];
        assert_eq!(button.action, ButtonAction::ClosePopup);
        assert_eq!(button.style, ButtonStyleKind::Outline);
    }

    #[test]
    fn legacy_record_without_buttons_gets_default_button() {
        let mut record = PopupConfig::new_record("Old");
        record.custom_buttons.clear();
        record.legacy.heading = String::new();
        let section = section_from_legacy(&record);
        assert_eq!(section.content.heading, DEFAULT_HEADING);
        assert_eq!(section.content.custom_buttons, vec![Button::section_default()]);
        assert_eq!(section.design, DesignOverrides::seeded());
    }

    #[test]
    fn email_capture_section_becomes_universal_with_submit_button() {
        let value = serde_json::json!({
            "id": 11,
            "type": "email_capture",
            "title": "Capture",
            "order": 0,
            "content": {
                "heading": "Join",
                "description": "Get deals",
                "emailPlaceholder": "you@example.com",
                "primaryButton": "Subscribe",
                "secondaryButton": "No thanks"
            }
        });
        let section = section_from_stored(value).expect("decode");
        assert_eq!(section.kind, SectionKind::Universal);
        assert!(section.content.enable_email_capture);
        assert_eq!(section.content.email_placeholder, "you@example.com");
        let buttons = &section.content.custom_buttons;
        assert_eq!(buttons.len(), 2);
        assert_eq!((buttons[0].action, buttons[0].style), (ButtonAction::Submit, ButtonStyleKind::Filled));
        assert_eq!(buttons[0].text, "Subscribe");
        assert_eq!((buttons[1].action, buttons[1].style), (ButtonAction::Navigate, ButtonStyleKind::Plain));
    }

    #[test]
    fn intro_section_button_text_becomes_navigate() {
        let value = serde_json::json!({
            "id": 12,
            "type": "intro",
            "title": "Welcome",
            "content": { "heading": "Hi", "description": "", "buttonText": "Next" }
        });
        let section = section_from_stored(value).expect("decode");
        assert!(!section.content.enable_email_capture);
        assert_eq!(section.content.custom_buttons.len(), 1);
        assert_eq!(section.content.custom_buttons[0].text, "Next");
        assert_eq!(section.content.custom_buttons[0].action, ButtonAction::Navigate);
    }

    #[test]
    fn untyped_section_is_universal() {
        let value = serde_json::json!({ "id": 3, "title": "Plain", "content": { "heading": "H" } });
        let section = section_from_stored(value).expect("decode");
        assert_eq!(section.kind, SectionKind::Universal);
        assert_eq!(section.content.heading, "H");
    }

    #[test]
    fn canonicalize_renumbers_orders() {
        let mut record = PopupConfig::new_record("Gappy");
        record.sections = vec![
            Section::blank(SectionId(1), 4),
            Section::blank(SectionId(2), 9),
        ];
        let draft = canonicalize(record);
        let orders: Vec<usize> = draft.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }
}
