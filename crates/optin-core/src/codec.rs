//! Text-blob encoding for the `sections` and `customButtons` columns.
//!
//! Decoding never fails: malformed input degrades to an empty list (or skips
//! the offending element) and is reported through `tracing`.

use serde_json::Value;

use crate::button::Button;
use crate::normalize::section_from_stored;
use crate::section::Section;

/// Encode sections for storage.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if serialization fails.
pub fn encode_sections(sections: &[Section]) -> Result<String, serde_json::Error> {
    serde_json::to_string(sections)
}

/// Encode a button list for storage.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if serialization fails.
pub fn encode_buttons(buttons: &[Button]) -> Result<String, serde_json::Error> {
    serde_json::to_string(buttons)
}

/// Decode a stored `sections` blob, folding legacy section types into the
/// canonical shape.
#[must_use]
pub fn decode_sections(raw: Option<&str>) -> Vec<Section> {
    decode_array(raw, "sections")
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match section_from_stored(value) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!(field = "sections", index, error = %e, "dropping undecodable section");
                None
            }
        })
        .collect()
}

/// Decode a stored `customButtons` blob.
#[must_use]
pub fn decode_buttons(raw: Option<&str>) -> Vec<Button> {
    decode_array(raw, "customButtons")
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Button>(value) {
            Ok(button) => Some(button),
            Err(e) => {
                tracing::warn!(field = "customButtons", index, error = %e, "dropping undecodable button");
                None
            }
        })
        .collect()
}

fn decode_array(raw: Option<&str>, field: &'static str) -> Vec<Value> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => Vec::new(),
        Ok(other) => {
            tracing::warn!(field, kind = json_kind(&other), "stored blob is not an array");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(field, error = %e, "failed to parse stored blob");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonAction, ButtonId, ButtonStyleKind, ButtonStyleOverride};
    use crate::section::SectionId;

    #[test]
    fn sections_survive_encode_decode() {
        let mut first = Section::blank(SectionId(1_700_000_000_001), 1);
        first.content.primary_button_style = Some(ButtonStyleOverride {
            background_color: Some("#123456".to_string()),
            text_color: None,
            style: Some(ButtonStyleKind::Plain),
        });
        first.design.popup_background = Some("#112233".to_string());
        let mut second = Section::blank(SectionId(1_700_000_000_002), 2);
        second.design = crate::DesignOverrides::default();
        second.content.custom_buttons.push(Button {
            url: "https://shop.example.com/collections/all".to_string(),
            ..Button::new_link(1_700_000_000_003)
        });
        let sections = vec![first, second];

        let encoded = encode_sections(&sections).expect("encode");
        assert_eq!(decode_sections(Some(&encoded)), sections);
    }

    #[test]
    fn malformed_sections_decode_to_empty() {
        assert!(decode_sections(Some("{not json")).is_empty());
        assert!(decode_sections(Some(r#"{"id":1}"#)).is_empty());
        assert!(decode_sections(Some("")).is_empty());
        assert!(decode_sections(None).is_empty());
        assert!(decode_sections(Some("null")).is_empty());
    }

    #[test]
    fn one_bad_section_does_not_drop_the_rest() {
        let raw = r#"[{"id":"not-a-number","type":"universal"},{"id":5,"type":"universal","title":"Ok","order":1}]"#;
        let sections = decode_sections(Some(raw));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, SectionId(5));
    }

    #[test]
    fn section_with_actionless_button_is_kept() {
        let raw = r#"[{"id":5,"type":"universal","title":"keep me","content":{"heading":"H","customButtons":[{"id":1,"text":"x"}]}}]"#;
        let sections = decode_sections(Some(raw));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "keep me");
        assert_eq!(sections[0].content.custom_buttons[0].action, ButtonAction::Custom);
    }

    #[test]
    fn buttons_decode_with_legacy_actions() {
        let raw = r#"[{"id":"default","text":"Join Now","action":"close","style":"outline"},{"id":17,"text":"Shop","action":"link","url":"/collections/all","style":"filled"}]"#;
        let buttons = decode_buttons(Some(raw));
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].action, ButtonAction::ClosePopup);
        assert_eq!(buttons[1].id, ButtonId::Number(17));
        assert_eq!(buttons[1].url, "/collections/all");
    }

    #[test]
    fn malformed_buttons_decode_to_empty() {
        assert!(decode_buttons(Some("[[[")).is_empty());
        assert!(decode_buttons(Some("\"oops\"")).is_empty());
    }
}
