use super::*;
use crate::button::ButtonAction;
use crate::normalize::canonicalize;
use crate::resolver::{editor_button_style, resolve_design};

fn editor() -> Editor {
    Editor::new(canonicalize(PopupConfig::new_record("Spring Sale")))
}

fn editor_with_three_sections() -> (Editor, [SectionId; 3]) {
    let mut editor = editor();
    let s1 = editor.draft().sections[0].id;
    let s2 = editor.add_section();
    let s3 = editor.add_section();
    (editor, [s1, s2, s3])
}

fn ids(editor: &Editor) -> Vec<SectionId> {
    editor.draft().sections.iter().map(|s| s.id).collect()
}

fn orders(editor: &Editor) -> Vec<usize> {
    editor.draft().sections.iter().map(|s| s.order).collect()
}

// ----------------------------------------------------------------------------
// Sections
// ----------------------------------------------------------------------------

#[test]
fn add_section_appends_seeded_section() {
    let mut editor = editor();
    let id = editor.add_section();
    let draft = editor.draft();
    assert_eq!(draft.sections.len(), 2);
    let added = &draft.sections[1];
    assert_eq!(added.id, id);
    assert_eq!(added.title, "Section 2");
    assert_eq!(added.content.custom_buttons, vec![Button::section_default()]);
    assert_eq!(added.design, DesignOverrides::seeded());
    assert_eq!(orders(&editor), vec![0, 1]);
}

#[test]
fn added_section_ids_are_unique() {
    let mut editor = editor();
    let a = editor.add_section();
    let b = editor.add_section();
    let c = editor.add_section();
    assert!(a != b && b != c && a != c);
}

#[test]
fn removing_the_only_section_is_rejected() {
    let mut editor = editor();
    let only = editor.draft().sections[0].id;
    let before = editor.draft().clone();

    let err = editor.remove_section(only).unwrap_err();
    assert!(matches!(err, EditorError::LastSection));
    assert_eq!(editor.draft(), &before);
}

#[test]
fn remove_section_renumbers() {
    let (mut editor, [s1, s2, s3]) = editor_with_three_sections();
    editor.remove_section(s2).expect("removed");
    assert_eq!(ids(&editor), vec![s1, s3]);
    assert_eq!(orders(&editor), vec![0, 1]);
}

#[test]
fn move_section_up_swaps_with_previous() {
    let (mut editor, [s1, s2, s3]) = editor_with_three_sections();
    editor.move_section(s2, Direction::Up).expect("moved");
    assert_eq!(ids(&editor), vec![s2, s1, s3]);
    assert_eq!(orders(&editor), vec![0, 1, 2]);
}

#[test]
fn moves_past_either_end_are_no_ops() {
    let (mut editor, [s1, _, s3]) = editor_with_three_sections();
    let before = editor.draft().clone();
    editor.move_section(s1, Direction::Up).expect("no-op");
    editor.move_section(s3, Direction::Down).expect("no-op");
    assert_eq!(editor.draft(), &before);
}

#[test]
fn order_stays_dense_through_a_mixed_sequence() {
    let (mut editor, [s1, s2, _]) = editor_with_three_sections();
    let s4 = editor.add_section();
    editor.move_section(s4, Direction::Up).expect("move");
    editor.remove_section(s1).expect("remove");
    editor.move_section(s2, Direction::Down).expect("move");
    let n = editor.draft().sections.len();
    assert_eq!(orders(&editor), (0..n).collect::<Vec<_>>());
}

#[test]
fn unknown_section_is_reported() {
    let mut editor = editor();
    let err = editor
        .update_section_title(SectionId(42), "Nope")
        .unwrap_err();
    assert!(matches!(err, EditorError::UnknownSection(SectionId(42))));
}

#[test]
fn section_title_and_content_updates_are_scoped() {
    let (mut editor, [s1, s2, _]) = editor_with_three_sections();
    editor.update_section_title(s2, "Offer").expect("title");
    editor
        .update_section_content(
            s2,
            &ContentPatch {
                enable_email_capture: Some(true),
                ..ContentPatch::default()
            },
        )
        .expect("content");

    let draft = editor.draft();
    let second = draft.section(s2).expect("s2");
    assert_eq!(second.title, "Offer");
    assert!(second.content.enable_email_capture);
    assert_eq!(draft.section(s1).expect("s1").title, "Email Capture");
}

// ----------------------------------------------------------------------------
// Section buttons
// ----------------------------------------------------------------------------

#[test]
fn add_section_button_uses_current_custom_colors() {
    let mut editor = editor();
    let section = editor.draft().sections[0].id;
    editor
        .update_design(
            None,
            &DesignOverrides {
                custom_btn_bg: Some("#ABABAB".to_string()),
                ..DesignOverrides::default()
            },
        )
        .expect("design");

    let button_id = editor.add_section_button(section).expect("added");
    let button = editor.draft().sections[0]
        .content
        .button(&button_id)
        .expect("button")
        .clone();
    assert_eq!(button.text, "New Button");
    assert_eq!(button.action, ButtonAction::Link);
    assert_eq!(button.url, "");
    let style = button.button_style.expect("seeded style");
    assert_eq!(style.background_color.as_deref(), Some("#ABABAB"));
    assert_eq!(style.style, Some(ButtonStyleKind::Outline));
}

#[test]
fn update_and_remove_section_button() {
    let mut editor = editor();
    let section = editor.draft().sections[0].id;
    let button_id = editor.add_section_button(section).expect("added");

    editor
        .update_section_button(
            section,
            &button_id,
            &ButtonPatch {
                text: Some("Shop now".to_string()),
                url: Some("https://shop.example.com".to_string()),
                ..ButtonPatch::default()
            },
        )
        .expect("update");
    let button = editor.draft().sections[0].content.button(&button_id).expect("button");
    assert_eq!(button.text, "Shop now");

    editor.remove_section_button(section, &button_id).expect("remove");
    editor
        .remove_section_button(section, &ButtonId::default_id())
        .expect("last button may go");
    assert!(editor.draft().sections[0].content.custom_buttons.is_empty());

    let err = editor.remove_section_button(section, &button_id).unwrap_err();
    assert!(matches!(err, EditorError::UnknownButton(_)));
}

// ----------------------------------------------------------------------------
// Button styles
// ----------------------------------------------------------------------------

#[test]
fn primary_style_without_selection_dual_writes_globals() {
    let mut editor = editor();
    editor
        .update_button_style(None, &ButtonKey::Primary, ButtonStyleField::BackgroundColor, "#FF00FF")
        .expect("style");

    let draft = editor.draft();
    assert_eq!(draft.design.primary_btn_bg, "#FF00FF");
    let stored = draft.sections[0]
        .content
        .primary_button_style
        .as_ref()
        .expect("seeded");
    assert_eq!(stored.background_color.as_deref(), Some("#FF00FF"));
    assert_eq!(stored.text_color.as_deref(), Some("#FFFFFF"));
    assert_eq!(stored.style, Some(ButtonStyleKind::Filled));
    assert_eq!(
        editor_button_style(draft, None, &ButtonKey::Primary).background_color,
        "#FF00FF"
    );
}

#[test]
fn selected_section_style_does_not_touch_globals() {
    let (mut editor, [_, s2, _]) = editor_with_three_sections();
    let globals = editor.draft().design.clone();
    let key = ButtonKey::Custom(ButtonId::default_id());

    editor
        .update_button_style(Some(s2), &key, ButtonStyleField::TextColor, "#010203")
        .expect("style");

    assert_eq!(editor.draft().design, globals);
    let style = editor_button_style(editor.draft(), Some(s2), &key);
    assert_eq!(style.text_color, "#010203");
    assert_eq!(style.background_color, "#E5E5E5");
    assert_eq!(style.style, ButtonStyleKind::Outline);
}

#[test]
fn custom_style_without_selection_targets_first_section() {
    let mut editor = editor();
    let key = ButtonKey::Custom(ButtonId::default_id());
    editor
        .update_button_style(None, &key, ButtonStyleField::BackgroundColor, "#0000FF")
        .expect("style");
    editor
        .update_button_style(None, &key, ButtonStyleField::Style, "plain")
        .expect("style");

    let draft = editor.draft();
    assert_eq!(draft.design.custom_btn_bg, "#0000FF");
    let button = &draft.sections[0].content.custom_buttons[0];
    let style = button.button_style.as_ref().expect("style");
    assert_eq!(style.background_color.as_deref(), Some("#0000FF"));
    assert_eq!(style.style, Some(ButtonStyleKind::Plain));
}

#[test]
fn invalid_style_value_leaves_draft_alone() {
    let mut editor = editor();
    let before = editor.draft().clone();
    let err = editor
        .update_button_style(None, &ButtonKey::Primary, ButtonStyleField::Style, "dotted")
        .unwrap_err();
    assert!(matches!(err, EditorError::InvalidStyleValue(ref v) if v == "dotted"));
    assert_eq!(editor.draft(), &before);
}

#[test]
fn unknown_custom_button_is_reported() {
    let mut editor = editor();
    let err = editor
        .update_button_style(
            None,
            &ButtonKey::Custom(ButtonId::Number(9)),
            ButtonStyleField::TextColor,
            "#000000",
        )
        .unwrap_err();
    assert!(matches!(err, EditorError::UnknownButton(_)));
}

// ----------------------------------------------------------------------------
// Design routing
// ----------------------------------------------------------------------------

#[test]
fn single_step_design_edit_updates_globals_and_first_section() {
    let mut editor = editor();
    let patch = DesignOverrides {
        popup_background: Some("#112233".to_string()),
        ..DesignOverrides::default()
    };
    editor.update_design(None, &patch).expect("design");

    let draft = editor.draft();
    assert_eq!(draft.design.popup_background, "#112233");
    assert_eq!(draft.sections[0].design.popup_background.as_deref(), Some("#112233"));
    assert_eq!(resolve_design(draft, None).popup_background, "#112233");
}

#[test]
fn multi_step_design_edit_leaves_sections_alone() {
    let (mut editor, [s1, _, _]) = editor_with_three_sections();
    editor.set_multi_step(true);
    let before = editor.draft().section(s1).expect("s1").design.clone();

    editor
        .update_design(
            None,
            &DesignOverrides {
                text_heading: Some("#333333".to_string()),
                ..DesignOverrides::default()
            },
        )
        .expect("design");

    assert_eq!(editor.draft().design.text_heading, "#333333");
    assert_eq!(editor.draft().section(s1).expect("s1").design, before);
}

#[test]
fn selected_design_edit_targets_section_only() {
    let (mut editor, [_, s2, _]) = editor_with_three_sections();
    let globals = editor.draft().design.clone();
    editor
        .update_design(
            Some(s2),
            &DesignOverrides {
                corner_radius: Some(crate::CornerRadius::Square),
                ..DesignOverrides::default()
            },
        )
        .expect("design");
    assert_eq!(editor.draft().design, globals);
    assert_eq!(
        resolve_design(editor.draft(), Some(s2)).corner_radius,
        crate::CornerRadius::Square
    );
}

#[test]
fn uploaded_asset_is_applied_and_removed() {
    let mut editor = editor();
    editor
        .apply_uploaded_asset(None, UploadKind::Logo, "data:image/png;base64,AAAA")
        .expect("apply");
    assert_eq!(editor.draft().design.logo_url, "data:image/png;base64,AAAA");

    editor.remove_asset(None, UploadKind::Logo).expect("remove");
    assert_eq!(editor.draft().design.logo_url, "");
    assert_eq!(editor.draft().sections[0].design.logo_url.as_deref(), Some(""));
}

// ----------------------------------------------------------------------------
// Legacy buttons and commands
// ----------------------------------------------------------------------------

#[test]
fn legacy_button_list_crud() {
    let mut editor = editor();
    let id = editor.add_legacy_button();
    assert_eq!(editor.draft().custom_buttons.len(), 2);
    editor
        .update_legacy_button(
            &id,
            &ButtonPatch {
                action: Some(ButtonAction::ClosePopup),
                ..ButtonPatch::default()
            },
        )
        .expect("update");
    assert_eq!(editor.draft().custom_buttons[1].action, ButtonAction::ClosePopup);
    editor.remove_legacy_button(&id).expect("remove");
    assert_eq!(editor.draft().custom_buttons.len(), 1);
    assert!(editor.remove_legacy_button(&id).is_err());
}

#[test]
fn commands_deserialize_from_json() {
    let raw = r##"[
        {"op":"add_section"},
        {"op":"set_multi_step","enabled":true},
        {"op":"update_button_style","buttonKey":"primary","field":"textColor","value":"#EEEEEE"},
        {"op":"update_design","patch":{"alignment":"left"}}
    ]"##;
    let commands: Vec<EditCommand> = serde_json::from_str(raw).expect("commands");
    let mut editor = editor();
    editor.apply_all(commands).expect("applied");
    let draft = editor.draft();
    assert_eq!(draft.sections.len(), 2);
    assert!(draft.is_multi_step);
    assert_eq!(draft.design.primary_btn_text, "#EEEEEE");
    assert_eq!(draft.design.alignment, crate::Alignment::Left);
}

#[test]
fn failing_batch_restores_draft() {
    let mut editor = editor();
    let only = editor.draft().sections[0].id;
    let before = editor.draft().clone();
    let result = editor.apply_all(vec![
        EditCommand::SetName {
            name: "Renamed".to_string(),
        },
        EditCommand::RemoveSection { section_id: only },
    ]);
    assert!(matches!(result, Err((1, EditorError::LastSection))));
    assert_eq!(editor.draft(), &before);
}

#[test]
fn stored_numeric_string_button_id_is_addressable_by_key() {
    let raw = r#"[{"id":5,"type":"universal","title":"Stored","order":1,"content":{"customButtons":[{"id":"123","text":"Shop","action":"link"}]}}]"#;
    let mut popup = PopupConfig::new_record("Stored ids");
    popup.sections = crate::codec::decode_sections(Some(raw));
    let mut editor = Editor::new(canonicalize(popup));
    let key: ButtonKey = "custom-123".parse().expect("key");

    editor
        .update_button_style(Some(SectionId(5)), &key, ButtonStyleField::TextColor, "#ABCDEF")
        .expect("stored button should be found");

    let style = editor_button_style(editor.draft(), Some(SectionId(5)), &key);
    assert_eq!(style.text_color, "#ABCDEF");
}
