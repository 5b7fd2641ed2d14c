//! Editor form controller: every mutation the editing UI can make to a draft.
//!
//! Operations act on one owned draft. A rejected operation returns an error
//! and leaves the draft exactly as it was.

use serde::{Deserialize, Serialize};

use crate::button::{
    Button, ButtonId, ButtonKey, ButtonPatch, ButtonStyleField, ButtonStyleKind,
    ButtonStyleOverride,
};
use crate::design::{
    DesignOverrides, DEFAULT_CUSTOM_BTN_BG, DEFAULT_CUSTOM_BTN_TEXT, DEFAULT_PRIMARY_BTN_BG,
    DEFAULT_PRIMARY_BTN_TEXT,
};
use crate::ids::IdGenerator;
use crate::popup::{DiscountSettings, PopupConfig};
use crate::section::{renumber, ContentPatch, Section, SectionId};
use crate::upload::UploadKind;
use crate::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A single editor action, as submitted to the draft-apply endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditCommand {
    AddSection,
    RemoveSection {
        section_id: SectionId,
    },
    MoveSection {
        section_id: SectionId,
        direction: Direction,
    },
    UpdateSectionTitle {
        section_id: SectionId,
        title: String,
    },
    UpdateSectionContent {
        section_id: SectionId,
        patch: ContentPatch,
    },
    UpdateSectionDesign {
        section_id: SectionId,
        patch: DesignOverrides,
    },
    AddSectionButton {
        section_id: SectionId,
    },
    UpdateSectionButton {
        section_id: SectionId,
        button_id: ButtonId,
        patch: ButtonPatch,
    },
    RemoveSectionButton {
        section_id: SectionId,
        button_id: ButtonId,
    },
    UpdateButtonStyle {
        #[serde(default)]
        selected_section: Option<SectionId>,
        button_key: ButtonKey,
        field: ButtonStyleField,
        value: String,
    },
    UpdateDesign {
        #[serde(default)]
        selected_section: Option<SectionId>,
        patch: DesignOverrides,
    },
    SetMultiStep {
        enabled: bool,
    },
    SetName {
        name: String,
    },
    SetFooterText {
        text: String,
    },
    SetDiscount {
        discount: DiscountSettings,
    },
    AddLegacyButton,
    UpdateLegacyButton {
        button_id: ButtonId,
        patch: ButtonPatch,
    },
    RemoveLegacyButton {
        button_id: ButtonId,
    },
    ApplyAsset {
        #[serde(default)]
        selected_section: Option<SectionId>,
        kind: UploadKind,
        url: String,
    },
    RemoveAsset {
        #[serde(default)]
        selected_section: Option<SectionId>,
        kind: UploadKind,
    },
}

#[derive(Debug, Clone)]
pub struct Editor {
    draft: PopupConfig,
    ids: IdGenerator,
}

impl Editor {
    #[must_use]
    pub fn new(draft: PopupConfig) -> Self {
        let ids = IdGenerator::for_popup(&draft);
        Self { draft, ids }
    }

    #[must_use]
    pub fn draft(&self) -> &PopupConfig {
        &self.draft
    }

    #[must_use]
    pub fn into_draft(self) -> PopupConfig {
        self.draft
    }

    fn section_mut(&mut self, id: SectionId) -> Result<&mut Section, EditorError> {
        self.draft
            .section_mut(id)
            .ok_or(EditorError::UnknownSection(id))
    }

    // ------------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------------

    /// Append a blank section and return its id.
    pub fn add_section(&mut self) -> SectionId {
        let id = SectionId(self.ids.next_id());
        let number = self.draft.sections.len() + 1;
        self.draft.sections.push(Section::blank(id, number));
        renumber(&mut self.draft.sections);
        id
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft,
    /// [`EditorError::LastSection`] if it is the only section.
    pub fn remove_section(&mut self, id: SectionId) -> Result<(), EditorError> {
        let index = self
            .draft
            .section_index(id)
            .ok_or(EditorError::UnknownSection(id))?;
        if self.draft.sections.len() <= 1 {
            return Err(EditorError::LastSection);
        }
        self.draft.sections.remove(index);
        renumber(&mut self.draft.sections);
        Ok(())
    }

    /// Swap a section with its neighbour. Moving past either end is a no-op.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft.
    pub fn move_section(&mut self, id: SectionId, direction: Direction) -> Result<(), EditorError> {
        let index = self
            .draft
            .section_index(id)
            .ok_or(EditorError::UnknownSection(id))?;
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&t| t < self.draft.sections.len()),
        };
        if let Some(target) = target {
            self.draft.sections.swap(index, target);
            renumber(&mut self.draft.sections);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft.
    pub fn update_section_title(&mut self, id: SectionId, title: &str) -> Result<(), EditorError> {
        self.section_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft.
    pub fn update_section_content(&mut self, id: SectionId, patch: &ContentPatch) -> Result<(), EditorError> {
        patch.apply_to(&mut self.section_mut(id)?.content);
        Ok(())
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft.
    pub fn update_section_design(&mut self, id: SectionId, patch: &DesignOverrides) -> Result<(), EditorError> {
        self.section_mut(id)?.design.merge(patch);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Section buttons
    // ------------------------------------------------------------------------

    /// Append a blank link button to a section, pre-styled with the popup's
    /// current custom-button colors.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `id` is not in the draft.
    pub fn add_section_button(&mut self, id: SectionId) -> Result<ButtonId, EditorError> {
        if self.draft.section(id).is_none() {
            return Err(EditorError::UnknownSection(id));
        }
        let mut button = Button::new_link(self.ids.next_id());
        button.button_style = Some(ButtonStyleOverride {
            background_color: Some(self.draft.design.custom_btn_bg.clone()),
            text_color: Some(self.draft.design.custom_btn_text.clone()),
            style: Some(ButtonStyleKind::Outline),
        });
        let button_id = button.id.clone();
        self.section_mut(id)?.content.custom_buttons.push(button);
        Ok(button_id)
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] or [`EditorError::UnknownButton`].
    pub fn update_section_button(
        &mut self,
        id: SectionId,
        button_id: &ButtonId,
        patch: &ButtonPatch,
    ) -> Result<(), EditorError> {
        let section = self.section_mut(id)?;
        let button = section
            .content
            .button_mut(button_id)
            .ok_or_else(|| EditorError::UnknownButton(button_id.to_string()))?;
        button.apply(patch);
        Ok(())
    }

    /// Removing a section's last button is allowed.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] or [`EditorError::UnknownButton`].
    pub fn remove_section_button(&mut self, id: SectionId, button_id: &ButtonId) -> Result<(), EditorError> {
        let buttons = &mut self.section_mut(id)?.content.custom_buttons;
        let index = buttons
            .iter()
            .position(|b| &b.id == button_id)
            .ok_or_else(|| EditorError::UnknownButton(button_id.to_string()))?;
        buttons.remove(index);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Design
    // ------------------------------------------------------------------------

    /// Write one style field of a button.
    ///
    /// The override lands on the selected section, or on `sections[0]` when
    /// nothing is selected. A first write seeds the override with the class
    /// defaults so later reads never fall through to a half-populated object.
    ///
    /// Side effect: with no section selected, color writes are mirrored into
    /// the popup's global `primaryBtn*` / `customBtn*` fields so records read
    /// by older single-step renderers stay in sync.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`], [`EditorError::UnknownButton`], or
    /// [`EditorError::InvalidStyleValue`] for a `style` value other than
    /// `filled`, `outline` or `plain`.
    pub fn update_button_style(
        &mut self,
        selected: Option<SectionId>,
        key: &ButtonKey,
        field: ButtonStyleField,
        value: &str,
    ) -> Result<(), EditorError> {
        let style_value = match field {
            ButtonStyleField::Style => Some(parse_style_kind(value)?),
            _ => None,
        };

        let section = match selected {
            Some(id) => self.section_mut(id)?,
            None => self
                .draft
                .sections
                .first_mut()
                .ok_or(EditorError::NoSections)?,
        };

        let (slot, seed) = match key {
            ButtonKey::Primary => (
                &mut section.content.primary_button_style,
                (DEFAULT_PRIMARY_BTN_BG, DEFAULT_PRIMARY_BTN_TEXT, ButtonStyleKind::Filled),
            ),
            ButtonKey::Custom(button_id) => {
                let button = section
                    .content
                    .button_mut(button_id)
                    .ok_or_else(|| EditorError::UnknownButton(button_id.to_string()))?;
                (
                    &mut button.button_style,
                    (DEFAULT_CUSTOM_BTN_BG, DEFAULT_CUSTOM_BTN_TEXT, ButtonStyleKind::Outline),
                )
            }
        };

        let mut style = ButtonStyleOverride {
            background_color: Some(seed.0.to_string()),
            text_color: Some(seed.1.to_string()),
            style: Some(seed.2),
        };
        if let Some(existing) = slot.as_ref() {
            if existing.background_color.is_some() {
                style.background_color.clone_from(&existing.background_color);
            }
            if existing.text_color.is_some() {
                style.text_color.clone_from(&existing.text_color);
            }
            if existing.style.is_some() {
                style.style = existing.style;
            }
        }
        match field {
            ButtonStyleField::BackgroundColor => style.background_color = Some(value.to_string()),
            ButtonStyleField::TextColor => style.text_color = Some(value.to_string()),
            ButtonStyleField::Style => style.style = style_value,
        }
        *slot = Some(style);

        if selected.is_none() {
            let design = &mut self.draft.design;
            match (key, field) {
                (ButtonKey::Primary, ButtonStyleField::BackgroundColor) => design.primary_btn_bg = value.to_string(),
                (ButtonKey::Primary, ButtonStyleField::TextColor) => design.primary_btn_text = value.to_string(),
                (ButtonKey::Custom(_), ButtonStyleField::BackgroundColor) => design.custom_btn_bg = value.to_string(),
                (ButtonKey::Custom(_), ButtonStyleField::TextColor) => design.custom_btn_text = value.to_string(),
                (_, ButtonStyleField::Style) => {}
            }
        }
        Ok(())
    }

    /// Route a design patch from the design tab.
    ///
    /// With a section selected the patch becomes that section's overrides.
    /// Without one it updates the globals, and single-step popups also copy it
    /// onto the first section so the projected design follows the edit.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `selected` is not in the draft.
    pub fn update_design(&mut self, selected: Option<SectionId>, patch: &DesignOverrides) -> Result<(), EditorError> {
        if let Some(id) = selected {
            return self.update_section_design(id, patch);
        }
        patch.apply_to(&mut self.draft.design);
        if !self.draft.is_multi_step {
            if let Some(first) = self.draft.sections.first_mut() {
                first.design.merge(patch);
            }
        }
        Ok(())
    }

    /// Put an uploaded asset's url into the logo or image slot.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `selected` is not in the draft.
    pub fn apply_uploaded_asset(
        &mut self,
        selected: Option<SectionId>,
        kind: UploadKind,
        url: &str,
    ) -> Result<(), EditorError> {
        let patch = match kind {
            UploadKind::Logo => DesignOverrides {
                logo_url: Some(url.to_string()),
                ..DesignOverrides::default()
            },
            UploadKind::Image => DesignOverrides {
                image_url: Some(url.to_string()),
                ..DesignOverrides::default()
            },
        };
        self.update_design(selected, &patch)
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownSection`] if `selected` is not in the draft.
    pub fn remove_asset(&mut self, selected: Option<SectionId>, kind: UploadKind) -> Result<(), EditorError> {
        self.apply_uploaded_asset(selected, kind, "")
    }

    // ------------------------------------------------------------------------
    // Popup-level fields
    // ------------------------------------------------------------------------

    pub fn set_multi_step(&mut self, enabled: bool) {
        self.draft.is_multi_step = enabled;
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = name.to_string();
    }

    pub fn set_footer_text(&mut self, text: &str) {
        self.draft.footer_text = text.to_string();
    }

    pub fn set_discount(&mut self, discount: DiscountSettings) {
        self.draft.discount = discount;
    }

    pub fn add_legacy_button(&mut self) -> ButtonId {
        let button = Button::new_link(self.ids.next_id());
        let id = button.id.clone();
        self.draft.custom_buttons.push(button);
        id
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownButton`] if no top-level button has `button_id`.
    pub fn update_legacy_button(&mut self, button_id: &ButtonId, patch: &ButtonPatch) -> Result<(), EditorError> {
        let button = self
            .draft
            .custom_buttons
            .iter_mut()
            .find(|b| &b.id == button_id)
            .ok_or_else(|| EditorError::UnknownButton(button_id.to_string()))?;
        button.apply(patch);
        Ok(())
    }

    /// # Errors
    ///
    /// [`EditorError::UnknownButton`] if no top-level button has `button_id`.
    pub fn remove_legacy_button(&mut self, button_id: &ButtonId) -> Result<(), EditorError> {
        let before = self.draft.custom_buttons.len();
        self.draft.custom_buttons.retain(|b| &b.id != button_id);
        if self.draft.custom_buttons.len() == before {
            return Err(EditorError::UnknownButton(button_id.to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns.
    pub fn apply(&mut self, command: EditCommand) -> Result<(), EditorError> {
        match command {
            EditCommand::AddSection => {
                self.add_section();
            }
            EditCommand::RemoveSection { section_id } => self.remove_section(section_id)?,
            EditCommand::MoveSection { section_id, direction } => self.move_section(section_id, direction)?,
            EditCommand::UpdateSectionTitle { section_id, title } => {
                self.update_section_title(section_id, &title)?;
            }
            EditCommand::UpdateSectionContent { section_id, patch } => {
                self.update_section_content(section_id, &patch)?;
            }
            EditCommand::UpdateSectionDesign { section_id, patch } => {
                self.update_section_design(section_id, &patch)?;
            }
            EditCommand::AddSectionButton { section_id } => {
                self.add_section_button(section_id)?;
            }
            EditCommand::UpdateSectionButton {
                section_id,
                button_id,
                patch,
            } => self.update_section_button(section_id, &button_id, &patch)?,
            EditCommand::RemoveSectionButton { section_id, button_id } => {
                self.remove_section_button(section_id, &button_id)?;
            }
            EditCommand::UpdateButtonStyle {
                selected_section,
                button_key,
                field,
                value,
            } => self.update_button_style(selected_section, &button_key, field, &value)?,
            EditCommand::UpdateDesign { selected_section, patch } => {
                self.update_design(selected_section, &patch)?;
            }
            EditCommand::SetMultiStep { enabled } => self.set_multi_step(enabled),
            EditCommand::SetName { name } => self.set_name(&name),
            EditCommand::SetFooterText { text } => self.set_footer_text(&text),
            EditCommand::SetDiscount { discount } => self.set_discount(discount),
            EditCommand::AddLegacyButton => {
                self.add_legacy_button();
            }
            EditCommand::UpdateLegacyButton { button_id, patch } => {
                self.update_legacy_button(&button_id, &patch)?;
            }
            EditCommand::RemoveLegacyButton { button_id } => self.remove_legacy_button(&button_id)?,
            EditCommand::ApplyAsset {
                selected_section,
                kind,
                url,
            } => self.apply_uploaded_asset(selected_section, kind, &url)?,
            EditCommand::RemoveAsset { selected_section, kind } => self.remove_asset(selected_section, kind)?,
        }
        Ok(())
    }

    /// Apply a batch in order. The batch is all-or-nothing: if any command
    /// fails the draft is restored and the failing command's index returned.
    ///
    /// # Errors
    ///
    /// `(index, error)` of the first failing command.
    pub fn apply_all(&mut self, commands: Vec<EditCommand>) -> Result<(), (usize, EditorError)> {
        let snapshot = self.clone();
        for (index, command) in commands.into_iter().enumerate() {
            if let Err(e) = self.apply(command) {
                *self = snapshot;
                return Err((index, e));
            }
        }
        Ok(())
    }
}

fn parse_style_kind(value: &str) -> Result<ButtonStyleKind, EditorError> {
    match value {
        "filled" => Ok(ButtonStyleKind::Filled),
        "outline" => Ok(ButtonStyleKind::Outline),
        "plain" => Ok(ButtonStyleKind::Plain),
        other => Err(EditorError::InvalidStyleValue(other.to_string())),
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
