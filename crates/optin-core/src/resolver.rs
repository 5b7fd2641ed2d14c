//! The single place design values are resolved.
//!
//! Fallback order for a design field: the selected section's override, then
//! the popup's global value. For a button style field: the button's own
//! override, then the class default (primary or custom) taken from the design
//! the caller resolves against.

use crate::button::{ButtonKey, ButtonStyleKind, ButtonStyleOverride, ResolvedButtonStyle};
use crate::design::DesignValues;
use crate::popup::PopupConfig;
use crate::section::{Section, SectionId};

/// The section the design tab is effectively editing.
///
/// An explicit selection wins. Without one, single-step popups project their
/// first section; multi-step popups edit the globals (returns `None`).
#[must_use]
pub fn design_target(popup: &PopupConfig, selected: Option<SectionId>) -> Option<&Section> {
    match selected {
        Some(id) => popup.section(id),
        None if !popup.is_multi_step => popup.sections.first(),
        None => None,
    }
}

/// Effective design for the editor's current selection.
#[must_use]
pub fn resolve_design(popup: &PopupConfig, selected: Option<SectionId>) -> DesignValues {
    design_target(popup, selected).map_or_else(
        || popup.design.clone(),
        |section| effective_design(popup, section),
    )
}

/// Global design with `section`'s overrides applied.
#[must_use]
pub fn effective_design(popup: &PopupConfig, section: &Section) -> DesignValues {
    popup.design.overlay(&section.design)
}

/// Class defaults for a button key, read from `design`.
#[must_use]
pub fn class_default(key: &ButtonKey, design: &DesignValues) -> ResolvedButtonStyle {
    match key {
        ButtonKey::Primary => ResolvedButtonStyle {
            background_color: design.primary_btn_bg.clone(),
            text_color: design.primary_btn_text.clone(),
            style: ButtonStyleKind::Filled,
        },
        ButtonKey::Custom(_) => ResolvedButtonStyle {
            background_color: design.custom_btn_bg.clone(),
            text_color: design.custom_btn_text.clone(),
            style: ButtonStyleKind::Outline,
        },
    }
}

/// Overlay a sparse button override on top of a resolved style. Empty strings
/// count as unset.
#[must_use]
pub fn overlay_button_style(
    base: ResolvedButtonStyle,
    overrides: Option<&ButtonStyleOverride>,
) -> ResolvedButtonStyle {
    let Some(o) = overrides else {
        return base;
    };
    let pick = |value: &Option<String>, fallback: String| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map_or(fallback, ToOwned::to_owned)
    };
    ResolvedButtonStyle {
        background_color: pick(&o.background_color, base.background_color),
        text_color: pick(&o.text_color, base.text_color),
        style: o.style.unwrap_or(base.style),
    }
}

/// The stored override for `key` within `section`, if any.
#[must_use]
pub fn button_override<'a>(section: &'a Section, key: &ButtonKey) -> Option<&'a ButtonStyleOverride> {
    match key {
        ButtonKey::Primary => section.content.primary_button_style.as_ref(),
        ButtonKey::Custom(id) => section
            .content
            .button(id)
            .and_then(|b| b.button_style.as_ref()),
    }
}

/// Resolve every style field of one button.
///
/// `defaults` supplies the class colors: the editor passes the popup's global
/// design, the preview passes the section's effective design. A missing
/// section or an unknown custom button id resolves to the class default.
#[must_use]
pub fn resolve_button_style(
    section: Option<&Section>,
    key: &ButtonKey,
    defaults: &DesignValues,
) -> ResolvedButtonStyle {
    let base = class_default(key, defaults);
    overlay_button_style(base, section.and_then(|s| button_override(s, key)))
}

/// Resolve a button's style the way the editor's design tab reads it:
/// against the selected section, or `sections[0]` when nothing is selected.
#[must_use]
pub fn editor_button_style(
    popup: &PopupConfig,
    selected: Option<SectionId>,
    key: &ButtonKey,
) -> ResolvedButtonStyle {
    let section = selected.map_or_else(|| popup.sections.first(), |id| popup.section(id));
    resolve_button_style(section, key, &popup.design)
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
