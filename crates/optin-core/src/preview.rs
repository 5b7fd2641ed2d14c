//! Preview renderer: a pure projection from a popup draft to a layout
//! description that a front end can paint without further style logic.

use serde::{Deserialize, Serialize};

use crate::button::{ButtonAction, ButtonKey, ButtonStyleKind};
use crate::design::{Alignment, DesignValues, DisplaySize, ImagePosition};
use crate::normalize::section_from_legacy;
use crate::popup::PopupConfig;
use crate::resolver::{effective_design, resolve_button_style};
use crate::section::{
    Section, SectionId, DEFAULT_DESCRIPTION, DEFAULT_EMAIL_PLACEHOLDER, DEFAULT_HEADING,
    DEFAULT_PHONE_PLACEHOLDER,
};

pub const HIDDEN_ON_MOBILE_NOTICE: &str = "Popup is hidden on mobile";
const SELECTED_BUTTON_BORDER: &str = "2px solid #0070f3";
const ON_IMAGE_TEXT: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    pub device: Device,
    /// Button currently selected in the design tab; drawn with a highlight.
    pub selected_button: Option<ButtonKey>,
}

/// Outer canvas the popup is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    pub min_height_px: u32,
}

/// CSS-order box spacing: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spacing {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Spacing {
    const fn all(px: u32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    const fn flush_top(px: u32) -> Self {
        Self {
            top: 0,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub color: String,
    pub font_size_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub url: String,
    pub placement: ImagePosition,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoBlock {
    pub url: String,
    pub max_width_percent: u32,
    pub max_height_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Email,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub kind: InputKind,
    pub placeholder: String,
    pub required: bool,
    pub color: String,
    pub font_size_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonLayout {
    pub key: ButtonKey,
    pub text: String,
    pub action: ButtonAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub style: ButtonStyleKind,
    pub background_color: String,
    pub text_color: String,
    pub border: Option<String>,
    pub underline: bool,
    pub selected: bool,
    pub font_size_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseButton {
    pub color: String,
    pub font_size_px: u32,
}

/// Editor-only step controls shown above a multi-step preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub label: String,
    pub current: usize,
    pub total: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupLayout {
    pub device: Device,
    pub frame: Frame,
    pub section_id: SectionId,
    pub step: usize,
    pub background_color: String,
    pub background_image: Option<String>,
    pub image: Option<ImageBlock>,
    pub corner_radius_px: u32,
    pub display_size: DisplaySize,
    pub max_width_px: Option<u32>,
    pub min_height_px: Option<u32>,
    pub alignment: Alignment,
    pub padding: Spacing,
    pub content_padding: Spacing,
    pub close_button: CloseButton,
    pub logo: Option<LogoBlock>,
    pub heading: TextBlock,
    pub description: TextBlock,
    pub inputs: Vec<InputField>,
    pub buttons: Vec<ButtonLayout>,
    pub footer: Option<TextBlock>,
    pub step_indicator: Option<StepIndicator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PreviewLayout {
    /// Mobile target with `hideOnMobile` set: nothing is drawn but the notice.
    Hidden { frame: Frame, message: String },
    Visible(Box<PopupLayout>),
}

impl PreviewLayout {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }

    #[must_use]
    pub fn as_visible(&self) -> Option<&PopupLayout> {
        match self {
            Self::Visible(layout) => Some(layout),
            Self::Hidden { .. } => None,
        }
    }
}

struct Metrics {
    heading: u32,
    description: u32,
    footer: u32,
    button: u32,
    input: u32,
    close: u32,
    close_color: &'static str,
}

const DESKTOP: Metrics = Metrics {
    heading: 24,
    description: 16,
    footer: 12,
    button: 16,
    input: 16,
    close: 20,
    close_color: "#666666",
};

const MOBILE: Metrics = Metrics {
    heading: 20,
    description: 14,
    footer: 10,
    button: 14,
    input: 14,
    close: 18,
    close_color: "#000000",
};

fn frame_for(device: Device) -> Frame {
    match device {
        Device::Desktop => Frame {
            width_px: None,
            height_px: None,
            min_height_px: 400,
        },
        Device::Mobile => Frame {
            width_px: Some(320),
            height_px: Some(568),
            min_height_px: 600,
        },
    }
}

/// Index of the section shown at `step`. Single-step popups always show the
/// first section; an out-of-range step falls back to the first.
#[must_use]
pub fn section_index_for_step(popup: &PopupConfig, step: usize) -> usize {
    if popup.is_multi_step && step < popup.sections.len() {
        step
    } else {
        0
    }
}

/// Render the section at `step` with its effective design.
#[must_use]
pub fn render(popup: &PopupConfig, step: usize, options: &PreviewOptions) -> PreviewLayout {
    let index = section_index_for_step(popup, step);
    let fallback;
    let section = if let Some(section) = popup.sections.get(index) {
        section
    } else {
        fallback = section_from_legacy(popup);
        &fallback
    };
    let design = effective_design(popup, section);
    render_with(popup, section, index, &design, options)
}

/// Render `section` against an already-resolved `design`.
#[must_use]
pub fn render_with(
    popup: &PopupConfig,
    section: &Section,
    step: usize,
    design: &DesignValues,
    options: &PreviewOptions,
) -> PreviewLayout {
    let frame = frame_for(options.device);
    let mobile = options.device == Device::Mobile;

    if mobile && design.hide_on_mobile {
        return PreviewLayout::Hidden {
            frame,
            message: HIDDEN_ON_MOBILE_NOTICE.to_string(),
        };
    }

    let metrics = if mobile { &MOBILE } else { &DESKTOP };
    let position = design.image_position;
    let has_image = !design.image_url.is_empty();
    let on_image = position == ImagePosition::Background && has_image;
    let text_color = |color: &str| {
        if on_image {
            ON_IMAGE_TEXT.to_string()
        } else {
            color.to_string()
        }
    };

    let padding = match (mobile, position) {
        (true, _) if design.background_on_mobile => Spacing::all(20),
        (_, p) if p.is_side() => Spacing::all(0),
        (true, ImagePosition::Top) => Spacing::flush_top(20),
        (false, ImagePosition::Top) => Spacing::flush_top(32),
        (true, _) => Spacing::all(20),
        (false, _) => Spacing::all(32),
    };

    let content_padding = match (mobile, position) {
        (false, p) if p.is_side() => Spacing::all(32),
        (false, ImagePosition::Top) => Spacing {
            top: 24,
            right: 32,
            bottom: 32,
            left: 32,
        },
        (true, ImagePosition::Top) => Spacing {
            top: 16,
            right: 20,
            bottom: 20,
            left: 20,
        },
        _ => Spacing::all(0),
    };

    let image = match (mobile, position) {
        _ if !has_image => None,
        (false, p) if p.is_side() => Some(ImageBlock {
            url: design.image_url.clone(),
            placement: p,
            width_px: Some(200),
            height_px: None,
        }),
        (false, ImagePosition::Top) => Some(ImageBlock {
            url: design.image_url.clone(),
            placement: ImagePosition::Top,
            width_px: None,
            height_px: Some(200),
        }),
        (true, ImagePosition::Top) => Some(ImageBlock {
            url: design.image_url.clone(),
            placement: ImagePosition::Top,
            width_px: None,
            height_px: Some(120),
        }),
        _ => None,
    };

    let logo = (!design.logo_url.is_empty()).then(|| LogoBlock {
        url: design.logo_url.clone(),
        max_width_percent: if mobile {
            design.logo_width.min(60)
        } else {
            design.logo_width
        },
        max_height_px: if mobile { 40 } else { 60 },
    });

    let content = &section.content;
    let heading = TextBlock {
        text: fallback_text(&content.heading, DEFAULT_HEADING),
        color: text_color(&design.text_heading),
        font_size_px: metrics.heading,
    };
    let description = TextBlock {
        text: fallback_text(&content.description, DEFAULT_DESCRIPTION),
        color: text_color(&design.text_description),
        font_size_px: metrics.description,
    };

    let mut inputs = Vec::new();
    if content.enable_email_capture {
        inputs.push(InputField {
            kind: InputKind::Email,
            placeholder: fallback_text(&content.email_placeholder, DEFAULT_EMAIL_PLACEHOLDER),
            required: true,
            color: design.text_input.clone(),
            font_size_px: metrics.input,
        });
    }
    if content.enable_phone_capture {
        inputs.push(InputField {
            kind: InputKind::Phone,
            placeholder: fallback_text(&content.phone_placeholder, DEFAULT_PHONE_PLACEHOLDER),
            required: content.phone_required,
            color: design.text_input.clone(),
            font_size_px: metrics.input,
        });
    }

    let buttons = content
        .custom_buttons
        .iter()
        .map(|button| {
            let key = ButtonKey::Custom(button.id.clone());
            let resolved = resolve_button_style(Some(section), &key, design);
            let selected = options.selected_button.as_ref() == Some(&key);
            let plain = resolved.style == ButtonStyleKind::Plain;
            let border = if selected {
                Some(SELECTED_BUTTON_BORDER.to_string())
            } else if resolved.style == ButtonStyleKind::Outline {
                Some(format!("1px solid {}", resolved.background_color))
            } else {
                None
            };
            ButtonLayout {
                key,
                text: button.text.clone(),
                action: button.action,
                url: (button.action == ButtonAction::Link).then(|| button.url.clone()),
                style: resolved.style,
                background_color: if plain {
                    "transparent".to_string()
                } else {
                    resolved.background_color
                },
                text_color: resolved.text_color,
                border,
                underline: plain,
                selected,
                font_size_px: metrics.button,
            }
        })
        .collect();

    let footer = (!content.footer_text.is_empty()).then(|| TextBlock {
        text: content.footer_text.clone(),
        color: text_color(&design.text_footer),
        font_size_px: metrics.footer,
    });

    let total = popup.sections.len();
    let step_indicator = (popup.is_multi_step && total > 1).then(|| StepIndicator {
        label: format!("Step {} of {}: {}", step + 1, total, section.title),
        current: step,
        total,
        can_go_previous: step > 0,
        can_go_next: step + 1 < total,
    });

    PreviewLayout::Visible(Box::new(PopupLayout {
        device: options.device,
        frame,
        section_id: section.id,
        step,
        background_color: design.popup_background.clone(),
        background_image: on_image.then(|| design.image_url.clone()),
        image,
        corner_radius_px: design.corner_radius.px(),
        display_size: design.display_size,
        max_width_px: (!mobile).then(|| design.display_size.max_width_px()),
        min_height_px: (!mobile && position.is_side()).then_some(400),
        alignment: design.alignment,
        padding,
        content_padding,
        close_button: CloseButton {
            color: if position == ImagePosition::Background {
                ON_IMAGE_TEXT.to_string()
            } else {
                metrics.close_color.to_string()
            },
            font_size_px: metrics.close,
        },
        logo,
        heading,
        description,
        inputs,
        buttons,
        footer,
        step_indicator,
    }))
}

fn fallback_text(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
