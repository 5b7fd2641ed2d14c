//! Popup editor domain: the popup record, legacy normalization, style
//! resolution, step navigation, preview layout and editor operations.
//!
//! Nothing in this crate performs I/O apart from reading the process
//! environment in [`load_app_config`].

pub mod app_config;
pub mod button;
pub mod codec;
pub mod color;
pub mod config;
pub mod design;
pub mod editor;
pub mod ids;
pub mod navigator;
pub mod normalize;
pub mod popup;
pub mod preview;
pub mod resolver;
pub mod section;
pub mod upload;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ShopToken};
pub use button::{
    Button, ButtonAction, ButtonId, ButtonKey, ButtonPatch, ButtonStyleField, ButtonStyleKind,
    ButtonStyleOverride, ResolvedButtonStyle,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use design::{Alignment, CornerRadius, DesignOverrides, DesignValues, DisplaySize, ImagePosition};
pub use editor::{Direction, EditCommand, Editor};
pub use ids::IdGenerator;
pub use navigator::{NavDirection, NavigationEvent, StepNavigator};
pub use popup::{validate_name, DiscountSettings, LegacyContent, PopupConfig};
pub use preview::{render, render_with, Device, PreviewLayout, PreviewOptions};
pub use resolver::{effective_design, resolve_button_style, resolve_design};
pub use section::{ContentPatch, Section, SectionContent, SectionId, SectionKind};
pub use upload::{UploadKind, UploadedAsset};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// A draft operation that was refused. The draft is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("a popup must keep at least one section")]
    LastSection,

    #[error("the draft has no sections")]
    NoSections,

    #[error("section {0} not found")]
    UnknownSection(SectionId),

    #[error("button {0} not found")]
    UnknownButton(String),

    #[error("invalid button key '{0}'; expected 'primary' or 'custom-<id>'")]
    InvalidButtonKey(String),

    #[error("invalid button style '{0}'; expected filled, outline or plain")]
    InvalidStyleValue(String),
}

/// Why a draft cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Popup name is required")]
    NameRequired,

    #[error("Popup name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("a popup must have at least one section")]
    NoSections,

    #[error("section order must match section position")]
    SectionOrder,

    #[error("{scope}: {field} is not a valid hex color: '{value}'")]
    InvalidColor {
        scope: String,
        field: String,
        value: String,
    },

    #[error("logo width must be between 1 and 100, got {0}")]
    LogoWidth(u32),

    #[error("{scope}: link button {button} needs a url")]
    MissingLinkUrl { scope: String, button: String },
}

/// Upload rejections. Messages are shown to the merchant verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file provided")]
    NoFile,

    #[error("Invalid file type. Only JPG, PNG, and GIF files are allowed.")]
    InvalidType(String),

    #[error("File size must be less than {}MB", .max / (1024 * 1024))]
    TooLarge { size: usize, max: usize },

    #[error("Invalid upload type '{0}'; expected logo or image")]
    InvalidKind(String),
}
