pub mod app_config;
pub mod catalog;
pub mod config;
pub mod richtext;
pub mod services;

pub use app_config::{AppConfig, Environment};
pub use catalog::{as_list, group_by_first_letter, letter_key, ServiceGroup, UNTITLED_GROUP_KEY};
pub use config::{load_app_config, load_app_config_from_env};
pub use richtext::{render_blocks, Inline, Paragraph};
pub use services::{
    slug_for_id, ImageAsset, ImageVariant, PriceListEntry, ProcedureDetails, RichTextBlock,
    Service, TextRun, PRICE_CELL_PLACEHOLDER, TITLE_PLACEHOLDER,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
