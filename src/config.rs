//! `.i18n.json` の読み込みとバリデーション
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    DEFAULT_LOCALES_DIR,
    I18nSettings,
    SourceLocation,
    ValidationError,
};
