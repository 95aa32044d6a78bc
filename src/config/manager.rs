//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
    SourceLocation,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: I18nSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルがなければデフォルト値を使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!(root = ?workspace_root, "Loading settings");

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.unwrap_or_default()
        } else {
            I18nSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded");

        Ok(())
    }

    /// 設定を差し替える
    ///
    /// # Errors
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn update_settings(&mut self, new_settings: I18nSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated");

        Ok(())
    }

    /// 翻訳の取得元を CLI 引数で上書きする
    ///
    /// もう一方の取得元の設定は消す。HTTP の場合はパステンプレートも置き換える。
    ///
    /// # Errors
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn override_source(&mut self, location: SourceLocation) -> Result<(), ConfigError> {
        let mut settings = self.current_settings.clone();
        match location {
            SourceLocation::Http { base_url, path_template } => {
                settings.base_url = Some(base_url);
                settings.path_template = path_template;
                settings.locales_dir = None;
            }
            SourceLocation::Directory(dir) => {
                settings.base_url = None;
                settings.locales_dir = Some(dir);
            }
        }
        self.update_settings(settings)
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// 翻訳の取得元。相対ディレクトリはワークスペースルート基準で解決する
    #[must_use]
    pub fn source_location(&self) -> SourceLocation {
        match self.current_settings.source_location() {
            SourceLocation::Directory(dir) if dir.is_relative() => {
                let root = self.workspace_root.as_deref().unwrap_or_else(|| Path::new("."));
                SourceLocation::Directory(root.join(dir))
            }
            location => location,
        }
    }
}
