// コマンド共通コンテキスト
//
// 設定ファイル読み込みやパス解決の重複をCLI層で集約する。

use crate::core::config::Config;
use crate::core::error::ConfigError;
use crate::services::config_loader::ConfigLoader;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    pub fn load(project_path: PathBuf) -> Result<Self> {
        Self::load_with_config(project_path, None)
    }

    /// カスタム設定ファイルパスを指定してコンテキストを作成
    ///
    /// 明示的に指定された設定ファイルが存在しない場合はエラー。
    /// デフォルトの設定ファイルが存在しない場合はデフォルト設定を使用する。
    pub fn load_with_config(
        project_path: PathBuf,
        custom_config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = match &custom_config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(anyhow!("Config file not found: {:?}", path));
                }
                ConfigLoader::from_file(path).with_context(|| "Failed to read config file")?
            }
            None => {
                let default_path = project_path.join(Config::DEFAULT_CONFIG_PATH);
                ConfigLoader::load_or_default(&default_path)
                    .with_context(|| "Failed to read config file")?
            }
        };

        let config_path = custom_config_path
            .unwrap_or_else(|| project_path.join(Config::DEFAULT_CONFIG_PATH));
        debug!(config = %config_path.display(), dialect = %config.dialect, "Loaded config");

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// プロジェクトルートからの相対パスを解決
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_path.join(path)
        }
    }

    /// 宣言スキーマファイルのパス（CLI引数 > 設定ファイル）
    pub fn declared_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        self.schema_path("declared", override_path, self.config.declared.as_deref())
    }

    /// 反映スキーマファイルのパス（CLI引数 > 設定ファイル）
    pub fn reflected_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        self.schema_path("reflected", override_path, self.config.reflected.as_deref())
    }

    fn schema_path(
        &self,
        side: &'static str,
        override_path: Option<&Path>,
        configured: Option<&Path>,
    ) -> Result<PathBuf> {
        // CLI引数はカレントディレクトリ基準、設定ファイルの値はプロジェクトルート基準
        match (override_path, configured) {
            (Some(path), _) => Ok(path.to_path_buf()),
            (None, Some(path)) => Ok(self.resolve_path(path)),
            (None, None) => Err(ConfigError::MissingSchemaPath { side }.into()),
        }
    }
}
