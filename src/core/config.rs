// 設定ファイル管理
//
// プロジェクトの設定ファイル（YAML形式）で指定する、比較対象のスキーマファイル、
// データベース方言、比較ポリシー、追加の型エイリアスを表現します。

use crate::core::error::ConfigError;
use crate::core::type_kind::CanonicalKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// データベース方言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(rename = "postgresql", alias = "postgres")]
    PostgreSQL,
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "sqlite")]
    SQLite,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Dialect::PostgreSQL),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            other => Err(format!(
                "Unsupported database dialect: {}. Please specify one of: postgresql, mysql, sqlite.",
                other
            )),
        }
    }
}

/// 比較ポリシー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPolicy {
    /// 長さ・精度・スケールも比較するかどうか
    ///
    /// falseの場合、同じカテゴリのパラメータ付き型はパラメータ値に関わらず一致とみなします。
    /// 列挙値はこの設定に関わらず常に比較します。
    #[serde(default)]
    pub strict_parameters: bool,

    /// カラムを持たないテーブルを許可するかどうか
    #[serde(default)]
    pub allow_empty_tables: bool,

    /// 比較対象から除外するテーブル名
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub ignore_tables: BTreeSet<String>,
}

impl ComparisonPolicy {
    /// 厳密なパラメータ比較を行うポリシー
    pub fn strict() -> Self {
        Self {
            strict_parameters: true,
            ..Self::default()
        }
    }

    /// 指定されたテーブルを比較対象から除外するかどうか
    pub fn is_ignored(&self, table_name: &str) -> bool {
        self.ignore_tables.contains(table_name)
    }
}

/// プロジェクト設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// データベース方言
    #[serde(default)]
    pub dialect: Dialect,

    /// 宣言スキーマファイル
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared: Option<PathBuf>,

    /// 反映スキーマファイル（リフレクション結果のエクスポート）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflected: Option<PathBuf>,

    /// 比較ポリシー
    #[serde(default)]
    pub policy: ComparisonPolicy,

    /// 追加の型エイリアス（型名 -> 正規型カテゴリ名）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            dialect: Dialect::default(),
            declared: None,
            reflected: None,
            policy: ComparisonPolicy::default(),
            type_aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::MissingVersion);
        }

        self.resolved_aliases()?;

        Ok(())
    }

    /// 型エイリアスを正規型カテゴリに解決
    pub fn resolved_aliases(&self) -> Result<BTreeMap<String, CanonicalKind>, ConfigError> {
        self.type_aliases
            .iter()
            .map(|(alias, kind)| {
                kind.parse::<CanonicalKind>()
                    .map(|canonical| (alias.clone(), canonical))
                    .map_err(|_| ConfigError::UnknownTypeKind {
                        alias: alias.clone(),
                        kind: kind.clone(),
                    })
            })
            .collect()
    }
}
