// エラー型定義
//
// thiserrorを使用して、InvalidSchemaError, ConfigError, SchemaFileError, IoError を定義します。
// 差分（ミスマッチ）はエラーではなくデータとして返すため、ここには含まれません。

use thiserror::Error;

/// 不正なスキーマ入力エラー
///
/// テーブル記述子が比較の前提を満たさない場合に発生します。
/// 発生したテーブルの比較のみが失敗し、他のテーブルには影響しません。
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidSchemaError {
    /// 同一テーブル内でカラム名が重複している
    #[error("Table '{table}' declares column '{column}' more than once")]
    DuplicateColumn {
        /// テーブル名
        table: String,
        /// 重複したカラム名
        column: String,
    },

    /// カラムを1つも持たないテーブル
    #[error("Table '{table}' has no columns")]
    EmptyTable {
        /// テーブル名
        table: String,
    },
}

impl InvalidSchemaError {
    /// エラーが発生したテーブル名を取得
    pub fn table(&self) -> &str {
        match self {
            InvalidSchemaError::DuplicateColumn { table, .. }
            | InvalidSchemaError::EmptyTable { table } => table,
        }
    }
}

/// 設定エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// バージョン未指定
    #[error("Config file version is not specified")]
    MissingVersion,

    /// 型エイリアスの参照先が正規型カテゴリではない
    #[error("Type alias '{alias}' points to unknown canonical kind '{kind}'")]
    UnknownTypeKind {
        /// エイリアス名
        alias: String,
        /// 指定されたカテゴリ名
        kind: String,
    },

    /// スキーマファイルのパスが解決できない
    #[error("No {side} schema file given. Pass --{side} or set '{side}' in the config file")]
    MissingSchemaPath {
        /// "declared" または "reflected"
        side: &'static str,
    },
}

/// スキーマファイルの解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaFileError {
    /// 型表記の解析に失敗
    #[error("Invalid type '{input}': {message}")]
    InvalidType {
        /// 入力された型表記
        input: String,
        /// エラーメッセージ
        message: String,
    },

    /// テーブル名とマップのキーが一致しない
    #[error("Table key '{key}' does not match table name '{name}'")]
    TableNameMismatch {
        /// マップのキー
        key: String,
        /// テーブル記述子の名前
        name: String,
    },
}

/// I/Oエラー
///
/// ファイル操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// ファイルパス
        path: String,
    },

    /// File read error
    #[error("Failed to read file: {path} (cause: {cause})")]
    FileRead {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },
}
