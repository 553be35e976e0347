// スキーマパーサーサービス
//
// YAMLスキーマファイルを読み込み、スキーマ記述子に変換するサービス。
// 宣言スキーマ・反映スキーマ（リフレクション結果のエクスポート）の両方で同じ形式を使用します。

use crate::core::error::{IoError, SchemaFileError};
use crate::core::schema::SchemaDescriptor;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// スキーマパーサーサービス
///
/// ```yaml
/// tables:
///   users:
///     columns:
///       - name: id
///         type: Integer
///         nullable: false
///         primary_key: true
///       - name: email
///         type: "character varying(255)"
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaParserService;

impl SchemaParserService {
    /// 新しいSchemaParserServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// 単一のYAMLファイルを解析してスキーマ記述子に変換
    ///
    /// # Errors
    ///
    /// - ファイルが存在しない場合
    /// - ファイルの読み込みに失敗した場合
    /// - YAMLの解析に失敗した場合
    /// - テーブル名とマップのキーが一致しない場合
    pub fn parse_schema_file(&self, file_path: &Path) -> Result<SchemaDescriptor> {
        if !file_path.exists() {
            return Err(IoError::FileNotFound {
                path: file_path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(file_path).map_err(|e| IoError::FileRead {
            path: file_path.display().to_string(),
            cause: e.to_string(),
        })?;

        self.parse_schema_str(&content)
            .with_context(|| format!("Failed to parse schema file: {:?}", file_path))
    }

    /// YAML文字列を解析してスキーマ記述子に変換
    pub fn parse_schema_str(&self, content: &str) -> Result<SchemaDescriptor> {
        let mut schema: SchemaDescriptor =
            serde_saphyr::from_str(content).with_context(|| "Failed to parse schema YAML")?;

        // テーブル名はマップのキーから補完
        for (key, table) in schema.tables.iter_mut() {
            if table.name.is_empty() {
                table.name = key.clone();
            } else if &table.name != key {
                return Err(SchemaFileError::TableNameMismatch {
                    key: key.clone(),
                    name: table.name.clone(),
                }
                .into());
            }
        }

        Ok(schema)
    }
}
