// サービストレイト定義
//
// 宣言スキーマ・反映スキーマの供給元を抽象化するトレイト。
// テスト時はメモリ上のスキーマに差し替えられます。

use crate::core::schema::SchemaDescriptor;
use crate::services::schema_parser::SchemaParserService;
use anyhow::Result;
use std::path::PathBuf;

/// スキーマ供給元のトレイト
pub trait SchemaProvider {
    /// 供給元の説明（ログ・レポート用）
    fn describe(&self) -> String;

    /// スキーマ記述子を読み込む
    fn load_schema(&self) -> Result<SchemaDescriptor>;
}

/// YAMLスキーマファイル
#[derive(Debug, Clone)]
pub struct YamlSchemaFile {
    path: PathBuf,
    parser: SchemaParserService,
}

impl YamlSchemaFile {
    /// 新しいYamlSchemaFileを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser: SchemaParserService::new(),
        }
    }
}

impl SchemaProvider for YamlSchemaFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_schema(&self) -> Result<SchemaDescriptor> {
        self.parser.parse_schema_file(&self.path)
    }
}

impl SchemaProvider for SchemaDescriptor {
    fn describe(&self) -> String {
        format!("in-memory schema ({} tables)", self.table_count())
    }

    fn load_schema(&self) -> Result<SchemaDescriptor> {
        Ok(self.clone())
    }
}
