// typesコマンドハンドラー
//
// 型比較に使用する同義語テーブルを表示します。

use crate::adapters::type_mapping::{SynonymEntry, SynonymSource, TypeMappingService};
use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::config::Dialect;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// typesコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct TypesCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// データベース方言（指定されない場合は設定ファイルから取得）
    pub dialect: Option<Dialect>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// typesコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct TypesOutput {
    pub dialect: Dialect,
    pub synonyms: Vec<SynonymEntry>,
}

impl CommandOutput for TypesOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("=== Type Synonyms ({}) ===\n", self.dialect));

        let mut current = None;
        for entry in &self.synonyms {
            if current != Some(entry.kind) {
                output.push_str(&format!("\n{}\n", entry.kind.as_str().bold()));
                current = Some(entry.kind);
            }
            let source = match entry.source {
                SynonymSource::Alias => "alias".cyan(),
                SynonymSource::Native => "native".normal(),
                SynonymSource::Abstract => "abstract".dimmed(),
            };
            output.push_str(&format!("  {:<32} {}\n", entry.name, source));
        }

        output
    }
}

/// typesコマンドハンドラー
#[derive(Debug, Default)]
pub struct TypesCommandHandler {}

impl TypesCommandHandler {
    /// 新しいTypesCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// typesコマンドを実行
    pub fn execute(&self, command: &TypesCommand) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let dialect = command.dialect.unwrap_or(context.config.dialect);
        let aliases = context
            .config
            .resolved_aliases()
            .with_context(|| "Invalid type aliases")?;

        let mapping = TypeMappingService::new(dialect).with_aliases(aliases);
        let output = TypesOutput {
            dialect: mapping.dialect(),
            synonyms: mapping.synonym_table(),
        };

        render_output(&output, &command.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn command(project_path: PathBuf, dialect: Option<Dialect>, format: OutputFormat) -> TypesCommand {
        TypesCommand {
            project_path,
            config_path: None,
            dialect,
            format,
        }
    }

    #[test]
    fn test_types_text_output() {
        colored::control::set_override(false);
        let temp_dir = TempDir::new().unwrap();
        let handler = TypesCommandHandler::new();

        let output = handler
            .execute(&command(temp_dir.path().to_path_buf(), None, OutputFormat::Text))
            .unwrap();

        assert!(output.contains("=== Type Synonyms (postgresql) ==="));
        assert!(output.contains("character varying"));
        assert!(output.contains("\ntext\n"));
    }

    #[test]
    fn test_types_json_includes_aliases() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".pg-check.yaml"),
            "version: \"1.0\"\ntype_aliases:\n  citext: text\n",
        )
        .unwrap();
        let handler = TypesCommandHandler::new();

        let output = handler
            .execute(&command(
                temp_dir.path().to_path_buf(),
                Some(Dialect::MySQL),
                OutputFormat::Json,
            ))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["dialect"], "mysql");
        let synonyms = value["synonyms"].as_array().unwrap();
        assert!(synonyms.iter().any(|entry| {
            entry["name"] == "citext" && entry["kind"] == "text" && entry["source"] == "alias"
        }));
        assert!(synonyms.iter().any(|entry| entry["name"] == "longtext"));
    }
}
