// checkコマンドハンドラー
//
// 宣言スキーマと反映スキーマを読み込み、テーブルごとのドリフトを報告します。
// - 設定ファイルとCLI引数の統合（CLI引数優先）
// - スキーマ比較の実行
// - 結果の出力（Text/JSON）

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::config::{Config, Dialect};
use crate::core::mismatch::{
    DirectionalMismatch, MismatchReport, ReportSummary, SchemaReport, TableOutcome,
    WholeTableMismatch,
};
use crate::services::schema_comparator::SchemaComparator;
use crate::services::traits::{SchemaProvider, YamlSchemaFile};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// checkコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct CheckCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 宣言スキーマファイル（指定されない場合は設定ファイルから取得）
    pub declared: Option<PathBuf>,
    /// 反映スキーマファイル（指定されない場合は設定ファイルから取得）
    pub reflected: Option<PathBuf>,
    /// データベース方言（指定されない場合は設定ファイルから取得）
    pub dialect: Option<Dialect>,
    /// パラメータを厳密に比較するか（trueの場合のみ設定ファイルを上書き）
    pub strict_parameters: bool,
    /// 追加で除外するテーブル
    pub ignore_tables: Vec<String>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// checkコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// 宣言スキーマの供給元
    pub declared: String,
    /// 反映スキーマの供給元
    pub reflected: String,
    /// データベース方言
    pub dialect: Dialect,
    /// パラメータ厳密比較の有無
    pub strict_parameters: bool,
    /// ドリフトの有無
    pub has_drift: bool,
    /// 集計
    pub summary: ReportSummary,
    /// テーブルごとの比較結果
    #[serde(flatten)]
    pub report: SchemaReport,
}

impl CommandOutput for CheckOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Schema Drift Check ===\n");
        output.push_str(&format!("Declared:  {}\n", self.declared));
        output.push_str(&format!("Reflected: {}\n", self.reflected));
        output.push_str(&format!(
            "Dialect:   {}{}\n\n",
            self.dialect,
            if self.strict_parameters {
                " (strict parameters)"
            } else {
                ""
            }
        ));

        if self.report.tables.is_empty() {
            output.push_str("No tables to compare.\n");
        }

        for (table_name, outcome) in &self.report.tables {
            format_outcome(&mut output, table_name, outcome);
        }

        let summary = &self.summary;
        output.push_str("\n=== Summary ===\n");
        output.push_str(&format!(
            "Tables compared: {} ({} with drift)\n",
            summary.compared, summary.drifted
        ));
        output.push_str(&format!(
            "Tables missing in declared: {}\n",
            summary.missing_in_declared
        ));
        output.push_str(&format!(
            "Tables missing in reflected: {}\n",
            summary.missing_in_reflected
        ));
        output.push_str(&format!("Invalid tables: {}\n", summary.invalid));

        output.push_str("\n=== Result ===\n");
        if self.has_drift {
            output.push_str(&format!("{}\n", "✗ Schema drift detected.".red().bold()));
        } else {
            output.push_str(&format!("{}\n", "✓ No schema drift detected.".green()));
        }

        output
    }
}

fn format_outcome(output: &mut String, table_name: &str, outcome: &TableOutcome) {
    match outcome {
        TableOutcome::Compared(report) if report.is_empty() => {
            output.push_str(&format!("{} {}\n", "✓".green(), table_name));
        }
        TableOutcome::Compared(report) => {
            output.push_str(&format!(
                "{} {} ({} mismatch(es))\n",
                "✗".red(),
                table_name.bold(),
                report.mismatch_count()
            ));
            format_report(output, report);
        }
        TableOutcome::WholeTable(WholeTableMismatch::MissingInDeclared) => {
            output.push_str(&format!(
                "{} {}: {}\n",
                "✗".red(),
                table_name.bold(),
                "table exists only in the reflected schema".yellow()
            ));
        }
        TableOutcome::WholeTable(WholeTableMismatch::MissingInReflected) => {
            output.push_str(&format!(
                "{} {}: {}\n",
                "✗".red(),
                table_name.bold(),
                "table exists only in the declared schema".yellow()
            ));
        }
        TableOutcome::Invalid(error) => {
            output.push_str(&format!(
                "{} {}: {}\n",
                "!".red().bold(),
                table_name.bold(),
                format!("invalid input: {}", error).red()
            ));
        }
    }
}

fn format_report(output: &mut String, report: &MismatchReport) {
    push_names(
        output,
        "Columns missing in declared",
        &report.missing_in_declared,
    );
    push_names(
        output,
        "Columns missing in reflected",
        &report.missing_in_reflected,
    );

    for (column, mismatch) in &report.type_mismatches {
        output.push_str(&format!(
            "  - Type mismatch on '{}': declared {}, reflected {}\n",
            column, mismatch.declared, mismatch.reflected
        ));
    }

    push_directional(output, "Nullable", &report.nullable_mismatches);
    push_directional(output, "Primary key", &report.primary_key_mismatches);
    push_directional(output, "Foreign key", &report.foreign_key_mismatches);
}

fn push_directional(output: &mut String, attribute: &str, mismatch: &DirectionalMismatch) {
    push_names(
        output,
        &format!("{} only in reflected", attribute),
        &mismatch.reflected_only,
    );
    push_names(
        output,
        &format!("{} only in declared", attribute),
        &mismatch.declared_only,
    );
}

fn push_names(output: &mut String, label: &str, names: &BTreeSet<String>) {
    if names.is_empty() {
        return;
    }
    let joined = names.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    output.push_str(&format!("  - {}: {}\n", label, joined));
}

/// checkコマンドの実行結果
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// 出力フォーマットに応じた出力
    pub output: String,
    /// ドリフトの有無（終了コードの決定に使用）
    pub has_drift: bool,
}

/// checkコマンドハンドラー
#[derive(Debug, Default)]
pub struct CheckCommandHandler {}

impl CheckCommandHandler {
    /// 新しいCheckCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// checkコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - checkコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 成功時は比較結果とドリフトの有無。設定やファイルの読み込みに失敗した場合はエラー
    pub fn execute(&self, command: &CheckCommand) -> Result<CheckResult> {
        debug!(
            declared = ?command.declared,
            reflected = ?command.reflected,
            "Executing check command"
        );

        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;

        let declared_path = context.declared_path(command.declared.as_deref())?;
        let reflected_path = context.reflected_path(command.reflected.as_deref())?;
        let config = self.apply_overrides(context.config, command);

        let declared = YamlSchemaFile::new(declared_path);
        let reflected = YamlSchemaFile::new(reflected_path);

        let output = self.run(&config, &declared, &reflected)?;
        let has_drift = output.has_drift;

        Ok(CheckResult {
            output: render_output(&output, &command.format)?,
            has_drift,
        })
    }

    /// 任意のスキーマ供給元を使って比較を実行
    pub fn run(
        &self,
        config: &Config,
        declared: &dyn SchemaProvider,
        reflected: &dyn SchemaProvider,
    ) -> Result<CheckOutput> {
        let declared_schema = declared
            .load_schema()
            .with_context(|| format!("Failed to load declared schema: {}", declared.describe()))?;
        let reflected_schema = reflected.load_schema().with_context(|| {
            format!("Failed to load reflected schema: {}", reflected.describe())
        })?;

        let comparator =
            SchemaComparator::from_config(config).with_context(|| "Invalid comparison settings")?;
        let report = comparator.compare_schema(&declared_schema, &reflected_schema);
        let summary = report.summary();
        let has_drift = report.has_drift();

        info!(
            compared = summary.compared,
            drifted = summary.drifted,
            invalid = summary.invalid,
            "Schema comparison finished"
        );

        Ok(CheckOutput {
            declared: declared.describe(),
            reflected: reflected.describe(),
            dialect: config.dialect,
            strict_parameters: config.policy.strict_parameters,
            has_drift,
            summary,
            report,
        })
    }

    /// CLI引数で設定を上書き
    fn apply_overrides(&self, mut config: Config, command: &CheckCommand) -> Config {
        if let Some(dialect) = command.dialect {
            config.dialect = dialect;
        }
        if command.strict_parameters {
            config.policy.strict_parameters = true;
        }
        config
            .policy
            .ignore_tables
            .extend(command.ignore_tables.iter().cloned());
        config
    }
}
