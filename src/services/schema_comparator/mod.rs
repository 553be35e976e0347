// スキーマ比較サービス
//
// 宣言スキーマと反映スキーマを比較し、テーブルごとのミスマッチを検出するサービス。
// カラム名の差分、型の不一致、NULL許可・プライマリキー・外部キーの不一致を検出します。

mod attribute_comparator;
mod column_comparator;
mod table_comparator;

pub use attribute_comparator::{diff_attribute, diff_foreign_key, diff_nullable, diff_primary_key};
pub use column_comparator::diff_columns;

use crate::adapters::type_mapping::TypeMappingService;
use crate::core::config::{ComparisonPolicy, Config, Dialect};
use crate::core::error::{ConfigError, InvalidSchemaError};
use crate::core::mismatch::{MismatchReport, SchemaReport, TableOutcome, WholeTableMismatch};
use crate::core::schema::{SchemaDescriptor, TableDescriptor};
use crate::services::type_equivalence::TypeEquivalence;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// スキーマ比較サービス
///
/// 入力のスキーマは読み取るだけで、状態を持ちません。
#[derive(Debug)]
pub struct SchemaComparator {
    equivalence: TypeEquivalence,
    policy: ComparisonPolicy,
}

impl SchemaComparator {
    /// 新しいSchemaComparatorを作成
    pub fn new(equivalence: TypeEquivalence, policy: ComparisonPolicy) -> Self {
        Self {
            equivalence,
            policy,
        }
    }

    /// PostgreSQL方言で、指定されたポリシーのSchemaComparatorを作成
    pub fn with_policy(policy: ComparisonPolicy) -> Self {
        let equivalence = TypeEquivalence::new(TypeMappingService::new(Dialect::PostgreSQL), &policy);
        Self::new(equivalence, policy)
    }

    /// 設定からSchemaComparatorを作成
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mapping = TypeMappingService::new(config.dialect).with_aliases(config.resolved_aliases()?);
        let equivalence = TypeEquivalence::new(mapping, &config.policy);
        Ok(Self::new(equivalence, config.policy.clone()))
    }

    /// 比較ポリシーを取得
    pub fn policy(&self) -> &ComparisonPolicy {
        &self.policy
    }

    /// スキーマ全体を比較
    ///
    /// 片側にしか存在しないテーブルはテーブル全体のミスマッチとして報告します。
    /// あるテーブルの入力が不正でも、他のテーブルの比較は継続します。
    pub fn compare_schema(
        &self,
        declared: &SchemaDescriptor,
        reflected: &SchemaDescriptor,
    ) -> SchemaReport {
        debug!(
            declared_tables = declared.table_count(),
            reflected_tables = reflected.table_count(),
            "Comparing schemas"
        );

        let mut report = SchemaReport::new();

        let table_names: BTreeSet<&String> =
            declared.tables.keys().chain(reflected.tables.keys()).collect();

        for table_name in table_names {
            if self.policy.is_ignored(table_name) {
                debug!(table = %table_name, "Skipping ignored table");
                continue;
            }

            let outcome = match (declared.get_table(table_name), reflected.get_table(table_name)) {
                (Some(declared_table), Some(reflected_table)) => {
                    self.compare_table_outcome(declared_table, reflected_table)
                }
                (Some(_), None) => TableOutcome::WholeTable(WholeTableMismatch::MissingInReflected),
                (None, Some(_)) => TableOutcome::WholeTable(WholeTableMismatch::MissingInDeclared),
                (None, None) => continue,
            };

            debug!(table = %table_name, drift = outcome.has_drift(), "Compared table");
            report.tables.insert(table_name.clone(), outcome);
        }

        report
    }

    /// テーブルの比較結果をTableOutcomeに変換
    fn compare_table_outcome(
        &self,
        declared: &TableDescriptor,
        reflected: &TableDescriptor,
    ) -> TableOutcome {
        match self.compare_table(declared, reflected) {
            Ok(report) => TableOutcome::Compared(report),
            Err(err) => {
                warn!(table = %err.table(), error = %err, "Skipping invalid table");
                TableOutcome::Invalid(err)
            }
        }
    }
}

impl Default for SchemaComparator {
    fn default() -> Self {
        Self::with_policy(ComparisonPolicy::default())
    }
}

/// 1組のテーブルを比較（PostgreSQL方言・デフォルトポリシー）
pub fn compare_table(
    declared: &TableDescriptor,
    reflected: &TableDescriptor,
) -> Result<MismatchReport, InvalidSchemaError> {
    SchemaComparator::default().compare_table(declared, reflected)
}

/// スキーマ全体を比較（PostgreSQL方言・デフォルトポリシー）
pub fn compare_schema(declared: &SchemaDescriptor, reflected: &SchemaDescriptor) -> SchemaReport {
    SchemaComparator::default().compare_schema(declared, reflected)
}
