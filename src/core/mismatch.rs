// ミスマッチレポートドメインモデル
//
// 宣言スキーマと反映スキーマの比較結果を表現する型システム。
// ミスマッチはエラーではなく、常にデータとして返されます。

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::InvalidSchemaError;
use crate::core::schema::TypeDescriptor;

/// 方向付きの属性ミスマッチ
///
/// 位置引数のペアではなく、どちら側で属性が成立しているかを名前で区別します。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectionalMismatch {
    /// 反映側でのみ属性が成立しているカラム名
    pub reflected_only: BTreeSet<String>,

    /// 宣言側でのみ属性が成立しているカラム名
    pub declared_only: BTreeSet<String>,
}

impl DirectionalMismatch {
    /// 差分がないかどうか
    pub fn is_empty(&self) -> bool {
        self.reflected_only.is_empty() && self.declared_only.is_empty()
    }

    /// 方向を入れ替える
    pub fn swapped(self) -> Self {
        Self {
            reflected_only: self.declared_only,
            declared_only: self.reflected_only,
        }
    }
}

/// カラム名の集合差分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSetDiff {
    /// 反映側にあり宣言側にないカラム名
    pub missing_in_declared: BTreeSet<String>,

    /// 宣言側にあり反映側にないカラム名
    pub missing_in_reflected: BTreeSet<String>,
}

impl ColumnSetDiff {
    /// カラム名が完全に一致しているかどうか
    pub fn is_empty(&self) -> bool {
        self.missing_in_declared.is_empty() && self.missing_in_reflected.is_empty()
    }
}

/// 型の不一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMismatch {
    /// 宣言側の型
    pub declared: TypeDescriptor,
    /// 反映側の型
    pub reflected: TypeDescriptor,
}

/// テーブル単位のミスマッチレポート
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    /// テーブル名
    pub table: String,

    /// 反映側にあり宣言側にないカラム名
    pub missing_in_declared: BTreeSet<String>,

    /// 宣言側にあり反映側にないカラム名
    pub missing_in_reflected: BTreeSet<String>,

    /// 型が一致しない共通カラム（カラム名 -> 両側の型）
    pub type_mismatches: BTreeMap<String, TypeMismatch>,

    /// NULL許可の不一致
    pub nullable_mismatches: DirectionalMismatch,

    /// プライマリキー所属の不一致
    pub primary_key_mismatches: DirectionalMismatch,

    /// 外部キー有無の不一致
    pub foreign_key_mismatches: DirectionalMismatch,
}

impl MismatchReport {
    /// 新しい空のレポートを作成
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// ミスマッチがないかどうか
    pub fn is_empty(&self) -> bool {
        self.missing_in_declared.is_empty()
            && self.missing_in_reflected.is_empty()
            && self.type_mismatches.is_empty()
            && self.nullable_mismatches.is_empty()
            && self.primary_key_mismatches.is_empty()
            && self.foreign_key_mismatches.is_empty()
    }

    /// 型が一致しないカラム名の集合
    pub fn type_mismatch_names(&self) -> BTreeSet<&str> {
        self.type_mismatches.keys().map(String::as_str).collect()
    }

    /// ミスマッチ件数の合計
    pub fn mismatch_count(&self) -> usize {
        let directional = |d: &DirectionalMismatch| d.reflected_only.len() + d.declared_only.len();
        self.missing_in_declared.len()
            + self.missing_in_reflected.len()
            + self.type_mismatches.len()
            + directional(&self.nullable_mismatches)
            + directional(&self.primary_key_mismatches)
            + directional(&self.foreign_key_mismatches)
    }
}

/// テーブル全体のミスマッチ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WholeTableMismatch {
    /// 反映側にのみ存在するテーブル
    MissingInDeclared,
    /// 宣言側にのみ存在するテーブル
    MissingInReflected,
}

/// テーブルごとの比較結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TableOutcome {
    /// 両側に存在し、比較が完了した
    Compared(MismatchReport),
    /// 片側にしか存在しない
    WholeTable(WholeTableMismatch),
    /// 入力が不正で比較できなかった
    Invalid(InvalidSchemaError),
}

impl TableOutcome {
    /// ドリフト（不一致または不正入力）があるかどうか
    pub fn has_drift(&self) -> bool {
        match self {
            TableOutcome::Compared(report) => !report.is_empty(),
            TableOutcome::WholeTable(_) | TableOutcome::Invalid(_) => true,
        }
    }
}

/// スキーマ全体の比較結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    /// テーブル名 -> 比較結果
    pub tables: BTreeMap<String, TableOutcome>,
}

impl SchemaReport {
    /// 新しい空のレポートを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブルの比較結果を取得
    pub fn get(&self, table_name: &str) -> Option<&TableOutcome> {
        self.tables.get(table_name)
    }

    /// いずれかのテーブルにドリフトがあるかどうか
    pub fn has_drift(&self) -> bool {
        self.tables.values().any(TableOutcome::has_drift)
    }

    /// 集計情報を取得
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for outcome in self.tables.values() {
            match outcome {
                TableOutcome::Compared(report) => {
                    summary.compared += 1;
                    if !report.is_empty() {
                        summary.drifted += 1;
                    }
                }
                TableOutcome::WholeTable(WholeTableMismatch::MissingInDeclared) => {
                    summary.missing_in_declared += 1
                }
                TableOutcome::WholeTable(WholeTableMismatch::MissingInReflected) => {
                    summary.missing_in_reflected += 1
                }
                TableOutcome::Invalid(_) => summary.invalid += 1,
            }
        }
        summary
    }
}

/// 比較結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// 比較したテーブル数
    pub compared: usize,
    /// うちミスマッチのあったテーブル数
    pub drifted: usize,
    /// 反映側にのみ存在するテーブル数
    pub missing_in_declared: usize,
    /// 宣言側にのみ存在するテーブル数
    pub missing_in_reflected: usize,
    /// 不正入力で比較できなかったテーブル数
    pub invalid: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_directional_mismatch_swapped() {
        let mismatch = DirectionalMismatch {
            reflected_only: names(&["a"]),
            declared_only: names(&["b"]),
        };
        let swapped = mismatch.swapped();

        assert_eq!(swapped.reflected_only, names(&["b"]));
        assert_eq!(swapped.declared_only, names(&["a"]));
    }

    #[test]
    fn test_empty_report() {
        let report = MismatchReport::new("users");
        assert!(report.is_empty());
        assert_eq!(report.mismatch_count(), 0);
        assert!(!TableOutcome::Compared(report).has_drift());
    }

    #[test]
    fn test_report_mismatch_count() {
        let mut report = MismatchReport::new("users");
        report.missing_in_declared = names(&["legacy"]);
        report.nullable_mismatches.declared_only = names(&["email", "name"]);

        assert!(!report.is_empty());
        assert_eq!(report.mismatch_count(), 3);
    }

    #[test]
    fn test_schema_report_summary() {
        let mut report = SchemaReport::new();
        report
            .tables
            .insert("a".to_string(), TableOutcome::Compared(MismatchReport::new("a")));
        let mut drifted = MismatchReport::new("b");
        drifted.missing_in_reflected = names(&["x"]);
        report
            .tables
            .insert("b".to_string(), TableOutcome::Compared(drifted));
        report.tables.insert(
            "c".to_string(),
            TableOutcome::WholeTable(WholeTableMismatch::MissingInDeclared),
        );
        report.tables.insert(
            "d".to_string(),
            TableOutcome::Invalid(InvalidSchemaError::EmptyTable {
                table: "d".to_string(),
            }),
        );

        let summary = report.summary();
        assert_eq!(summary.compared, 2);
        assert_eq!(summary.drifted, 1);
        assert_eq!(summary.missing_in_declared, 1);
        assert_eq!(summary.missing_in_reflected, 0);
        assert_eq!(summary.invalid, 1);
        assert!(report.has_drift());
    }

    #[test]
    fn test_table_outcome_serialization() {
        let outcome = TableOutcome::WholeTable(WholeTableMismatch::MissingInReflected);
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"status":"whole_table","detail":"missing_in_reflected"}"#
        );
    }
}
