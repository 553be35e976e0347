// テーブルレベルの比較

use crate::core::error::InvalidSchemaError;
use crate::core::mismatch::{MismatchReport, TypeMismatch};
use crate::core::schema::TableDescriptor;
use crate::services::type_equivalence::TypeVerdict;
use std::collections::HashSet;
use tracing::warn;

use super::attribute_comparator::{diff_foreign_key, diff_nullable, diff_primary_key, shared_columns};
use super::column_comparator::diff_columns;
use super::SchemaComparator;

impl SchemaComparator {
    /// 1組のテーブルを比較してミスマッチレポートを作成
    ///
    /// ミスマッチはエラーではなくレポートとして返します。
    /// 入力のテーブル記述子が不正な場合のみ `InvalidSchemaError` を返します。
    pub fn compare_table(
        &self,
        declared: &TableDescriptor,
        reflected: &TableDescriptor,
    ) -> Result<MismatchReport, InvalidSchemaError> {
        self.validate_table(declared)?;
        self.validate_table(reflected)?;

        let mut report = MismatchReport::new(declared.name.clone());

        let column_diff = diff_columns(declared, reflected);
        report.missing_in_declared = column_diff.missing_in_declared;
        report.missing_in_reflected = column_diff.missing_in_reflected;

        for (declared_column, reflected_column) in shared_columns(declared, reflected) {
            let verdict = self
                .equivalence
                .compare(&declared_column.column_type, &reflected_column.column_type);

            match verdict {
                TypeVerdict::Equivalent => continue,
                TypeVerdict::Different => {}
                TypeVerdict::UnknownKind(kinds) => {
                    warn!(
                        table = %declared.name,
                        column = %declared_column.name,
                        kinds = ?kinds,
                        "Unknown type kind, treating column types as different"
                    );
                }
            }

            report.type_mismatches.insert(
                declared_column.name.clone(),
                TypeMismatch {
                    declared: declared_column.column_type.clone(),
                    reflected: reflected_column.column_type.clone(),
                },
            );
        }

        report.nullable_mismatches = diff_nullable(declared, reflected);
        report.primary_key_mismatches = diff_primary_key(declared, reflected);
        report.foreign_key_mismatches = diff_foreign_key(declared, reflected);

        Ok(report)
    }

    /// テーブル記述子の妥当性を検証
    pub(crate) fn validate_table(&self, table: &TableDescriptor) -> Result<(), InvalidSchemaError> {
        if table.columns.is_empty() && !self.policy.allow_empty_tables {
            return Err(InvalidSchemaError::EmptyTable {
                table: table.name.clone(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for column in &table.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(InvalidSchemaError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        Ok(())
    }
}
