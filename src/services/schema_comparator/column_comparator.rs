// カラム名の集合差分

use crate::core::mismatch::ColumnSetDiff;
use crate::core::schema::TableDescriptor;

/// カラム名の集合差分を計算
///
/// 名前のみを比較し、型や属性は比較しません。
pub fn diff_columns(declared: &TableDescriptor, reflected: &TableDescriptor) -> ColumnSetDiff {
    let declared_names = declared.column_names();
    let reflected_names = reflected.column_names();

    ColumnSetDiff {
        missing_in_declared: reflected_names
            .difference(&declared_names)
            .map(|name| name.to_string())
            .collect(),
        missing_in_reflected: declared_names
            .difference(&reflected_names)
            .map(|name| name.to_string())
            .collect(),
    }
}
