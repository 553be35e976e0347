// カラム属性（NULL許可・プライマリキー・外部キー）の差分検出

use crate::core::mismatch::DirectionalMismatch;
use crate::core::schema::{ColumnDescriptor, TableDescriptor};
use std::collections::HashMap;

/// 両方のテーブルに存在するカラムの組を取得
///
/// 宣言側のカラム順で返します。
pub(crate) fn shared_columns<'a>(
    declared: &'a TableDescriptor,
    reflected: &'a TableDescriptor,
) -> Vec<(&'a ColumnDescriptor, &'a ColumnDescriptor)> {
    let reflected_map: HashMap<&str, &ColumnDescriptor> = reflected
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c))
        .collect();

    declared
        .columns
        .iter()
        .filter_map(|d| reflected_map.get(d.name.as_str()).map(|r| (d, *r)))
        .collect()
}

/// 任意の真偽属性について差分を計算
///
/// 両方のテーブルに存在するカラムのみが対象です。
/// 引数の順序を入れ替えると、結果の `reflected_only` と `declared_only` も入れ替わります。
pub fn diff_attribute<F>(
    declared: &TableDescriptor,
    reflected: &TableDescriptor,
    attribute: F,
) -> DirectionalMismatch
where
    F: Fn(&ColumnDescriptor) -> bool,
{
    let mut mismatch = DirectionalMismatch::default();

    for (declared_column, reflected_column) in shared_columns(declared, reflected) {
        match (attribute(declared_column), attribute(reflected_column)) {
            (false, true) => {
                mismatch.reflected_only.insert(declared_column.name.clone());
            }
            (true, false) => {
                mismatch.declared_only.insert(declared_column.name.clone());
            }
            _ => {}
        }
    }

    mismatch
}

/// NULL許可の差分
pub fn diff_nullable(declared: &TableDescriptor, reflected: &TableDescriptor) -> DirectionalMismatch {
    diff_attribute(declared, reflected, |c| c.nullable)
}

/// プライマリキー所属の差分
pub fn diff_primary_key(
    declared: &TableDescriptor,
    reflected: &TableDescriptor,
) -> DirectionalMismatch {
    diff_attribute(declared, reflected, |c| c.primary_key)
}

/// 外部キー有無の差分
///
/// 参照先は比較しません。
pub fn diff_foreign_key(
    declared: &TableDescriptor,
    reflected: &TableDescriptor,
) -> DirectionalMismatch {
    diff_attribute(declared, reflected, ColumnDescriptor::has_foreign_key)
}
