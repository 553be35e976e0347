// スキーマ記述子
//
// 宣言スキーマと反映（リフレクション）スキーマの両方を表現する、
// ORMに依存しない不変の記述子型を提供します。

use crate::core::error::SchemaFileError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// 型表記のパターン（例: "numeric(10, 2)", "timestamp(3) with time zone"）
static TYPE_STRING_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<head>[^()]*?)\s*(?:\((?P<args>.*)\))?(?P<tail>[^()]*)$")
});

/// スキーマ記述子
///
/// テーブル名からテーブル記述子へのマップです。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// テーブル記述子のマップ（テーブル名 -> TableDescriptor）
    #[serde(default)]
    pub tables: BTreeMap<String, TableDescriptor>,
}

impl SchemaDescriptor {
    /// 空のスキーマを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブルを追加
    pub fn add_table(&mut self, table: TableDescriptor) {
        let table_name = table.name.clone();
        self.tables.insert(table_name, table);
    }

    /// 指定されたテーブルが存在するか確認
    pub fn has_table(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }

    /// 指定されたテーブルを取得
    pub fn get_table(&self, table_name: &str) -> Option<&TableDescriptor> {
        self.tables.get(table_name)
    }

    /// テーブル数を取得
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// テーブル記述子
///
/// カラムはリストで保持します。名前の重複は比較時に検出されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// テーブル名（スキーマファイルではマップのキーから補完）
    #[serde(default)]
    pub name: String,

    /// カラム記述子のリスト
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// 新しいテーブルを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// カラムを追加
    pub fn add_column(&mut self, column: ColumnDescriptor) {
        self.columns.push(column);
    }

    /// カラムを追加（ビルダー形式）
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.add_column(column);
        self
    }

    /// 指定されたカラムを取得
    pub fn get_column(&self, column_name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == column_name)
    }

    /// カラム名の集合
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// カラム記述子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// カラム名
    pub name: String,

    /// カラム型
    #[serde(rename = "type")]
    pub column_type: TypeDescriptor,

    /// NULL許可フラグ（省略時はtrue）
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// プライマリキー構成カラムかどうか
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,

    /// 外部キーの参照先
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyTarget>,
}

impl ColumnDescriptor {
    /// 新しいカラムを作成
    pub fn new(name: impl Into<String>, column_type: TypeDescriptor, nullable: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable,
            primary_key: false,
            foreign_key: None,
        }
    }

    /// プライマリキーとしてマーク
    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// 外部キー参照を設定
    pub fn with_foreign_key(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKeyTarget {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// 外部キー参照を持つかどうか
    pub fn has_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

fn default_nullable() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// 外部キーの参照先
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyTarget {
    /// 参照先テーブル
    pub table: String,
    /// 参照先カラム
    pub column: String,
}

/// 型記述子
///
/// 型名（宣言側の抽象型名、またはデータベースのネイティブ型名）と
/// 型修飾子・列挙値を保持します。型名の解釈は `adapters::type_mapping` が行います。
///
/// スキーマファイルでは `"numeric(10, 2)"` のような短縮表記と、
/// `{ kind, params | length | precision | scale, values }` のマップ表記の両方を受け付けます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypeDescriptorRepr")]
pub struct TypeDescriptor {
    /// 型名（例: "Text", "character varying", "int8"）
    pub kind: String,

    /// 型修飾子（例: VARCHAR(255) -> [255], NUMERIC(10,2) -> [10, 2]）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<u32>,

    /// 列挙値（列挙型のみ）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl TypeDescriptor {
    /// パラメータなしの型を作成
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Vec::new(),
            values: Vec::new(),
        }
    }

    /// 型修飾子付きの型を作成
    pub fn with_params(kind: impl Into<String>, params: Vec<u32>) -> Self {
        Self {
            kind: kind.into(),
            params,
            values: Vec::new(),
        }
    }

    /// 列挙型を作成
    pub fn enumeration<I, S>(kind: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            params: Vec::new(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// 正規化された型名（小文字化、連続空白の畳み込み）
    pub fn normalized_kind(&self) -> String {
        normalize_type_name(&self.kind)
    }

    /// 列挙値の集合（順序は無視）
    pub fn value_set(&self) -> BTreeSet<&str> {
        self.values.iter().map(String::as_str).collect()
    }

    /// 型名の表記揺れを除いて完全に一致するかどうか
    pub fn is_identical(&self, other: &Self) -> bool {
        self.normalized_kind() == other.normalized_kind()
            && self.params == other.params
            && self.value_set() == other.value_set()
    }
}

/// 型名を正規化
///
/// 小文字化し、前後の空白を除去し、連続する空白を1つにまとめます。
pub fn normalize_type_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.values.is_empty() {
            let quoted: Vec<String> = self.values.iter().map(|v| format!("'{}'", v)).collect();
            write!(f, "({})", quoted.join(", "))?;
        } else if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(u32::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = SchemaFileError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| SchemaFileError::InvalidType {
            input: input.to_string(),
            message,
        };

        let regex = TYPE_STRING_REGEX
            .as_ref()
            .map_err(|e| invalid(e.to_string()))?;
        let captures = regex
            .captures(input)
            .ok_or_else(|| invalid("unbalanced parentheses".to_string()))?;

        let head = captures.name("head").map_or("", |m| m.as_str());
        let tail = captures.name("tail").map_or("", |m| m.as_str());
        // 配列の添字は型名に直結する（例: "numeric(10,2)[]" -> "numeric[]"）
        let separator = if tail.trim_start().starts_with('[') { "" } else { " " };
        let kind = format!("{}{}{}", head.trim_end(), separator, tail.trim_start())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if kind.is_empty() {
            return Err(invalid("missing type name".to_string()));
        }

        let mut descriptor = TypeDescriptor::new(kind);
        if let Some(args) = captures.name("args") {
            let args: Vec<&str> = split_type_args(args.as_str());
            if args.iter().all(|a| is_quoted(a)) {
                descriptor.values = args
                    .iter()
                    .map(|a| a[1..a.len() - 1].replace("''", "'"))
                    .collect();
            } else {
                descriptor.params = args
                    .iter()
                    .map(|a| {
                        a.parse::<u32>()
                            .map_err(|_| invalid(format!("'{}' is not a type modifier", a)))
                    })
                    .collect::<Result<_, _>>()?;
            }
        }

        Ok(descriptor)
    }
}

/// 型引数をカンマで分割（引用符内のカンマは区切りとみなさない）
fn split_type_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    for (i, c) in args.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn is_quoted(arg: &str) -> bool {
    arg.len() >= 2 && arg.starts_with('\'') && arg.ends_with('\'')
}

/// 型記述子のファイル上の表現
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeDescriptorRepr {
    /// 短縮表記（例: "character varying(255)"）
    Shorthand(String),
    /// マップ表記
    Full {
        kind: String,
        #[serde(default)]
        params: Vec<u32>,
        #[serde(default)]
        length: Option<u32>,
        #[serde(default)]
        precision: Option<u32>,
        #[serde(default)]
        scale: Option<u32>,
        #[serde(default)]
        values: Vec<String>,
    },
}

impl TryFrom<TypeDescriptorRepr> for TypeDescriptor {
    type Error = SchemaFileError;

    fn try_from(repr: TypeDescriptorRepr) -> Result<Self, Self::Error> {
        match repr {
            TypeDescriptorRepr::Shorthand(input) => input.parse(),
            TypeDescriptorRepr::Full {
                kind,
                params,
                length,
                precision,
                scale,
                values,
            } => {
                let params = match (params.is_empty(), length, precision, scale) {
                    (false, None, None, None) => params,
                    (true, Some(length), None, None) => vec![length],
                    (true, None, Some(precision), None) => vec![precision],
                    (true, None, Some(precision), Some(scale)) => vec![precision, scale],
                    (true, None, None, None) => Vec::new(),
                    _ => {
                        return Err(SchemaFileError::InvalidType {
                            input: kind,
                            message: "use either 'params', 'length' or 'precision'/'scale'"
                                .to_string(),
                        })
                    }
                };
                Ok(TypeDescriptor {
                    kind,
                    params,
                    values,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_add_table() {
        let mut schema = SchemaDescriptor::new();
        schema.add_table(TableDescriptor::new("users"));

        assert!(schema.has_table("users"));
        assert_eq!(schema.table_count(), 1);
        assert_eq!(schema.get_table("users").unwrap().name, "users");
    }

    #[test]
    fn test_table_column_lookup() {
        let table = TableDescriptor::new("users")
            .with_column(ColumnDescriptor::new("id", TypeDescriptor::new("Integer"), false))
            .with_column(ColumnDescriptor::new("email", TypeDescriptor::new("Text"), true));

        assert_eq!(table.column_names(), BTreeSet::from(["email", "id"]));
        assert!(table.get_column("email").unwrap().nullable);
        assert!(table.get_column("missing").is_none());
    }

    #[test]
    fn test_column_builders() {
        let column = ColumnDescriptor::new("user_id", TypeDescriptor::new("Integer"), false)
            .with_primary_key()
            .with_foreign_key("users", "id");

        assert!(column.primary_key);
        assert!(column.has_foreign_key());
        assert_eq!(column.foreign_key.unwrap().table, "users");
    }

    #[test]
    fn test_parse_plain_type() {
        let ty: TypeDescriptor = "  Character   Varying ".parse().unwrap();
        assert_eq!(ty.kind, "Character Varying");
        assert_eq!(ty.normalized_kind(), "character varying");
        assert!(ty.params.is_empty());
    }

    #[test]
    fn test_parse_parameterized_type() {
        let ty: TypeDescriptor = "numeric(10, 2)".parse().unwrap();
        assert_eq!(ty.kind, "numeric");
        assert_eq!(ty.params, vec![10, 2]);
    }

    #[test]
    fn test_parse_modifier_in_the_middle() {
        let ty: TypeDescriptor = "timestamp(3) with time zone".parse().unwrap();
        assert_eq!(ty.kind, "timestamp with time zone");
        assert_eq!(ty.params, vec![3]);
    }

    #[test]
    fn test_parse_enum_values() {
        let ty: TypeDescriptor = "enum('a', 'b,c', 'it''s')".parse().unwrap();
        assert_eq!(ty.kind, "enum");
        assert_eq!(ty.values, vec!["a", "b,c", "it's"]);
    }

    #[test]
    fn test_parse_array_keeps_suffix() {
        let ty: TypeDescriptor = "integer[]".parse().unwrap();
        assert_eq!(ty.kind, "integer[]");

        let ty: TypeDescriptor = "numeric(10,2)[]".parse().unwrap();
        assert_eq!(ty.kind, "numeric[]");
        assert_eq!(ty.params, vec![10, 2]);
    }

    #[test]
    fn test_add_column() {
        let mut table = TableDescriptor::new("users");
        table.add_column(ColumnDescriptor::new("id", TypeDescriptor::new("Integer"), false));

        assert_eq!(table.columns.len(), 1);
        assert!(table.get_column("id").is_some());
    }

    #[test]
    fn test_parse_invalid_modifier() {
        let err = "varchar(abc)".parse::<TypeDescriptor>().unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_parse_empty_type() {
        assert!("".parse::<TypeDescriptor>().is_err());
        assert!("(10)".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TypeDescriptor::with_params("numeric", vec![10, 2]).to_string(),
            "numeric(10, 2)"
        );
        assert_eq!(
            TypeDescriptor::enumeration("Enum", ["A", "B"]).to_string(),
            "Enum('A', 'B')"
        );
        assert_eq!(TypeDescriptor::new("Text").to_string(), "Text");
    }

    #[test]
    fn test_is_identical_ignores_case_and_value_order() {
        let a = TypeDescriptor::enumeration("Mood", ["happy", "sad"]);
        let b = TypeDescriptor::enumeration("mood", ["sad", "happy"]);
        assert!(a.is_identical(&b));

        let c = TypeDescriptor::with_params("varchar", vec![10]);
        let d = TypeDescriptor::with_params("varchar", vec![20]);
        assert!(!c.is_identical(&d));
    }

    #[test]
    fn test_deserialize_shorthand_and_full_forms() {
        let json = r#"[
            "varchar(255)",
            {"kind": "numeric", "precision": 12, "scale": 4},
            {"kind": "String", "length": 50},
            {"kind": "Enum", "values": ["A", "B"]},
            {"kind": "bit", "params": [8]}
        ]"#;
        let types: Vec<TypeDescriptor> = serde_json::from_str(json).unwrap();

        assert_eq!(types[0], TypeDescriptor::with_params("varchar", vec![255]));
        assert_eq!(types[1], TypeDescriptor::with_params("numeric", vec![12, 4]));
        assert_eq!(types[2], TypeDescriptor::with_params("String", vec![50]));
        assert_eq!(types[3], TypeDescriptor::enumeration("Enum", ["A", "B"]));
        assert_eq!(types[4], TypeDescriptor::with_params("bit", vec![8]));
    }

    #[test]
    fn test_deserialize_conflicting_params() {
        let json = r#"{"kind": "varchar", "params": [10], "length": 20}"#;
        assert!(serde_json::from_str::<TypeDescriptor>(json).is_err());
    }

    #[test]
    fn test_column_defaults() {
        let json = r#"{"name": "email", "type": "Text"}"#;
        let column: ColumnDescriptor = serde_json::from_str(json).unwrap();

        assert!(column.nullable);
        assert!(!column.primary_key);
        assert!(column.foreign_key.is_none());
    }

    #[test]
    fn test_column_serialization_skips_defaults() {
        let column = ColumnDescriptor::new("email", TypeDescriptor::new("Text"), true);
        let json = serde_json::to_string(&column).unwrap();

        assert!(!json.contains("primary_key"));
        assert!(!json.contains("foreign_key"));
        assert!(!json.contains("params"));
    }
}
