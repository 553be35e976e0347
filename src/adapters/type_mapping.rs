// 型マッピングサービス
//
// 宣言側の抽象型名とデータベース方言のネイティブ型名を、
// 正規型カテゴリ（CanonicalKind）へ写像する同義語テーブルを一元管理します。

use crate::core::config::Dialect;
use crate::core::schema::{normalize_type_name, TypeDescriptor};
use crate::core::type_kind::CanonicalKind;
use serde::Serialize;
use std::collections::BTreeMap;

use CanonicalKind::*;

/// 抽象型（ORMレベル）の同義語テーブル
///
/// 型名は正規化済み（小文字）で保持します。
pub const ABSTRACT_SYNONYMS: &[(&str, CanonicalKind)] = &[
    ("boolean", Boolean),
    ("smallinteger", SmallInteger),
    ("integer", Integer),
    ("biginteger", BigInteger),
    ("float", Float),
    ("double", Float),
    ("numeric", Numeric),
    ("decimal", Numeric),
    ("string", Text),
    ("text", Text),
    ("unicode", Text),
    ("unicodetext", Text),
    ("date", Date),
    ("time", Time),
    ("datetime", Timestamp),
    ("interval", Interval),
    ("largebinary", Binary),
    ("json", Json),
    ("uuid", Uuid),
    ("enum", Enum),
];

/// PostgreSQLのネイティブ型の同義語テーブル
const POSTGRES_SYNONYMS: &[(&str, CanonicalKind)] = &[
    ("boolean", Boolean),
    ("bool", Boolean),
    ("smallint", SmallInteger),
    ("int2", SmallInteger),
    ("smallserial", SmallInteger),
    ("integer", Integer),
    ("int", Integer),
    ("int4", Integer),
    ("serial", Integer),
    ("bigint", BigInteger),
    ("int8", BigInteger),
    ("bigserial", BigInteger),
    ("real", Float),
    ("float4", Float),
    ("double precision", Float),
    ("float8", Float),
    ("float", Float),
    ("numeric", Numeric),
    ("decimal", Numeric),
    ("character varying", Text),
    ("varchar", Text),
    ("text", Text),
    ("character", Char),
    ("char", Char),
    ("bpchar", Char),
    ("date", Date),
    ("time", Time),
    ("time without time zone", Time),
    ("time with time zone", Time),
    ("timetz", Time),
    ("timestamp", Timestamp),
    ("timestamp without time zone", Timestamp),
    ("timestamp with time zone", Timestamp),
    ("timestamptz", Timestamp),
    ("interval", Interval),
    ("bytea", Binary),
    ("json", Json),
    ("jsonb", Json),
    ("uuid", Uuid),
    ("enum", Enum),
];

/// MySQLのネイティブ型の同義語テーブル
const MYSQL_SYNONYMS: &[(&str, CanonicalKind)] = &[
    ("boolean", Boolean),
    ("bool", Boolean),
    ("tinyint", SmallInteger),
    ("smallint", SmallInteger),
    ("mediumint", Integer),
    ("int", Integer),
    ("integer", Integer),
    ("bigint", BigInteger),
    ("float", Float),
    ("real", Float),
    ("double", Float),
    ("double precision", Float),
    ("decimal", Numeric),
    ("numeric", Numeric),
    ("varchar", Text),
    ("tinytext", Text),
    ("text", Text),
    ("mediumtext", Text),
    ("longtext", Text),
    ("char", Char),
    ("date", Date),
    ("time", Time),
    ("datetime", Timestamp),
    ("timestamp", Timestamp),
    ("binary", Binary),
    ("varbinary", Binary),
    ("tinyblob", Binary),
    ("blob", Binary),
    ("mediumblob", Binary),
    ("longblob", Binary),
    ("json", Json),
    ("enum", Enum),
];

/// SQLiteのネイティブ型の同義語テーブル
const SQLITE_SYNONYMS: &[(&str, CanonicalKind)] = &[
    ("boolean", Boolean),
    ("smallint", SmallInteger),
    ("integer", Integer),
    ("int", Integer),
    ("bigint", BigInteger),
    ("real", Float),
    ("float", Float),
    ("double", Float),
    ("numeric", Numeric),
    ("decimal", Numeric),
    ("varchar", Text),
    ("text", Text),
    ("clob", Text),
    ("char", Char),
    ("date", Date),
    ("time", Time),
    ("datetime", Timestamp),
    ("timestamp", Timestamp),
    ("blob", Binary),
    ("json", Json),
];

/// 方言固有の型マッピング
///
/// 各データベース方言のネイティブ型名を正規型カテゴリへ写像するトレイト。
pub trait TypeMapper: Send + Sync {
    /// ネイティブ型の同義語テーブル
    fn native_synonyms(&self) -> &'static [(&'static str, CanonicalKind)];

    /// 正規化済みの型名から正規型カテゴリを取得
    fn canonical_kind(&self, normalized: &str) -> Option<CanonicalKind> {
        lookup(self.native_synonyms(), normalized)
    }
}

/// PostgreSQL用型マッパー
pub struct PostgresTypeMapper;

/// MySQL用型マッパー
pub struct MySqlTypeMapper;

/// SQLite用型マッパー
pub struct SqliteTypeMapper;

impl TypeMapper for PostgresTypeMapper {
    fn native_synonyms(&self) -> &'static [(&'static str, CanonicalKind)] {
        POSTGRES_SYNONYMS
    }
}

/// MySQLの数値型に付く修飾子
const MYSQL_NUMERIC_MODIFIERS: &[&str] = &["signed", "unsigned", "zerofill"];

impl TypeMapper for MySqlTypeMapper {
    fn native_synonyms(&self) -> &'static [(&'static str, CanonicalKind)] {
        MYSQL_SYNONYMS
    }

    /// `int unsigned` や `bigint zerofill` は修飾子を除いた型名で解決する
    fn canonical_kind(&self, normalized: &str) -> Option<CanonicalKind> {
        lookup(MYSQL_SYNONYMS, normalized).or_else(|| {
            let base = normalized
                .split(' ')
                .filter(|word| !MYSQL_NUMERIC_MODIFIERS.contains(word))
                .collect::<Vec<_>>()
                .join(" ");
            if base == normalized {
                return None;
            }
            lookup(MYSQL_SYNONYMS, &base).filter(|kind| kind.is_numeric())
        })
    }
}

impl TypeMapper for SqliteTypeMapper {
    fn native_synonyms(&self) -> &'static [(&'static str, CanonicalKind)] {
        SQLITE_SYNONYMS
    }
}

fn lookup(table: &[(&str, CanonicalKind)], normalized: &str) -> Option<CanonicalKind> {
    table
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, kind)| *kind)
}

/// 同義語の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynonymSource {
    /// 設定ファイルの型エイリアス
    Alias,
    /// 方言のネイティブ型
    Native,
    /// 抽象型
    Abstract,
}

/// 同義語テーブルの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymEntry {
    /// 正規化済みの型名
    pub name: String,
    /// 正規型カテゴリ
    pub kind: CanonicalKind,
    /// 出所
    pub source: SynonymSource,
}

/// 型マッピングサービス
///
/// 型名の解決順序は「型エイリアス → 方言のネイティブ型 → 抽象型」です。
pub struct TypeMappingService {
    dialect: Dialect,
    mapper: Box<dyn TypeMapper>,
    aliases: BTreeMap<String, CanonicalKind>,
}

impl TypeMappingService {
    /// 新しいTypeMappingServiceを作成
    pub fn new(dialect: Dialect) -> Self {
        let mapper: Box<dyn TypeMapper> = match dialect {
            Dialect::PostgreSQL => Box::new(PostgresTypeMapper),
            Dialect::MySQL => Box::new(MySqlTypeMapper),
            Dialect::SQLite => Box::new(SqliteTypeMapper),
        };
        Self {
            dialect,
            mapper,
            aliases: BTreeMap::new(),
        }
    }

    /// 型エイリアスを追加
    pub fn with_aliases(mut self, aliases: BTreeMap<String, CanonicalKind>) -> Self {
        self.aliases.extend(
            aliases
                .into_iter()
                .map(|(name, kind)| (normalize_type_name(&name), kind)),
        );
        self
    }

    /// 方言を取得
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 型名から正規型カテゴリを取得
    ///
    /// 同義語テーブルにない型名の場合はNoneを返します。
    pub fn canonical_kind_of(&self, type_name: &str) -> Option<CanonicalKind> {
        let normalized = normalize_type_name(type_name);
        self.aliases
            .get(&normalized)
            .copied()
            .or_else(|| self.mapper.canonical_kind(&normalized))
            .or_else(|| lookup(ABSTRACT_SYNONYMS, &normalized))
    }

    /// 型記述子から正規型カテゴリを取得
    ///
    /// 列挙値を持つ記述子は、型名に関わらず列挙型とみなします
    /// （PostgreSQLでは列挙型が独自の型名で反映されるため）。
    pub fn canonical_kind(&self, descriptor: &TypeDescriptor) -> Option<CanonicalKind> {
        if !descriptor.values.is_empty() {
            return Some(CanonicalKind::Enum);
        }
        self.canonical_kind_of(&descriptor.kind)
    }

    /// 有効な同義語テーブル全体
    ///
    /// 解決順序で後ろに来る同名エントリは除外されます。
    pub fn synonym_table(&self) -> Vec<SynonymEntry> {
        let mut entries: BTreeMap<String, SynonymEntry> = BTreeMap::new();
        let layers = self
            .aliases
            .iter()
            .map(|(name, kind)| (name.as_str(), *kind, SynonymSource::Alias))
            .chain(
                self.mapper
                    .native_synonyms()
                    .iter()
                    .map(|(name, kind)| (*name, *kind, SynonymSource::Native)),
            )
            .chain(
                ABSTRACT_SYNONYMS
                    .iter()
                    .map(|(name, kind)| (*name, *kind, SynonymSource::Abstract)),
            );

        for (name, kind, source) in layers {
            entries
                .entry(name.to_string())
                .or_insert_with(|| SynonymEntry {
                    name: name.to_string(),
                    kind,
                    source,
                });
        }

        let mut table: Vec<SynonymEntry> = entries.into_values().collect();
        table.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
        table
    }
}

impl std::fmt::Debug for TypeMappingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMappingService")
            .field("dialect", &self.dialect)
            .field("aliases", &self.aliases)
            .finish()
    }
}
