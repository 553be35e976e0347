// 正規型カテゴリ
//
// 宣言側の抽象型と、データベースから取得したネイティブ型の両方を
// 対応付けるための閉じた型カテゴリ列挙を提供します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 正規型カテゴリ
///
/// 抽象型（ORMレベル）とネイティブ型（データベース方言）のどちらも
/// このいずれかに写像されます。写像は `adapters::type_mapping` のテーブルで定義します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKind {
    /// 真偽値型
    Boolean,
    /// 16ビット整数型
    SmallInteger,
    /// 32ビット整数型
    Integer,
    /// 64ビット整数型
    BigInteger,
    /// 浮動小数点型（単精度・倍精度の両方を含む）
    Float,
    /// 固定小数点数型 (precision, scale)
    Numeric,
    /// 可変長文字列型 (length)
    Text,
    /// 固定長文字列型 (length)
    Char,
    /// 日付型
    Date,
    /// 時刻型（タイムゾーン有無を問わない）
    Time,
    /// タイムスタンプ型（タイムゾーン有無を問わない）
    Timestamp,
    /// 時間間隔型
    Interval,
    /// バイナリ型
    Binary,
    /// JSON型 (JSON, JSONB)
    Json,
    /// UUID型
    Uuid,
    /// 列挙型 (values)
    Enum,
}

impl CanonicalKind {
    /// 全カテゴリ
    pub const ALL: [CanonicalKind; 16] = [
        CanonicalKind::Boolean,
        CanonicalKind::SmallInteger,
        CanonicalKind::Integer,
        CanonicalKind::BigInteger,
        CanonicalKind::Float,
        CanonicalKind::Numeric,
        CanonicalKind::Text,
        CanonicalKind::Char,
        CanonicalKind::Date,
        CanonicalKind::Time,
        CanonicalKind::Timestamp,
        CanonicalKind::Interval,
        CanonicalKind::Binary,
        CanonicalKind::Json,
        CanonicalKind::Uuid,
        CanonicalKind::Enum,
    ];

    /// カテゴリ名（設定ファイルで使用する表記）
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalKind::Boolean => "boolean",
            CanonicalKind::SmallInteger => "small_integer",
            CanonicalKind::Integer => "integer",
            CanonicalKind::BigInteger => "big_integer",
            CanonicalKind::Float => "float",
            CanonicalKind::Numeric => "numeric",
            CanonicalKind::Text => "text",
            CanonicalKind::Char => "char",
            CanonicalKind::Date => "date",
            CanonicalKind::Time => "time",
            CanonicalKind::Timestamp => "timestamp",
            CanonicalKind::Interval => "interval",
            CanonicalKind::Binary => "binary",
            CanonicalKind::Json => "json",
            CanonicalKind::Uuid => "uuid",
            CanonicalKind::Enum => "enum",
        }
    }

    /// パラメータ（長さ・精度・スケール）を持つカテゴリかどうか
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            CanonicalKind::Numeric | CanonicalKind::Text | CanonicalKind::Char
        )
    }

    /// 数値型かどうか
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CanonicalKind::SmallInteger
                | CanonicalKind::Integer
                | CanonicalKind::BigInteger
                | CanonicalKind::Float
                | CanonicalKind::Numeric
        )
    }
}

impl fmt::Display for CanonicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CanonicalKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Unknown canonical type kind: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrips_every_kind() {
        for kind in CanonicalKind::ALL {
            assert_eq!(kind.as_str().parse::<CanonicalKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            " Big_Integer ".parse::<CanonicalKind>(),
            Ok(CanonicalKind::BigInteger)
        );
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "varbit".parse::<CanonicalKind>().unwrap_err();
        assert!(err.contains("varbit"));
    }

    #[test]
    fn test_is_parameterized() {
        assert!(CanonicalKind::Numeric.is_parameterized());
        assert!(CanonicalKind::Text.is_parameterized());
        assert!(CanonicalKind::Char.is_parameterized());
        assert!(!CanonicalKind::Enum.is_parameterized());
        assert!(!CanonicalKind::Integer.is_parameterized());
    }

    #[test]
    fn test_is_numeric() {
        assert!(CanonicalKind::Integer.is_numeric());
        assert!(CanonicalKind::Numeric.is_numeric());
        assert!(CanonicalKind::Float.is_numeric());
        assert!(!CanonicalKind::Text.is_numeric());
        assert!(!CanonicalKind::Boolean.is_numeric());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&CanonicalKind::SmallInteger).unwrap();
        assert_eq!(json, "\"small_integer\"");
    }
}
