// 型等価性判定サービス
//
// 宣言側の型記述子と反映側の型記述子が、型システムの違いを越えて
// 同じ論理型を表しているかどうかを判定します。

use crate::adapters::type_mapping::TypeMappingService;
use crate::core::config::{ComparisonPolicy, Dialect};
use crate::core::schema::TypeDescriptor;
use crate::core::type_kind::CanonicalKind;

/// 型比較の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeVerdict {
    /// 同じ論理型
    Equivalent,
    /// 異なる論理型
    Different,
    /// 同義語テーブルにない型名を含むため不一致とみなす
    UnknownKind(Vec<String>),
}

impl TypeVerdict {
    /// 等価と判定されたかどうか
    pub fn is_equivalent(&self) -> bool {
        matches!(self, TypeVerdict::Equivalent)
    }
}

/// 型等価性判定サービス
#[derive(Debug)]
pub struct TypeEquivalence {
    mapping: TypeMappingService,
    strict_parameters: bool,
}

impl TypeEquivalence {
    /// 新しいTypeEquivalenceを作成
    pub fn new(mapping: TypeMappingService, policy: &ComparisonPolicy) -> Self {
        Self {
            mapping,
            strict_parameters: policy.strict_parameters,
        }
    }

    /// 2つの型記述子を比較
    ///
    /// 判定は引数の順序に依存しません。
    pub fn compare(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> TypeVerdict {
        if a.is_identical(b) {
            return TypeVerdict::Equivalent;
        }

        let (kind_a, kind_b) = match (self.mapping.canonical_kind(a), self.mapping.canonical_kind(b))
        {
            (Some(kind_a), Some(kind_b)) => (kind_a, kind_b),
            (kind_a, kind_b) => {
                let unknown = [(a, kind_a), (b, kind_b)]
                    .into_iter()
                    .filter(|(_, kind)| kind.is_none())
                    .map(|(descriptor, _)| descriptor.normalized_kind())
                    .collect();
                return TypeVerdict::UnknownKind(unknown);
            }
        };

        if kind_a != kind_b {
            return TypeVerdict::Different;
        }

        if kind_a == CanonicalKind::Enum && a.value_set() != b.value_set() {
            return TypeVerdict::Different;
        }

        if self.strict_parameters
            && kind_a.is_parameterized()
            && !a.params.is_empty()
            && !b.params.is_empty()
            && effective_params(kind_a, &a.params) != effective_params(kind_a, &b.params)
        {
            return TypeVerdict::Different;
        }

        TypeVerdict::Equivalent
    }

    /// 2つの型記述子が同じ論理型かどうか
    pub fn is_same_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        self.compare(a, b).is_equivalent()
    }
}

/// 比較に使うパラメータ（NUMERIC(p) は NUMERIC(p, 0) と同じ）
fn effective_params(kind: CanonicalKind, params: &[u32]) -> Vec<u32> {
    match (kind, params) {
        (CanonicalKind::Numeric, [precision]) => vec![*precision, 0],
        _ => params.to_vec(),
    }
}

impl Default for TypeEquivalence {
    /// PostgreSQL方言・パラメータ非厳密の判定器
    fn default() -> Self {
        Self::new(
            TypeMappingService::new(Dialect::PostgreSQL),
            &ComparisonPolicy::default(),
        )
    }
}

/// 2つの型記述子が同じ論理型かどうか（PostgreSQL方言・デフォルトポリシー）
pub fn is_same_type(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    TypeEquivalence::default().is_same_type(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(kind: &str) -> TypeDescriptor {
        TypeDescriptor::new(kind)
    }

    #[test]
    fn test_abstract_and_native_synonyms() {
        let pairs = [
            ("Boolean", "BOOLEAN"),
            ("Text", "VARCHAR"),
            ("SmallInteger", "SMALLINT"),
            ("BigInteger", "BIGINT"),
            ("DateTime", "TIMESTAMP"),
            ("Float", "FLOAT"),
            ("Float", "DOUBLE_PRECISION"),
            ("Integer", "INTEGER"),
            ("Time", "TIME"),
            ("Numeric", "NUMERIC"),
        ];
        let equivalence = TypeEquivalence::default();
        for (declared, reflected) in pairs {
            let reflected = reflected.replace('_', " ");
            assert!(
                equivalence.is_same_type(&ty(declared), &ty(&reflected)),
                "{} vs {}",
                declared,
                reflected
            );
        }
    }

    #[test]
    fn test_different_kinds() {
        assert!(!is_same_type(&ty("Text"), &ty("integer")));
        assert!(!is_same_type(&ty("SmallInteger"), &ty("bigint")));
        assert!(!is_same_type(&ty("Date"), &ty("timestamp")));
    }

    #[test]
    fn test_enum_value_sets() {
        let ab = TypeDescriptor::enumeration("Enum", ["A", "B"]);
        let ba = TypeDescriptor::enumeration("enum", ["B", "A"]);
        let cb = TypeDescriptor::enumeration("Enum", ["C", "B"]);
        let abc = TypeDescriptor::enumeration("enum", ["A", "B", "C"]);

        assert!(is_same_type(&ab, &ba));
        assert!(!is_same_type(&ab, &cb));
        assert!(!is_same_type(&ab, &abc));
    }

    #[test]
    fn test_named_enum_matches_by_values() {
        let declared = TypeDescriptor::enumeration("Enum", ["happy", "sad"]);
        let reflected = TypeDescriptor::enumeration("mood", ["sad", "happy"]);
        let other = TypeDescriptor::enumeration("mood", ["happy", "angry"]);

        assert!(is_same_type(&declared, &reflected));
        assert!(!is_same_type(&declared, &other));
        assert!(!is_same_type(&reflected, &ty("Text")));
    }

    #[test]
    fn test_enum_values_compared_even_when_permissive() {
        let equivalence = TypeEquivalence::default();
        let a = TypeDescriptor::enumeration("Enum", ["A"]);
        let b = TypeDescriptor::enumeration("enum", ["B"]);
        assert_eq!(equivalence.compare(&a, &b), TypeVerdict::Different);
    }

    #[test]
    fn test_parameters_ignored_by_default() {
        let a = TypeDescriptor::with_params("varchar", vec![10]);
        let b = TypeDescriptor::with_params("character varying", vec![255]);
        assert!(is_same_type(&a, &b));

        let a = TypeDescriptor::with_params("Numeric", vec![10, 2]);
        let b = TypeDescriptor::with_params("numeric", vec![12, 4]);
        assert!(is_same_type(&a, &b));
    }

    #[test]
    fn test_parameters_compared_when_strict() {
        let strict = TypeEquivalence::new(
            TypeMappingService::new(Dialect::PostgreSQL),
            &ComparisonPolicy::strict(),
        );

        let a = TypeDescriptor::with_params("varchar", vec![10]);
        let b = TypeDescriptor::with_params("character varying", vec![255]);
        assert_eq!(strict.compare(&a, &b), TypeVerdict::Different);

        let c = TypeDescriptor::with_params("String", vec![255]);
        assert!(strict.is_same_type(&b, &c));

        // 片側にしか修飾子がない場合は比較しない
        assert!(strict.is_same_type(&ty("Text"), &b));

        // スケール省略は0
        let n10 = TypeDescriptor::with_params("numeric", vec![10]);
        let n10_0 = TypeDescriptor::with_params("Numeric", vec![10, 0]);
        let n10_2 = TypeDescriptor::with_params("decimal", vec![10, 2]);
        assert!(strict.is_same_type(&n10, &n10_0));
        assert!(!strict.is_same_type(&n10, &n10_2));

        // パラメータ付きでないカテゴリの修飾子は無視
        let ts3 = TypeDescriptor::with_params("timestamp", vec![3]);
        let ts6 = TypeDescriptor::with_params("timestamp", vec![6]);
        assert!(strict.is_same_type(&ts3, &ts6));
    }

    #[test]
    fn test_unknown_kinds_fail_closed() {
        let equivalence = TypeEquivalence::default();

        assert_eq!(
            equivalence.compare(&ty("tsvector"), &ty("Text")),
            TypeVerdict::UnknownKind(vec!["tsvector".to_string()])
        );
        assert_eq!(
            equivalence.compare(&ty("tsvector"), &ty("ltree")),
            TypeVerdict::UnknownKind(vec!["tsvector".to_string(), "ltree".to_string()])
        );
        assert!(!equivalence.is_same_type(&ty("Text"), &ty("tsvector")));
    }

    #[test]
    fn test_identical_unknown_kinds_are_equivalent() {
        assert!(is_same_type(&ty("tsvector"), &ty("TSVECTOR")));
        assert!(!is_same_type(
            &TypeDescriptor::with_params("bit", vec![8]),
            &TypeDescriptor::with_params("bit", vec![16])
        ));
    }

    #[test]
    fn test_symmetry() {
        let samples = vec![
            ty("Text"),
            ty("varchar"),
            ty("Integer"),
            ty("int8"),
            ty("tsvector"),
            TypeDescriptor::with_params("varchar", vec![10]),
            TypeDescriptor::with_params("numeric", vec![10, 2]),
            TypeDescriptor::enumeration("Enum", ["A", "B"]),
            TypeDescriptor::enumeration("enum", ["B", "C"]),
        ];
        let permissive = TypeEquivalence::default();
        let strict = TypeEquivalence::new(
            TypeMappingService::new(Dialect::PostgreSQL),
            &ComparisonPolicy::strict(),
        );

        for a in &samples {
            for b in &samples {
                assert_eq!(permissive.is_same_type(a, b), permissive.is_same_type(b, a));
                assert_eq!(strict.is_same_type(a, b), strict.is_same_type(b, a));
            }
        }
    }

    #[test]
    fn test_dialect_specific_equivalence() {
        let mysql = TypeEquivalence::new(
            TypeMappingService::new(Dialect::MySQL),
            &ComparisonPolicy::default(),
        );
        assert!(mysql.is_same_type(&ty("Text"), &ty("longtext")));
        assert!(mysql.is_same_type(&ty("DateTime"), &ty("datetime")));
        assert!(!mysql.is_same_type(&ty("LargeBinary"), &ty("bytea")));

        let unsigned: TypeDescriptor = "int(10) unsigned".parse().unwrap();
        assert!(mysql.is_same_type(&ty("Integer"), &unsigned));
        assert!(mysql.is_same_type(&ty("BigInteger"), &ty("bigint unsigned")));
        assert!(!mysql.is_same_type(&ty("BigInteger"), &unsigned));
    }
}
