// pg-checkライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメインモデル（スキーマ記述子、ミスマッチレポート、設定、エラー）
// - adapters: データベース方言ごとの型同義語テーブル
// - services: 型等価性判定、スキーマ比較、ファイル読み込み

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;

pub use services::schema_comparator::{compare_schema, compare_table, SchemaComparator};
pub use services::type_equivalence::{is_same_type, TypeEquivalence};
