// Services Layer
// スキーマ比較、型等価性判定、スキーマ・設定ファイルの読み込み

pub mod config_loader;
pub mod schema_comparator;
pub mod schema_parser;
pub mod traits;
pub mod type_equivalence;
