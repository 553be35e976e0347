// Core Domain
// スキーマ記述子、型カテゴリ、ミスマッチレポートの純粋なドメインモデル

pub mod config;
pub mod error;
pub mod mismatch;
pub mod naming;
pub mod schema;
pub mod type_kind;
