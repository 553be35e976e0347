// Adapters
// データベース方言ごとの型名の扱いを抽象化

pub mod type_mapping;
