// 命名ポリシー
//
// アプリケーション名と関連パスの単一ソースを提供します。

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".pg-check.yaml";

/// バイナリ名
pub const BINARY_NAME: &str = "pg-check";
