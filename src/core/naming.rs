// 命名ポリシー
//
// アプリケーション名とパイプライン全体で共有する命名規約の単一ソースを提供します。
// エンティティ名 ↔ ファイル名 ↔ テーブル名 の対応はすべてここを経由します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "bankflow";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".bankflow.yaml";

/// 列指向テーブルファイルの拡張子
pub const TABLE_FILE_EXTENSION: &str = "parquet";

/// デコード時に付与する系譜（lineage）カラム名
pub const SOURCE_FILE_COLUMN: &str = "source_file";

/// 検証失敗を示すカラムの接尾辞
pub const ISSUE_SUFFIX: &str = "_issue";

/// 形式不正を示す検証ラベル
pub const BAD_FORMAT_LABEL: &str = "bad_format";

/// 系譜テーブル名
pub const LINEAGE_TABLE: &str = "retrieveinfo";

/// 系譜レコードの備考
pub const LINEAGE_NOTE: &str = "loaded by bankflow load";

/// テーブル名からファイル名を組み立てる（users -> users.parquet）
pub fn table_file_name(table: &str) -> String {
    format!("{}.{}", table, TABLE_FILE_EXTENSION)
}

/// カラム名から検証カラム名を組み立てる（email -> email_issue）
pub fn issue_column_name(column: &str) -> String {
    format!("{}{}", column, ISSUE_SUFFIX)
}

/// 検証カラムかどうか
pub fn is_issue_column(column: &str) -> bool {
    column.ends_with(ISSUE_SUFFIX)
}
