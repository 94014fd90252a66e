// 系譜（lineage）レコード
//
// ロード1回ごとに系譜テーブルへ追記される統計値を表現します。

use crate::core::naming;

/// 系譜レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageRecord {
    /// 元ファイル名（例: users.parquet）
    pub source_file: String,
    /// 総行数（保存行数 + 検証エラー行数）
    pub total_rows: i64,
    /// 保存行数
    pub processed_rows: i64,
    /// いずれかの *_issue が設定された行数
    pub errors: i64,
    /// 備考
    pub notes: String,
}

impl LineageRecord {
    /// 保存行数とエラー行数から系譜レコードを作成
    pub fn new(source_file: impl Into<String>, processed_rows: usize, errors: usize) -> Self {
        let processed_rows = processed_rows as i64;
        let errors = errors as i64;
        Self {
            source_file: source_file.into(),
            total_rows: processed_rows + errors,
            processed_rows,
            errors,
            notes: naming::LINEAGE_NOTE.to_string(),
        }
    }
}
