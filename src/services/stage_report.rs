// ステージ実行結果
//
// 各ステージはエンティティ（テーブル）ごとに結果を1件ずつ記録し、
// 1件の失敗や欠損でループ全体を止めずに最後まで処理します。

/// 1テーブル分の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// 処理済み
    Processed {
        /// 出力先（ファイルパスまたはテーブル名）
        output: String,
        /// 出力行数
        rows: usize,
        /// 検証エラー行数
        errors: usize,
    },
    /// 入力が無いためスキップ
    Skipped {
        /// スキップ理由
        reason: String,
    },
    /// 処理失敗
    Failed {
        /// エラーメッセージ
        error: String,
    },
}

/// テーブル名付きの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub outcome: TableOutcome,
}

impl TableReport {
    pub fn processed(table: impl Into<String>, output: impl Into<String>, rows: usize, errors: usize) -> Self {
        Self {
            table: table.into(),
            outcome: TableOutcome::Processed {
                output: output.into(),
                rows,
                errors,
            },
        }
    }

    pub fn skipped(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            outcome: TableOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(table: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            outcome: TableOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.outcome, TableOutcome::Processed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, TableOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TableOutcome::Failed { .. })
    }
}

/// ステージ全体の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub tables: Vec<TableReport>,
}

impl StageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: TableReport) {
        self.tables.push(report);
    }

    pub fn processed_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_processed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_failed()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// 指定テーブルの結果を取得
    pub fn get(&self, table: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }
}
