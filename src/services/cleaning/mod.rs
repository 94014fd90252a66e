// クリーニングステージ
//
// デコード済みテーブルをエンティティごとに正規化し、クリーニング済み領域へ書き出します。
// - エンティティ → 正規化関数 のディスパッチ（閉じた列挙型へのmatch）
// - 入力が無いエンティティは警告してスキップ
// - 1エンティティの失敗は記録して次へ進む

pub mod coercion;
pub mod normalizers;
pub mod table_edit;

pub use normalizers::{
    normalize_cards, normalize_transactions, normalize_users, passthrough, BLOCKED_CANDIDATES,
    VIP_THRESHOLD,
};

use crate::adapters::table_store;
use crate::core::entity::Entity;
use crate::core::error::{CleaningError, IoError};
use crate::services::stage_report::{StageReport, TableReport};
use crate::services::issue_stats::issue_row_count;
use arrow::record_batch::RecordBatch;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// エンティティに対応する正規化を適用
pub fn normalize(entity: Entity, table: &RecordBatch) -> Result<RecordBatch, CleaningError> {
    match entity {
        Entity::Users => normalize_users(table),
        Entity::Cards => normalize_cards(table),
        Entity::Transactions => normalize_transactions(table),
        Entity::Logs | Entity::Reports | Entity::ScheduledPayments => passthrough(table),
    }
}

/// クリーニングステージの実行サービス
#[derive(Debug, Clone)]
pub struct CleaningService {
    decoded_dir: PathBuf,
    cleaned_dir: PathBuf,
}

impl CleaningService {
    pub fn new(decoded_dir: impl Into<PathBuf>, cleaned_dir: impl Into<PathBuf>) -> Self {
        Self {
            decoded_dir: decoded_dir.into(),
            cleaned_dir: cleaned_dir.into(),
        }
    }

    /// 全エンティティを順に処理
    ///
    /// 入力ディレクトリ自体が無い場合は、どのエンティティにも触れずに失敗します。
    pub fn run(&self) -> Result<StageReport, IoError> {
        if !self.decoded_dir.is_dir() {
            return Err(IoError::FileNotFound {
                path: self.decoded_dir.display().to_string(),
            });
        }
        table_store::ensure_dir(&self.cleaned_dir)?;

        let mut report = StageReport::new();
        for entity in Entity::ALL {
            report.push(self.clean_entity(entity));
        }
        Ok(report)
    }

    /// 1エンティティを処理
    pub fn clean_entity(&self, entity: Entity) -> TableReport {
        let source = self.decoded_dir.join(entity.file_name());
        let target = self.cleaned_dir.join(entity.file_name());

        let raw = match table_store::read_table(&source) {
            Ok(table) => table,
            Err(e) if e.is_missing_input() => {
                warn!(%entity, path = %source.display(), "decoded table not found, skipping");
                return TableReport::skipped(entity.name(), format!("{} not found", entity.file_name()));
            }
            Err(e) => {
                warn!(%entity, error = %e, "failed to read decoded table");
                return TableReport::failed(entity.name(), e.to_string());
            }
        };
        debug!(%entity, rows = raw.num_rows(), columns = raw.num_columns(), "normalizing");

        match self.normalize_and_write(entity, &raw, &target) {
            Ok(cleaned) => {
                let issues = issue_row_count(&cleaned);
                info!(%entity, rows = cleaned.num_rows(), issues, path = %target.display(), "cleaned");
                TableReport::processed(
                    entity.name(),
                    target.display().to_string(),
                    cleaned.num_rows(),
                    issues,
                )
            }
            Err(e) => {
                warn!(%entity, error = %e, "failed to clean table");
                TableReport::failed(entity.name(), e.to_string())
            }
        }
    }

    fn normalize_and_write(
        &self,
        entity: Entity,
        raw: &RecordBatch,
        target: &Path,
    ) -> anyhow::Result<RecordBatch> {
        let cleaned = normalize(entity, raw)?;
        table_store::write_table(target, &cleaned)?;
        Ok(cleaned)
    }
}
