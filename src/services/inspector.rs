// 検査ユーティリティ
//
// - peek: クリーニング済みファイルのカラム名を一覧（スキーマのみ読む）
// - verify: ロード先テーブルのカラム集合とクリーニング済みファイルのカラム集合を比較

use crate::adapters::database_introspector::DatabaseIntrospector;
use crate::adapters::table_store;
use crate::core::naming::table_file_name;
use anyhow::{Context, Result};
use sqlx::AnyPool;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 1ファイル分のカラム一覧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileColumns {
    /// ファイル名（例: users.parquet）
    pub file_name: String,
    /// カラム名（定義順）
    pub columns: Vec<String>,
}

/// クリーニング済みファイルのカラムをファイル名順に取得
pub fn peek(cleaned_dir: &Path) -> Result<Vec<FileColumns>> {
    let files = table_store::list_table_files(cleaned_dir)
        .with_context(|| format!("Failed to list cleaned tables in {:?}", cleaned_dir))?;

    let mut result = Vec::with_capacity(files.len());
    for path in &files {
        let schema = table_store::read_schema(path)
            .with_context(|| format!("Failed to read schema of {:?}", path))?;
        result.push(FileColumns {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            columns: schema.fields().iter().map(|f| f.name().clone()).collect(),
        });
    }
    Ok(result)
}

/// テーブル単位の比較結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// カラム集合が一致
    Match,
    /// 片方にしか無いカラム（対称差）
    Mismatch(BTreeSet<String>),
    /// 対応するファイルが無い
    NoFile,
}

/// テーブル名付きの比較結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableVerification {
    pub table: String,
    pub outcome: VerifyOutcome,
}

/// ロード先とクリーニング済みファイルを比較するサービス
pub struct VerifyService {
    cleaned_dir: PathBuf,
    introspector: Box<dyn DatabaseIntrospector>,
}

impl VerifyService {
    pub fn new(cleaned_dir: impl Into<PathBuf>, introspector: Box<dyn DatabaseIntrospector>) -> Self {
        Self {
            cleaned_dir: cleaned_dir.into(),
            introspector,
        }
    }

    /// ストア内の全テーブルを名前順に比較
    pub async fn verify(&self, pool: &AnyPool) -> Result<Vec<TableVerification>> {
        let tables = self
            .introspector
            .get_table_names(pool)
            .await
            .with_context(|| "Failed to list tables in the store")?;

        let mut results = Vec::with_capacity(tables.len());
        for table in tables {
            let outcome = self.verify_table(pool, &table).await?;
            debug!(table = %table, ?outcome, "verified");
            results.push(TableVerification { table, outcome });
        }
        Ok(results)
    }

    async fn verify_table(&self, pool: &AnyPool, table: &str) -> Result<VerifyOutcome> {
        let path = self.cleaned_dir.join(table_file_name(table));
        if !path.exists() {
            return Ok(VerifyOutcome::NoFile);
        }

        let db_columns: BTreeSet<String> = self
            .introspector
            .get_column_names(pool, table)
            .await
            .with_context(|| format!("Failed to read columns of table '{}'", table))?
            .into_iter()
            .collect();
        let file_columns: BTreeSet<String> = table_store::read_schema(&path)
            .with_context(|| format!("Failed to read schema of {:?}", path))?
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        Ok(compare_columns(&db_columns, &file_columns))
    }
}

/// 2つのカラム集合を比較
pub fn compare_columns(left: &BTreeSet<String>, right: &BTreeSet<String>) -> VerifyOutcome {
    let difference: BTreeSet<String> = left.symmetric_difference(right).cloned().collect();
    if difference.is_empty() {
        VerifyOutcome::Match
    } else {
        VerifyOutcome::Mismatch(difference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_columns_match_ignores_order() {
        assert_eq!(
            compare_columns(&set(&["id", "email"]), &set(&["email", "id"])),
            VerifyOutcome::Match
        );
    }

    #[test]
    fn test_compare_columns_symmetric_difference() {
        assert_eq!(
            compare_columns(&set(&["id", "legacy"]), &set(&["id", "email_issue"])),
            VerifyOutcome::Mismatch(set(&["email_issue", "legacy"]))
        );
    }
}
