// verifyコマンドハンドラー
//
// ロード先のテーブル定義とクリーニング済みファイルのカラムを突き合わせます。

use crate::adapters::database::DatabaseConnectionService;
use crate::adapters::database_introspector::create_introspector;
use crate::cli::command_context::CommandContext;
use crate::services::inspector::{TableVerification, VerifyOutcome, VerifyService};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// verifyコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct VerifyCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 環境名
    pub env: String,
}

/// verifyコマンドハンドラー
#[derive(Debug, Clone)]
pub struct VerifyCommandHandler {}

impl VerifyCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// verifyコマンドを実行
    pub async fn execute(&self, command: &VerifyCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;
        let dialect = context.config.dialect;

        let db_config = context.database_config(&command.env)?;
        let db_service = DatabaseConnectionService::new();
        let pool = db_service
            .create_pool(dialect, &db_config)
            .await
            .with_context(|| "Failed to connect to database")?;

        let service = VerifyService::new(context.cleaned_dir(), create_introspector(dialect));
        let result = service.verify(&pool).await;
        db_service.close_pool(pool).await;

        Ok(self.format_results(&result?))
    }

    /// 比較結果を1テーブル1行で整形
    pub fn format_results(&self, results: &[TableVerification]) -> String {
        if results.is_empty() {
            return "No tables found in the database".to_string();
        }

        results
            .iter()
            .map(|result| match &result.outcome {
                VerifyOutcome::Match => {
                    format!("{} {}: columns match", "✓".green(), result.table.bold())
                }
                VerifyOutcome::Mismatch(columns) => format!(
                    "{} {}: column mismatch: {}",
                    "✗".red(),
                    result.table.bold(),
                    columns.iter().cloned().collect::<Vec<_>>().join(", ").red()
                ),
                VerifyOutcome::NoFile => format!(
                    "{} {}: no matching parquet file – skipped",
                    "⚠".yellow(),
                    result.table.bold()
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for VerifyCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_format_results() {
        colored::control::set_override(false);
        let handler = VerifyCommandHandler::new();
        let results = vec![
            TableVerification {
                table: "cards".to_string(),
                outcome: VerifyOutcome::Match,
            },
            TableVerification {
                table: "retrieveinfo".to_string(),
                outcome: VerifyOutcome::NoFile,
            },
            TableVerification {
                table: "users".to_string(),
                outcome: VerifyOutcome::Mismatch(BTreeSet::from(["legacy".to_string()])),
            },
        ];

        let output = handler.format_results(&results);
        assert!(output.contains("cards: columns match"));
        assert!(output.contains("retrieveinfo: no matching parquet file – skipped"));
        assert!(output.contains("users: column mismatch: legacy"));
    }
}
