// loadコマンドハンドラー
//
// クリーニング済みテーブルをデータベースへ投入し、系譜を記録します。
// - 環境設定からの接続プール作成
// - テーブル単位の進捗表示（端末でない場合は非表示）

use crate::adapters::database::DatabaseConnectionService;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::finish_stage;
use crate::services::loader::LoaderService;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

const PROGRESS_TEMPLATE: &str = "{msg:>20} [{bar:40.cyan/blue}] {pos}/{len} rows";

/// loadコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct LoadCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 環境名
    pub env: String,
}

/// loadコマンドハンドラー
#[derive(Debug, Clone)]
pub struct LoadCommandHandler {}

impl LoadCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// loadコマンドを実行
    pub async fn execute(&self, command: &LoadCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;
        let dialect = context.config.dialect;
        let cleaned_dir = context.require_dir(context.cleaned_dir(), "Cleaned")?;

        let db_config = context.database_config(&command.env)?;
        let db_service = DatabaseConnectionService::new();
        let pool = db_service
            .create_pool(dialect, &db_config)
            .await
            .with_context(|| "Failed to connect to database")?;

        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .with_context(|| "Invalid progress bar template")?
                .progress_chars("=> "),
        );

        let loader = LoaderService::new(dialect, cleaned_dir);
        let result = loader.run(&pool, &progress).await;
        db_service.close_pool(pool).await;

        let report = result.with_context(|| "Failed to load cleaned tables")?;
        finish_stage("load", "loaded", &report)
    }
}

impl Default for LoadCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
