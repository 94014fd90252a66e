// cleanコマンドハンドラー
//
// デコード済みテーブルをエンティティごとに正規化し、結果を表示します。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::finish_stage;
use crate::services::cleaning::CleaningService;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// cleanコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct CleanCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
}

/// cleanコマンドハンドラー
#[derive(Debug, Clone)]
pub struct CleanCommandHandler {}

impl CleanCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// cleanコマンドを実行
    pub fn execute(&self, command: &CleanCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;
        let decoded_dir = context.require_dir(context.decoded_dir(), "Decoded")?;

        let service = CleaningService::new(decoded_dir, context.cleaned_dir());
        let report = service
            .run()
            .with_context(|| "Failed to clean decoded tables")?;

        finish_stage("clean", "cleaned", &report)
    }
}

impl Default for CleanCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_decoded_dir_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let handler = CleanCommandHandler::new();
        let command = CleanCommand {
            project_path: temp_dir.path().to_path_buf(),
            config_path: None,
        };

        let error = handler.execute(&command).unwrap_err();
        assert!(error.to_string().contains("Decoded directory not found"));
        assert!(!temp_dir.path().join("data/cleaned").exists());
    }
}
