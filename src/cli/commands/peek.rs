// peekコマンドハンドラー
//
// クリーニング済みファイルごとにカラム名を表示します。

use crate::cli::command_context::CommandContext;
use crate::services::inspector::{peek, FileColumns};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// peekコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct PeekCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
}

/// peekコマンドハンドラー
#[derive(Debug, Clone)]
pub struct PeekCommandHandler {}

impl PeekCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// peekコマンドを実行
    pub fn execute(&self, command: &PeekCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;
        let cleaned_dir = context.require_dir(context.cleaned_dir(), "Cleaned")?;

        let files = peek(&cleaned_dir)?;
        if files.is_empty() {
            return Ok(format!("No cleaned tables in {}", cleaned_dir.display()));
        }
        Ok(self.format_columns(&files))
    }

    fn format_columns(&self, files: &[FileColumns]) -> String {
        files
            .iter()
            .map(|file| format!("{}: {}", file.file_name.bold(), file.columns.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PeekCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
