// decodeコマンドハンドラー
//
// カラムマップに従って生CSVをデコードし、テーブルごとの結果を表示します。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::finish_stage;
use crate::services::column_mapper::{load_column_map, ColumnMapperService};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// decodeコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct DecodeCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
}

/// decodeコマンドハンドラー
#[derive(Debug, Clone)]
pub struct DecodeCommandHandler {}

impl DecodeCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// decodeコマンドを実行
    pub fn execute(&self, command: &DecodeCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;

        // カラムマップが無ければ何も処理しない
        let map_path = context.column_map_path();
        if !map_path.exists() {
            return Err(anyhow!("Column map not found: {:?}", map_path));
        }
        let column_map = load_column_map(&map_path)?;

        let service = ColumnMapperService::new(context.raw_dir(), context.decoded_dir());
        let report = service
            .run(&column_map)
            .with_context(|| "Failed to decode raw exports")?;

        finish_stage("decode", "decoded", &report)
    }
}

impl Default for DecodeCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
