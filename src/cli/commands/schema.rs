// schemaコマンドハンドラー
//
// クリーニング済みテーブルからDDLスクリプトを生成してファイルへ書き出します。

use crate::cli::command_context::CommandContext;
use crate::services::schema_synthesizer::SchemaSynthesizer;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// schemaコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct SchemaCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 出力先（未指定時は設定ファイルの schema_file）
    pub output: Option<PathBuf>,
}

/// schemaコマンドハンドラー
#[derive(Debug, Clone)]
pub struct SchemaCommandHandler {}

impl SchemaCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// schemaコマンドを実行
    pub fn execute(&self, command: &SchemaCommand) -> Result<String> {
        let context = CommandContext::load(
            command.project_path.clone(),
            command.config_path.as_deref(),
        )?;
        let cleaned_dir = context.require_dir(context.cleaned_dir(), "Cleaned")?;

        let synthesizer = SchemaSynthesizer::new(context.config.dialect);
        let script = synthesizer.generate(&cleaned_dir)?;

        let output = match &command.output {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => context.project_path.join(path),
            None => context.schema_file(),
        };
        fs::write(&output, &script)
            .with_context(|| format!("Failed to write schema file: {:?}", output))?;

        Ok(format!(
            "{} {} DDL written to {}",
            "✓".green(),
            synthesizer.dialect(),
            output.display()
        ))
    }
}

impl Default for SchemaCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
