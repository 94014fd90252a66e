// runコマンドハンドラー
//
// decode → clean → load を順に実行します。
// 前段で失敗したテーブルがあっても後段は実行し、最後にまとめて失敗として返します。

use crate::cli::commands::clean::{CleanCommand, CleanCommandHandler};
use crate::cli::commands::decode::{DecodeCommand, DecodeCommandHandler};
use crate::cli::commands::load::{LoadCommand, LoadCommandHandler};
use crate::cli::commands::StageFailure;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// runコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct RunCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 設定ファイルのパス
    pub config_path: Option<PathBuf>,
    /// 環境名
    pub env: String,
}

/// runコマンドハンドラー
#[derive(Debug, Clone)]
pub struct RunCommandHandler {}

impl RunCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// runコマンドを実行
    pub async fn execute(&self, command: &RunCommand) -> Result<String> {
        let mut output = String::new();
        let mut failed = 0;

        let decoded = DecodeCommandHandler::new().execute(&DecodeCommand {
            project_path: command.project_path.clone(),
            config_path: command.config_path.clone(),
        });
        failed += self.collect("decode", decoded, &mut output)?;

        let cleaned = CleanCommandHandler::new().execute(&CleanCommand {
            project_path: command.project_path.clone(),
            config_path: command.config_path.clone(),
        });
        failed += self.collect("clean", cleaned, &mut output)?;

        let loaded = LoadCommandHandler::new()
            .execute(&LoadCommand {
                project_path: command.project_path.clone(),
                config_path: command.config_path.clone(),
                env: command.env.clone(),
            })
            .await;
        failed += self.collect("load", loaded, &mut output)?;

        if failed > 0 {
            return Err(StageFailure {
                stage: "run".to_string(),
                failed,
                output,
            }
            .into());
        }
        Ok(output)
    }

    /// ステージの出力を追記し、失敗テーブル数を返す
    ///
    /// テーブル単位の失敗以外のエラー（前提条件の欠落など）はそのまま中断します。
    fn collect(&self, stage: &str, result: Result<String>, output: &mut String) -> Result<usize> {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", format!("=== {} ===", stage).bold()));

        match result {
            Ok(stage_output) => {
                output.push_str(&stage_output);
                Ok(0)
            }
            Err(e) => match e.downcast::<StageFailure>() {
                Ok(failure) => {
                    output.push_str(&failure.output);
                    Ok(failure.failed)
                }
                Err(e) => Err(e),
            },
        }
    }
}

impl Default for RunCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
