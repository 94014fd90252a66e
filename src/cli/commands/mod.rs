// コマンドハンドラー層
// 各CLIコマンドの実装と、ステージ結果の共通表示

pub mod clean;
pub mod decode;
pub mod init;
pub mod load;
pub mod peek;
pub mod run;
pub mod schema;
pub mod verify;

use crate::services::stage_report::{StageReport, TableOutcome};
use colored::Colorize;
use std::fmt::Write as _;
use thiserror::Error;

/// 一部のテーブルが失敗したステージ
///
/// 処理済みテーブルの表示を失わないよう、出力を保持したままエラーとして返します。
#[derive(Debug, Error)]
#[error("{failed} table(s) failed during {stage}")]
pub struct StageFailure {
    /// ステージ名
    pub stage: String,
    /// 失敗したテーブル数
    pub failed: usize,
    /// 失敗までに生成された出力
    pub output: String,
}

/// 3桁区切りの数値表示
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

/// ステージ結果をテーブルごとのステータス行に整形
pub fn render_stage_report(verb: &str, report: &StageReport) -> String {
    let mut output = String::new();
    for table in &report.tables {
        let line = match &table.outcome {
            TableOutcome::Processed {
                output: target,
                rows,
                errors,
            } => {
                let mut detail = format!("{} rows", format_count(*rows));
                if *errors > 0 {
                    detail.push_str(&format!(", {} with issues", format_count(*errors)));
                }
                if target == &table.table {
                    format!("{} {} {} ({})", "✓".green(), verb, table.table.bold(), detail)
                } else {
                    format!(
                        "{} {} {} → {} ({})",
                        "✓".green(),
                        verb,
                        table.table.bold(),
                        target,
                        detail
                    )
                }
            }
            TableOutcome::Skipped { reason } => {
                format!("{} {} – skipping", "⚠".yellow(), reason.yellow())
            }
            TableOutcome::Failed { error } => {
                format!("{} {}: {}", "✗".red(), table.table.bold(), error.red())
            }
        };
        let _ = writeln!(output, "{}", line);
    }
    output.trim_end().to_string()
}

/// 失敗したテーブルがあればStageFailureにする
pub fn finish_stage(stage: &str, verb: &str, report: &StageReport) -> anyhow::Result<String> {
    let output = render_stage_report(verb, report);
    if report.has_failures() {
        return Err(StageFailure {
            stage: stage.to_string(),
            failed: report.failed_count(),
            output,
        }
        .into());
    }
    Ok(output)
}
