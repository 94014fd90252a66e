use anyhow::{Context, Result};
use bankflow::cli::commands::clean::{CleanCommand, CleanCommandHandler};
use bankflow::cli::commands::decode::{DecodeCommand, DecodeCommandHandler};
use bankflow::cli::commands::init::{InitCommand, InitCommandHandler};
use bankflow::cli::commands::load::{LoadCommand, LoadCommandHandler};
use bankflow::cli::commands::peek::{PeekCommand, PeekCommandHandler};
use bankflow::cli::commands::run::{RunCommand, RunCommandHandler};
use bankflow::cli::commands::schema::{SchemaCommand, SchemaCommandHandler};
use bankflow::cli::commands::verify::{VerifyCommand, VerifyCommandHandler};
use bankflow::cli::commands::StageFailure;
use bankflow::cli::{Cli, Commands};
use bankflow::logging::init_logging;
use clap::Parser;
use std::env;
use std::process;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, cli.no_color);

    // 非同期ランタイムを作成して実行
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")
        .and_then(|runtime| runtime.block_on(run_command(cli)));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            // 処理済みテーブルの表示は残してから失敗を報告
            if let Some(failure) = e.downcast_ref::<StageFailure>() {
                if !failure.output.is_empty() {
                    println!("{}", failure.output);
                }
            }
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;
    let config_path = cli.config.clone();

    match cli.command {
        Commands::Init { force } => {
            let handler = InitCommandHandler::new();
            handler.execute(&InitCommand {
                project_path,
                force,
            })
        }

        Commands::Decode => {
            let handler = DecodeCommandHandler::new();
            handler.execute(&DecodeCommand {
                project_path,
                config_path,
            })
        }

        Commands::Clean => {
            let handler = CleanCommandHandler::new();
            handler.execute(&CleanCommand {
                project_path,
                config_path,
            })
        }

        Commands::Load => {
            let handler = LoadCommandHandler::new();
            let command = LoadCommand {
                project_path,
                config_path,
                env: cli.env,
            };
            handler.execute(&command).await
        }

        Commands::Schema { output } => {
            let handler = SchemaCommandHandler::new();
            handler.execute(&SchemaCommand {
                project_path,
                config_path,
                output,
            })
        }

        Commands::Peek => {
            let handler = PeekCommandHandler::new();
            handler.execute(&PeekCommand {
                project_path,
                config_path,
            })
        }

        Commands::Verify => {
            let handler = VerifyCommandHandler::new();
            let command = VerifyCommand {
                project_path,
                config_path,
                env: cli.env,
            };
            handler.execute(&command).await
        }

        Commands::Run => {
            let handler = RunCommandHandler::new();
            let command = RunCommand {
                project_path,
                config_path,
                env: cli.env,
            };
            handler.execute(&command).await
        }
    }
}
