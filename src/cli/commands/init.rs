// initコマンドハンドラー
//
// プロジェクトの初期化処理を実装します。
// - データディレクトリの作成（raw / clean / cleaned）
// - デフォルト設定ファイルの生成（.bankflow.yaml）
// - 初期化済みプロジェクトの検出と警告

use crate::core::config::Config;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 強制的に初期化（既存の設定を上書き）
    pub force: bool,
}

/// initコマンドハンドラー
#[derive(Debug, Clone)]
pub struct InitCommandHandler {}

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// initコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - initコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 成功時は作成したファイルの一覧、失敗時はエラーメッセージ
    pub fn execute(&self, command: &InitCommand) -> Result<String> {
        // 初期化済みチェック
        if self.is_already_initialized(&command.project_path) && !command.force {
            return Err(anyhow!(
                "Project is already initialized. Use --force option to force re-initialization."
            ));
        }

        let config = Config::default();
        self.create_directory_structure(&command.project_path, &config)?;
        let config_path = self.generate_config_file(&command.project_path, &config)?;

        Ok(format!("Project initialized: {}", config_path.display()))
    }

    /// プロジェクトが既に初期化されているかチェック
    pub fn is_already_initialized(&self, project_path: &Path) -> bool {
        project_path.join(Config::DEFAULT_CONFIG_PATH).exists()
    }

    /// データディレクトリを作成
    pub fn create_directory_structure(&self, project_path: &Path, config: &Config) -> Result<()> {
        let paths = &config.paths;
        for dir in [&paths.raw_dir, &paths.decoded_dir, &paths.cleaned_dir] {
            let dir = project_path.join(dir);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
        Ok(())
    }

    /// 設定ファイルを生成
    pub fn generate_config_file(&self, project_path: &Path, config: &Config) -> Result<PathBuf> {
        // YAMLにシリアライズ
        let yaml =
            serde_saphyr::to_string(config).with_context(|| "Failed to serialize config file")?;

        // ファイルに書き込み
        let config_path = project_path.join(Config::DEFAULT_CONFIG_PATH);
        fs::write(&config_path, yaml)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(config_path)
    }
}

impl Default for InitCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
