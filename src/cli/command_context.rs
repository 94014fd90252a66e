// コマンド共通コンテキスト
//
// 設定ファイル読み込みやパス解決の重複をCLI層で集約する。

use crate::core::config::{Config, DatabaseConfig};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    ///
    /// 既定の設定ファイルが無い場合は組み込みの既定値を使います。
    /// 明示的に指定された設定ファイルが無い場合はエラーです。
    pub fn load(project_path: PathBuf, config_path: Option<&Path>) -> Result<Self> {
        let explicit = config_path.is_some();
        let config_path = match config_path {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => project_path.join(path),
            None => project_path.join(Config::DEFAULT_CONFIG_PATH),
        };

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = content
                .parse()
                .with_context(|| format!("Invalid config file: {:?}", config_path))?;
            config.validate()?;
            config
        } else if explicit {
            return Err(anyhow!("Config file not found: {:?}", config_path));
        } else {
            debug!(path = %config_path.display(), "config file not found, using defaults");
            Config::default()
        };

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_path.join(path)
        }
    }

    /// 生CSVディレクトリ
    pub fn raw_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.raw_dir)
    }

    /// デコード済みディレクトリ
    pub fn decoded_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.decoded_dir)
    }

    /// クリーニング済みディレクトリ
    pub fn cleaned_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.cleaned_dir)
    }

    /// カラムマップファイル
    pub fn column_map_path(&self) -> PathBuf {
        self.resolve(&self.config.paths.column_map)
    }

    /// DDLスクリプトの出力先
    pub fn schema_file(&self) -> PathBuf {
        self.resolve(&self.config.schema_file)
    }

    /// ディレクトリが存在することを確認して返す
    pub fn require_dir(&self, path: PathBuf, label: &str) -> Result<PathBuf> {
        if !path.is_dir() {
            return Err(anyhow!("{} directory not found: {:?}", label, path));
        }
        Ok(path)
    }

    /// 環境のデータベース設定（SQLiteの相対パスはプロジェクトルート基準に解決）
    pub fn database_config(&self, env: &str) -> Result<DatabaseConfig> {
        let mut db_config = self.config.get_database_config(env)?;
        if self.config.dialect == crate::core::config::Dialect::SQLite {
            db_config.database = self
                .resolve(Path::new(&db_config.database))
                .to_string_lossy()
                .into_owned();
        }
        Ok(db_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let context = CommandContext::load(temp_dir.path().to_path_buf(), None).unwrap();

        assert_eq!(context.cleaned_dir(), temp_dir.path().join("data/cleaned"));
        assert_eq!(context.schema_file(), temp_dir.path().join("schema_bank.sql"));
        let db = context.database_config("development").unwrap();
        assert_eq!(db.database, temp_dir.path().join("data/banking.db").to_string_lossy());
    }

    #[test]
    fn test_load_explicit_missing_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = CommandContext::load(
            temp_dir.path().to_path_buf(),
            Some(Path::new("custom.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reads_paths_from_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".bankflow.yaml"),
            "version: \"1.0\"\ndialect: sqlite\npaths:\n  cleaned_dir: out/cleaned\n",
        )
        .unwrap();

        let context = CommandContext::load(temp_dir.path().to_path_buf(), None).unwrap();
        assert_eq!(context.cleaned_dir(), temp_dir.path().join("out/cleaned"));
        assert_eq!(context.decoded_dir(), temp_dir.path().join("data/clean"));
    }
}
