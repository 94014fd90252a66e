// 設定ファイル管理
//
// パイプラインの設定ファイル（YAML形式）の表現、検証、
// 環境別のデータベース接続設定の管理を行います。
// 設定ファイルが無い場合でも全コマンドが動作するよう、既定値を持ちます。

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(rename = "postgresql")]
    PostgreSQL,
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "sqlite")]
    SQLite,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgresql" | "postgres" => Ok(Dialect::PostgreSQL),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            other => Err(anyhow!(
                "Unsupported database dialect: {}. Please specify one of: postgresql, mysql, sqlite.",
                other
            )),
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// データベース方言
    pub dialect: Dialect,

    /// 各ステージの入出力ディレクトリ
    #[serde(default)]
    pub paths: DataPaths,

    /// DDLスクリプトの出力先
    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,

    /// 環境別のデータベース設定
    #[serde(default = "default_environments")]
    pub environments: HashMap<String, DatabaseConfig>,
}

/// ステージ間の受け渡しディレクトリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    /// 難読化された生CSVの置き場
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,

    /// decode の出力 / clean の入力
    #[serde(default = "default_decoded_dir")]
    pub decoded_dir: PathBuf,

    /// clean の出力 / load・schema の入力
    #[serde(default = "default_cleaned_dir")]
    pub cleaned_dir: PathBuf,

    /// カラムマップ（JSON）
    #[serde(default = "default_column_map")]
    pub column_map: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            decoded_dir: default_decoded_dir(),
            cleaned_dir: default_cleaned_dir(),
            column_map: default_column_map(),
        }
    }
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_decoded_dir() -> PathBuf {
    PathBuf::from("data/clean")
}

fn default_cleaned_dir() -> PathBuf {
    PathBuf::from("data/cleaned")
}

fn default_column_map() -> PathBuf {
    PathBuf::from("data/raw/column_table_map.json")
}

fn default_schema_file() -> PathBuf {
    PathBuf::from("schema_bank.sql")
}

fn default_environments() -> HashMap<String, DatabaseConfig> {
    let mut environments = HashMap::new();
    environments.insert(
        Config::DEFAULT_ENVIRONMENT.to_string(),
        DatabaseConfig {
            host: String::new(),
            port: 0,
            database: "data/banking.db".to_string(),
            user: None,
            password: None,
            timeout: Some(30),
        },
    );
    environments
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// デフォルトの環境名
    pub const DEFAULT_ENVIRONMENT: &'static str = "development";

    /// 指定された環境のデータベース設定を取得
    pub fn get_database_config(&self, environment: &str) -> Result<DatabaseConfig> {
        self.environments.get(environment).cloned().ok_or_else(|| {
            anyhow!(
                "Environment '{}' not found. Available environments: {:?}",
                environment,
                self.environments.keys().collect::<Vec<_>>()
            )
        })
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        if self.environments.is_empty() {
            return Err(anyhow!(
                "At least one environment configuration is required"
            ));
        }

        for (env_name, db_config) in &self.environments {
            db_config
                .validate()
                .with_context(|| format!("Invalid config for environment '{}'", env_name))?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            dialect: Dialect::SQLite,
            paths: DataPaths::default(),
            schema_file: default_schema_file(),
            environments: default_environments(),
        }
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}

/// データベース接続設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// ホスト名（SQLiteの場合は不要）
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号
    #[serde(default = "default_port")]
    pub port: u16,

    /// データベース名（SQLiteの場合はファイルパス）
    pub database: String,

    /// ユーザー名
    pub user: Option<String>,

    /// パスワード
    pub password: Option<String>,

    /// 接続タイムアウト（秒）
    pub timeout: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432 // PostgreSQLのデフォルトポート
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(anyhow!("Database name is not specified"));
        }

        Ok(())
    }

    /// 接続文字列を生成
    pub fn to_connection_string(&self, dialect: Dialect) -> String {
        crate::adapters::connection_string::build_connection_string(dialect, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::PostgreSQL.to_string(), "postgresql");
        assert_eq!(Dialect::MySQL.to_string(), "mysql");
        assert_eq!(Dialect::SQLite.to_string(), "sqlite");
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSQL);
        assert_eq!("sqlite".parse::<Dialect>().unwrap(), Dialect::SQLite);
        assert!("mssql".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dialect, Dialect::SQLite);
        assert_eq!(config.paths.cleaned_dir, PathBuf::from("data/cleaned"));
        assert!(config
            .get_database_config(Config::DEFAULT_ENVIRONMENT)
            .is_ok());
    }
}
