// データベース接続アダプター
//
// SQLxのAnyドライバーを使用したデータベース接続の管理を行います。
// PostgreSQL、MySQL、SQLiteに対応した統一されたインターフェースを提供します。

use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::error::DatabaseError;
use sqlx::any::install_default_drivers;
use sqlx::pool::PoolOptions;
use sqlx::{Any, AnyPool};
use std::time::Duration;
use tracing::debug;

/// 既定の接続取得タイムアウト（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// データベース接続サービス
///
/// ロード処理は1テーブルずつ逐次実行されるため、プールは小さく保ちます。
#[derive(Debug, Clone)]
pub struct DatabaseConnectionService {}

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// データベース接続文字列を構築
    pub fn build_connection_string(&self, dialect: Dialect, config: &DatabaseConfig) -> String {
        config.to_connection_string(dialect)
    }

    /// データベース接続プールを作成
    ///
    /// # Arguments
    ///
    /// * `dialect` - データベース方言
    /// * `config` - データベース設定
    pub async fn create_pool(
        &self,
        dialect: Dialect,
        config: &DatabaseConfig,
    ) -> Result<AnyPool, DatabaseError> {
        install_default_drivers();

        let connection_string = self.build_connection_string(dialect, config);
        debug!(%dialect, database = %config.database, "connecting");

        self.create_pool_options(config.timeout)
            .connect(&connection_string)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to create connection pool for {}", dialect),
                cause: e.to_string(),
            })
    }

    /// 接続テストを実行
    pub async fn test_connection(&self, pool: &AnyPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Connection {
                message: "Connection test failed".to_string(),
                cause: e.to_string(),
            })
    }

    /// プールオプションを作成（タイムアウト未指定時は既定値）
    pub fn create_pool_options(&self, timeout_secs: Option<u64>) -> PoolOptions<Any> {
        PoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(
                timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
    }

    /// 接続プールを閉じる
    pub async fn close_pool(&self, pool: AnyPool) {
        pool.close().await;
    }
}

impl Default for DatabaseConnectionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sqlite_config(database: String) -> DatabaseConfig {
        DatabaseConfig {
            host: String::new(),
            port: 0,
            database,
            user: None,
            password: None,
            timeout: Some(5),
        }
    }

    #[test]
    fn test_build_connection_string_sqlite() {
        let service = DatabaseConnectionService::new();
        let conn_str = service.build_connection_string(
            Dialect::SQLite,
            &sqlite_config("/path/to/test.db".to_string()),
        );

        assert!(conn_str.starts_with("sqlite://"));
        assert!(conn_str.contains("/path/to/test.db"));
    }

    #[test]
    fn test_create_pool_options() {
        let service = DatabaseConnectionService::new();
        let pool_options = service.create_pool_options(Some(60));

        assert!(format!("{:?}", pool_options).contains("PoolOptions"));
    }

    #[test]
    fn test_sqlite_pool_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("bank.db");
        let config = sqlite_config(db_path.to_string_lossy().into_owned());

        tokio_test::block_on(async {
            let service = DatabaseConnectionService::new();
            let pool = service.create_pool(Dialect::SQLite, &config).await.unwrap();
            service.test_connection(&pool).await.unwrap();
            service.close_pool(pool).await;
        });

        assert!(db_path.exists());
    }
}
