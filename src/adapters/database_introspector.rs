// データベースイントロスペクター
//
// ロード先データベースからテーブル・カラム情報を取得するための抽象化レイヤー。
// 各方言固有のINFORMATION_SCHEMA/PRAGMAクエリを実装します。

use crate::adapters::sql_quote::quote_identifier;
use crate::core::config::Dialect;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

/// 生のカラム情報（DB固有フォーマット）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumnInfo {
    /// カラム名
    pub name: String,
    /// データ型（DB固有の型文字列）
    pub data_type: String,
}

/// データベーススキーマ取得インターフェース
#[async_trait]
pub trait DatabaseIntrospector: Send + Sync {
    /// テーブル名一覧を取得（名前順）
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>>;

    /// カラム情報を取得（定義順）
    async fn get_columns(&self, pool: &AnyPool, table_name: &str) -> Result<Vec<RawColumnInfo>>;

    /// カラム名のみを取得
    async fn get_column_names(&self, pool: &AnyPool, table_name: &str) -> Result<Vec<String>> {
        Ok(self
            .get_columns(pool, table_name)
            .await?
            .into_iter()
            .map(|column| column.name)
            .collect())
    }
}

/// PostgreSQL用イントロスペクター
pub struct PostgresIntrospector;

/// MySQL用イントロスペクター
pub struct MySqlIntrospector;

/// SQLite用イントロスペクター
pub struct SqliteIntrospector;

/// 方言に応じたイントロスペクターを作成
pub fn create_introspector(dialect: Dialect) -> Box<dyn DatabaseIntrospector> {
    match dialect {
        Dialect::PostgreSQL => Box::new(PostgresIntrospector),
        Dialect::MySQL => Box::new(MySqlIntrospector),
        Dialect::SQLite => Box::new(SqliteIntrospector),
    }
}

fn first_column_strings(rows: &[sqlx::any::AnyRow]) -> Vec<String> {
    rows.iter().map(|row| row.get::<String, _>(0)).collect()
}

// =============================================================================
// PostgreSQL イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for PostgresIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = 'public'
            ORDER BY table_name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        Ok(first_column_strings(&rows))
    }

    async fn get_columns(&self, pool: &AnyPool, table_name: &str) -> Result<Vec<RawColumnInfo>> {
        let sql = r#"
            SELECT column_name, data_type
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query(sql).bind(table_name).fetch_all(pool).await?;
        Ok(rows
            .iter()
            .map(|row| RawColumnInfo {
                name: row.get(0),
                data_type: row.get(1),
            })
            .collect())
    }
}

// =============================================================================
// MySQL イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for MySqlIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = DATABASE()
            ORDER BY table_name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        Ok(first_column_strings(&rows))
    }

    async fn get_columns(&self, pool: &AnyPool, table_name: &str) -> Result<Vec<RawColumnInfo>> {
        let sql = r#"
            SELECT column_name, data_type
            FROM information_schema.columns
            WHERE table_name = ? AND table_schema = DATABASE()
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query(sql).bind(table_name).fetch_all(pool).await?;
        Ok(rows
            .iter()
            .map(|row| RawColumnInfo {
                name: row.get(0),
                data_type: row.get(1),
            })
            .collect())
    }
}

// =============================================================================
// SQLite イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for SqliteIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
                AND name NOT LIKE 'sqlite_%'
            ORDER BY name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        Ok(first_column_strings(&rows))
    }

    async fn get_columns(&self, pool: &AnyPool, table_name: &str) -> Result<Vec<RawColumnInfo>> {
        let sql = format!(
            "PRAGMA table_info({})",
            quote_identifier(Dialect::SQLite, table_name)
        );
        let rows = sqlx::query(&sql).fetch_all(pool).await?;

        Ok(rows
            .iter()
            .map(|row| RawColumnInfo {
                name: row.get(1),
                data_type: row.get(2),
            })
            .collect())
    }
}
