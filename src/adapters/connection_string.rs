// 接続文字列ビルダー
//
// DatabaseConfig と Dialect から接続文字列を生成する。

use crate::core::config::{DatabaseConfig, Dialect};

/// 接続文字列を生成
pub fn build_connection_string(dialect: Dialect, config: &DatabaseConfig) -> String {
    match dialect {
        Dialect::PostgreSQL => {
            let user = config.user.as_deref().unwrap_or("postgres");
            format!(
                "postgresql://{}@{}:{}/{}",
                auth_segment(user, config.password.as_deref()),
                config.host,
                config.port,
                config.database
            )
        }
        Dialect::MySQL => {
            let user = config.user.as_deref().unwrap_or("root");
            format!(
                "mysql://{}@{}:{}/{}",
                auth_segment(user, config.password.as_deref()),
                config.host,
                config.port,
                config.database
            )
        }
        // ロード先のファイルが未作成でも接続できるよう作成モードで開く
        Dialect::SQLite => format!("sqlite://{}?mode=rwc", config.database),
    }
}

fn auth_segment(user: &str, password: Option<&str>) -> String {
    match password {
        Some(password) if !password.is_empty() => format!("{}:{}", user, password),
        _ => user.to_string(),
    }
}
