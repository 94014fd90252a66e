// SQL識別子クォートユーティリティ
//
// 各データベース方言用の識別子クォートとバインドプレースホルダーを提供します。
// スキーマ生成・ロード・イントロスペクションの全てから使用される共有モジュールです。

use crate::core::config::Dialect;

/// 方言に応じて識別子をクォート
///
/// PostgreSQL / SQLite はダブルクォート、MySQL はバッククォートを使い、
/// 識別子内の同じ文字は二重にエスケープします。
///
/// # Examples
/// ```
/// use bankflow::adapters::sql_quote::quote_identifier;
/// use bankflow::core::config::Dialect;
/// assert_eq!(quote_identifier(Dialect::PostgreSQL, "users"), r#""users""#);
/// assert_eq!(quote_identifier(Dialect::MySQL, "table`name"), "`table``name`");
/// ```
pub fn quote_identifier(dialect: Dialect, name: &str) -> String {
    match dialect {
        Dialect::PostgreSQL | Dialect::SQLite => format!("\"{}\"", name.replace('"', "\"\"")),
        Dialect::MySQL => format!("`{}`", name.replace('`', "``")),
    }
}

/// カラム名リストをクォートしてカンマ区切りで結合
pub fn quote_columns<S: AsRef<str>>(dialect: Dialect, columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(dialect, c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 1始まりのバインドパラメータ位置に対応するプレースホルダー
pub fn placeholder(dialect: Dialect, position: usize) -> String {
    match dialect {
        Dialect::PostgreSQL => format!("${}", position),
        Dialect::MySQL | Dialect::SQLite => "?".to_string(),
    }
}

/// 1文あたりのバインドパラメータ上限
pub fn max_bind_parameters(dialect: Dialect) -> usize {
    match dialect {
        Dialect::PostgreSQL | Dialect::MySQL => 65_535,
        // 古いSQLiteのSQLITE_MAX_VARIABLE_NUMBER
        Dialect::SQLite => 999,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_postgres() {
        assert_eq!(quote_identifier(Dialect::PostgreSQL, "users"), r#""users""#);
        assert_eq!(
            quote_identifier(Dialect::PostgreSQL, r#"table"name"#),
            r#""table""name""#
        );
        assert_eq!(quote_identifier(Dialect::PostgreSQL, ""), r#""""#);
    }

    #[test]
    fn test_quote_identifier_mysql() {
        assert_eq!(quote_identifier(Dialect::MySQL, "limit_amount"), "`limit_amount`");
        // MySQLではダブルクォートはエスケープ不要
        assert_eq!(
            quote_identifier(Dialect::MySQL, r#"table"name"#),
            r#"`table"name`"#
        );
        assert_eq!(quote_identifier(Dialect::MySQL, "`"), "````");
    }

    #[test]
    fn test_quote_identifier_sqlite_reserved_word() {
        assert_eq!(quote_identifier(Dialect::SQLite, "status"), r#""status""#);
        assert_eq!(quote_identifier(Dialect::SQLite, "order"), r#""order""#);
    }

    #[test]
    fn test_quote_columns() {
        let columns = vec!["id".to_string(), "email".to_string()];
        assert_eq!(quote_columns(Dialect::SQLite, &columns), r#""id", "email""#);
        assert_eq!(quote_columns(Dialect::MySQL, &columns), "`id`, `email`");

        let empty: Vec<String> = vec![];
        assert_eq!(quote_columns(Dialect::PostgreSQL, &empty), "");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder(Dialect::PostgreSQL, 3), "$3");
        assert_eq!(placeholder(Dialect::MySQL, 3), "?");
        assert_eq!(placeholder(Dialect::SQLite, 1), "?");
    }
}
