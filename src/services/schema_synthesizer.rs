// スキーマ生成サービス
//
// クリーニング済みテーブルの実行時カラム型からDDLを生成します。
// - カラム型は少数の型クラスを経由して方言ごとのSQL型へ変換
// - `id` という名前のカラムがあれば主キーとみなす
// - 系譜テーブル（retrieveinfo）の定義も同じスクリプトに含める

use crate::adapters::sql_quote::quote_identifier;
use crate::adapters::table_store;
use crate::adapters::type_mapping::sql_type_for;
use crate::core::config::Dialect;
use crate::core::naming::{APP_NAME, LINEAGE_TABLE};
use anyhow::{Context, Result};
use arrow::datatypes::Schema;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// 主キーとみなすカラム名
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// 主キーの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyPolicy {
    /// `id` カラムがあれば主キーとして宣言
    InferFromId,
    /// 主キーを宣言しない
    None,
}

/// スキーマ生成サービス
#[derive(Debug, Clone)]
pub struct SchemaSynthesizer {
    dialect: Dialect,
}

impl SchemaSynthesizer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 1テーブル分の CREATE TABLE 文を生成
    pub fn build_create_table(
        &self,
        table_name: &str,
        schema: &Schema,
        primary_key: PrimaryKeyPolicy,
    ) -> String {
        let mut lines: Vec<String> = schema
            .fields()
            .iter()
            .map(|field| {
                format!(
                    "    {} {}",
                    quote_identifier(self.dialect, field.name()),
                    sql_type_for(self.dialect, field.data_type())
                )
            })
            .collect();

        let has_id = schema.fields().iter().any(|f| f.name() == PRIMARY_KEY_COLUMN);
        if primary_key == PrimaryKeyPolicy::InferFromId && has_id {
            lines.push(format!(
                "    PRIMARY KEY ({})",
                quote_identifier(self.dialect, PRIMARY_KEY_COLUMN)
            ));
        }

        format!(
            "CREATE TABLE {} (\n{}\n);\n",
            quote_identifier(self.dialect, table_name),
            lines.join(",\n")
        )
    }

    /// DROP TABLE IF EXISTS 文を生成
    pub fn build_drop_table(&self, table_name: &str) -> String {
        format!(
            "DROP TABLE IF EXISTS {};\n",
            quote_identifier(self.dialect, table_name)
        )
    }

    /// 系譜テーブルの CREATE TABLE 文を生成
    pub fn build_lineage_table(&self, if_not_exists: bool) -> String {
        let (id_column, timestamp_column, text_type, small_text_type) = match self.dialect {
            Dialect::PostgreSQL => (
                "retrieve_id SERIAL PRIMARY KEY",
                "retrieved_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
                "TEXT",
                "VARCHAR(64)",
            ),
            Dialect::MySQL => (
                "retrieve_id INT AUTO_INCREMENT PRIMARY KEY",
                "retrieved_at DATETIME(6) DEFAULT CURRENT_TIMESTAMP(6)",
                "LONGTEXT",
                "VARCHAR(64)",
            ),
            Dialect::SQLite => (
                "retrieve_id INTEGER PRIMARY KEY AUTOINCREMENT",
                "retrieved_at DATETIME DEFAULT CURRENT_TIMESTAMP",
                "TEXT",
                "TEXT",
            ),
        };

        format!(
            "CREATE TABLE {}{} (\n    {},\n    source_file {},\n    {},\n    total_rows INTEGER,\n    processed_rows INTEGER,\n    errors INTEGER,\n    notes {}\n);\n",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            quote_identifier(self.dialect, LINEAGE_TABLE),
            id_column,
            small_text_type,
            timestamp_column,
            text_type
        )
    }

    /// ディレクトリ内の全テーブルファイルからDDLスクリプトを生成
    pub fn generate(&self, cleaned_dir: &Path) -> Result<String> {
        let files = table_store::list_table_files(cleaned_dir)
            .with_context(|| format!("Failed to list cleaned tables in {:?}", cleaned_dir))?;

        let mut script = String::new();
        writeln!(
            script,
            "-- Generated by {} schema ({}) from {}",
            APP_NAME,
            self.dialect,
            cleaned_dir.display()
        )?;
        writeln!(script)?;

        for path in &files {
            let Some(table_name) = table_store::table_name_of(path) else {
                continue;
            };
            let schema = table_store::read_schema(path)
                .with_context(|| format!("Failed to read schema of {:?}", path))?;
            debug!(table = %table_name, columns = schema.fields().len(), "synthesizing DDL");

            script.push_str(&self.build_drop_table(&table_name));
            script.push_str(&self.build_create_table(
                &table_name,
                &schema,
                PrimaryKeyPolicy::InferFromId,
            ));
            script.push('\n');
        }

        script.push_str(&self.build_drop_table(LINEAGE_TABLE));
        script.push_str(&self.build_lineage_table(false));

        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, TimeUnit};

    fn cards_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Utf8, true),
            Field::new("balance", DataType::Float64, true),
            Field::new("is_blocked", DataType::Boolean, false),
        ])
    }

    #[test]
    fn test_create_table_with_id_primary_key() {
        let synthesizer = SchemaSynthesizer::new(Dialect::PostgreSQL);
        let ddl = synthesizer.build_create_table("cards", &cards_schema(), PrimaryKeyPolicy::InferFromId);

        assert_eq!(
            ddl,
            "CREATE TABLE \"cards\" (\n    \"id\" TEXT,\n    \"balance\" DECIMAL(18,2),\n    \"is_blocked\" BOOLEAN,\n    PRIMARY KEY (\"id\")\n);\n"
        );
    }

    #[test]
    fn test_create_table_without_primary_key() {
        let synthesizer = SchemaSynthesizer::new(Dialect::MySQL);
        let schema = Schema::new(vec![
            Field::new("created_at", DataType::Timestamp(TimeUnit::Microsecond, None), true),
            Field::new("count", DataType::Int64, true),
        ]);
        let ddl = synthesizer.build_create_table("logs", &schema, PrimaryKeyPolicy::InferFromId);

        assert!(ddl.contains("`created_at` DATETIME(6)"));
        assert!(ddl.contains("`count` BIGINT"));
        assert!(!ddl.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_primary_key_policy_none() {
        let synthesizer = SchemaSynthesizer::new(Dialect::SQLite);
        let ddl = synthesizer.build_create_table("cards", &cards_schema(), PrimaryKeyPolicy::None);
        assert!(!ddl.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_lineage_table_per_dialect() {
        let sqlite = SchemaSynthesizer::new(Dialect::SQLite).build_lineage_table(true);
        assert!(sqlite.starts_with("CREATE TABLE IF NOT EXISTS \"retrieveinfo\""));
        assert!(sqlite.contains("AUTOINCREMENT"));

        let mysql = SchemaSynthesizer::new(Dialect::MySQL).build_lineage_table(false);
        assert!(mysql.starts_with("CREATE TABLE `retrieveinfo`"));
        assert!(mysql.contains("AUTO_INCREMENT"));

        let postgres = SchemaSynthesizer::new(Dialect::PostgreSQL).build_lineage_table(false);
        assert!(postgres.contains("SERIAL PRIMARY KEY"));
        assert!(postgres.contains("processed_rows INTEGER"));
    }
}
