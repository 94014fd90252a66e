/// スキーマ生成のテスト
///
/// クリーニング済みテーブルから方言ごとのDDLスクリプトが生成されることを確認します。

#[cfg(test)]
mod schema_synthesizer_tests {
    use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMicrosecondArray};
    use arrow::record_batch::RecordBatch;
    use bankflow::adapters::table_store;
    use bankflow::core::config::Dialect;
    use bankflow::services::schema_synthesizer::SchemaSynthesizer;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_cleaned_tables(dir: &Path) {
        let users = RecordBatch::try_from_iter(vec![
            ("id", Arc::new(StringArray::from(vec!["1"])) as ArrayRef),
            ("total_balance", Arc::new(Float64Array::from(vec![Some(1.0)])) as ArrayRef),
            ("is_vip", Arc::new(BooleanArray::from(vec![false])) as ArrayRef),
            (
                "created_at",
                Arc::new(TimestampMicrosecondArray::from(vec![Some(0)])) as ArrayRef,
            ),
        ])
        .unwrap();
        let logs = RecordBatch::try_from_iter(vec![(
            "message",
            Arc::new(StringArray::from(vec!["hello"])) as ArrayRef,
        )])
        .unwrap();

        table_store::write_table(&dir.join("users.parquet"), &users).unwrap();
        table_store::write_table(&dir.join("logs.parquet"), &logs).unwrap();
    }

    /// ファイル名順にDROP/CREATEが並び、最後に系譜テーブルが来る
    #[test]
    fn test_generate_script_sqlite() {
        let temp_dir = TempDir::new().unwrap();
        write_cleaned_tables(temp_dir.path());

        let script = SchemaSynthesizer::new(Dialect::SQLite)
            .generate(temp_dir.path())
            .unwrap();

        assert!(script.starts_with("-- Generated by bankflow schema (sqlite)"));
        let logs = script.find("CREATE TABLE \"logs\"").unwrap();
        let users = script.find("CREATE TABLE \"users\"").unwrap();
        let lineage = script.find("CREATE TABLE \"retrieveinfo\"").unwrap();
        assert!(logs < users && users < lineage);

        assert!(script.contains("DROP TABLE IF EXISTS \"users\";"));
        assert!(script.contains("\"total_balance\" DECIMAL(18,2)"));
        assert!(script.contains("\"is_vip\" BOOLEAN"));
        assert!(script.contains("\"created_at\" DATETIME"));
        assert!(script.contains("PRIMARY KEY (\"id\")"));
    }

    /// MySQLの型とクォート
    #[test]
    fn test_generate_script_mysql() {
        let temp_dir = TempDir::new().unwrap();
        write_cleaned_tables(temp_dir.path());

        let script = SchemaSynthesizer::new(Dialect::MySQL)
            .generate(temp_dir.path())
            .unwrap();

        assert!(script.contains("`is_vip` TINYINT(1)"));
        assert!(script.contains("`created_at` DATETIME(6)"));
        assert!(script.contains("`message` LONGTEXT"));
        assert!(script.contains("AUTO_INCREMENT"));
    }

    /// クリーニング済みディレクトリが無い場合はエラー
    #[test]
    fn test_generate_requires_cleaned_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = SchemaSynthesizer::new(Dialect::PostgreSQL).generate(&temp_dir.path().join("missing"));
        assert!(result.is_err());
    }
}
