// デコードステージ（カラムマッパー）
//
// 難読化されたCSVを読み込み、カラムマップに従ってヘッダーを人間可読な名前へ変換し、
// 系譜カラム `source_file` を付けて論理エンティティごとのテーブルとして書き出します。

use crate::adapters::table_store;
use crate::core::column_map::{ColumnMap, TableMapping};
use crate::core::error::{IoError, TableError};
use crate::core::naming::{table_file_name, SOURCE_FILE_COLUMN};
use crate::services::stage_report::{StageReport, TableReport};
use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// カラムマップファイルを読み込む
pub fn load_column_map(path: &Path) -> Result<ColumnMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read column map: {:?}", path))?;
    content
        .parse::<ColumnMap>()
        .with_context(|| format!("Invalid column map: {:?}", path))
}

/// 1つの生CSVをデコード
///
/// 全カラムを文字列のまま読み込み、ヘッダーを変換し、系譜カラムを末尾に追加します。
pub fn decode_table(
    raw_dir: &Path,
    table_id: &str,
    mapping: &TableMapping,
) -> Result<RecordBatch, TableError> {
    let csv_path = raw_dir.join(&mapping.file);
    let raw = table_store::read_csv_as_strings(&csv_path)?;

    let mut fields: Vec<Field> = raw
        .schema_ref()
        .fields()
        .iter()
        .map(|field| {
            Field::new(
                mapping.rename(table_id, field.name()),
                field.data_type().clone(),
                field.is_nullable(),
            )
        })
        .collect();
    let mut columns: Vec<ArrayRef> = raw.columns().to_vec();

    fields.push(Field::new(SOURCE_FILE_COLUMN, DataType::Utf8, false));
    columns.push(Arc::new(StringArray::from(vec![
        mapping.file.as_str();
        raw.num_rows()
    ])));

    let options = RecordBatchOptions::new().with_row_count(Some(raw.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options).map_err(
        |e| TableError::Decode {
            path: csv_path.display().to_string(),
            cause: e.to_string(),
        },
    )
}

/// デコードステージの実行サービス
#[derive(Debug, Clone)]
pub struct ColumnMapperService {
    raw_dir: PathBuf,
    decoded_dir: PathBuf,
}

impl ColumnMapperService {
    pub fn new(raw_dir: impl Into<PathBuf>, decoded_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            decoded_dir: decoded_dir.into(),
        }
    }

    /// マップに載っている全テーブルをテーブルID順に処理
    pub fn run(&self, column_map: &ColumnMap) -> Result<StageReport, IoError> {
        table_store::ensure_dir(&self.decoded_dir)?;

        let mut report = StageReport::new();
        for (table_id, mapping) in column_map.iter() {
            report.push(self.decode_one(table_id, mapping));
        }
        Ok(report)
    }

    fn decode_one(&self, table_id: &str, mapping: &TableMapping) -> TableReport {
        let csv_path = self.raw_dir.join(&mapping.file);
        if !csv_path.exists() {
            warn!(table_id, file = %mapping.file, "raw file not found, skipping");
            return TableReport::skipped(&mapping.table, format!("{} not found", mapping.file));
        }

        let target = self.decoded_dir.join(table_file_name(&mapping.table));
        let result = decode_table(&self.raw_dir, table_id, mapping)
            .and_then(|table| table_store::write_table(&target, &table).map(|_| table.num_rows()));

        match result {
            Ok(rows) => {
                info!(table_id, file = %mapping.file, table = %mapping.table, rows, "decoded");
                TableReport::processed(&mapping.table, target.display().to_string(), rows, 0)
            }
            Err(e) => {
                warn!(table_id, file = %mapping.file, error = %e, "failed to decode");
                TableReport::failed(&mapping.table, e.to_string())
            }
        }
    }
}
