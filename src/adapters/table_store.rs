// テーブルストア
//
// ステージ間で受け渡す列指向テーブルのファイルI/Oを集約します。
// - 生CSVの読み込み（全カラムを文字列として）
// - Parquetの読み書き（書き込みは一時ファイル経由で置き換え）
// - ディレクトリ内のテーブルファイル列挙

use crate::core::error::{IoError, TableError};
use crate::core::naming::TABLE_FILE_EXTENSION;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

fn decode_error(path: &Path, cause: impl ToString) -> TableError {
    TableError::Decode {
        path: path_string(path),
        cause: cause.to_string(),
    }
}

fn encode_error(path: &Path, cause: impl ToString) -> TableError {
    TableError::Encode {
        path: path_string(path),
        cause: cause.to_string(),
    }
}

fn open_existing(path: &Path) -> Result<File, TableError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path_string(path),
        }
        .into());
    }
    File::open(path).map_err(|e| {
        IoError::FileRead {
            path: path_string(path),
            cause: e.to_string(),
        }
        .into()
    })
}

/// ヘッダー付きCSVを読み込み、全カラムを文字列（Utf8）のまま返す
///
/// 末尾のフィールドが足りない行も読み込み、欠けた値はnullになります。
pub fn read_csv_as_strings(path: &Path) -> Result<RecordBatch, TableError> {
    let mut file = open_existing(path)?;

    let format = Format::default()
        .with_header(true)
        .with_truncated_rows(true);
    let (inferred, _) = format
        .infer_schema(&mut file, Some(1))
        .map_err(|e| decode_error(path, e))?;
    file.rewind().map_err(|e| decode_error(path, e))?;

    let schema: SchemaRef = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .build(file)
        .map_err(|e| decode_error(path, e))?;
    let batches = reader
        .collect::<Result<Vec<_>, ArrowError>>()
        .map_err(|e| decode_error(path, e))?;

    concat_batches(&schema, &batches).map_err(|e| decode_error(path, e))
}

/// Parquetファイルを1つのテーブルとして読み込む
pub fn read_table(path: &Path) -> Result<RecordBatch, TableError> {
    let file = open_existing(path)?;

    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| decode_error(path, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| decode_error(path, e))?;
    let batches = reader
        .collect::<Result<Vec<_>, ArrowError>>()
        .map_err(|e| decode_error(path, e))?;

    concat_batches(&schema, &batches).map_err(|e| decode_error(path, e))
}

/// Parquetファイルのスキーマのみを読み込む
pub fn read_schema(path: &Path) -> Result<SchemaRef, TableError> {
    let file = open_existing(path)?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| decode_error(path, e))?;
    Ok(builder.schema().clone())
}

/// テーブルをParquetファイルとして書き込む
///
/// 同じディレクトリの一時ファイルへ書き切ってから置き換えるため、
/// 書き込み途中のファイルが出力先に残ることはありません。
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<(), TableError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&dir)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| IoError::FileWrite {
        path: path_string(path),
        cause: e.to_string(),
    })?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(temp.as_file_mut(), batch.schema(), Some(props))
        .map_err(|e| encode_error(path, e))?;
    writer.write(batch).map_err(|e| encode_error(path, e))?;
    writer.close().map_err(|e| encode_error(path, e))?;

    temp.persist(path).map_err(|e| IoError::FileWrite {
        path: path_string(path),
        cause: e.to_string(),
    })?;

    Ok(())
}

/// ディレクトリを作成（既存なら何もしない）
pub fn ensure_dir(dir: &Path) -> Result<(), IoError> {
    fs::create_dir_all(dir).map_err(|e| IoError::DirectoryCreate {
        path: path_string(dir),
        cause: e.to_string(),
    })
}

/// ディレクトリ内のテーブルファイルをファイル名順に列挙
pub fn list_table_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::FileNotFound {
            path: path_string(dir),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| IoError::FileRead {
        path: path_string(dir),
        cause: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| IoError::FileRead {
                path: path_string(dir),
                cause: e.to_string(),
            })?
            .path();
        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(TABLE_FILE_EXTENSION)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// ファイルパスからテーブル名（拡張子なしのファイル名）を取得
pub fn table_name_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
