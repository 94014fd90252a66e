// ロードステージ
//
// クリーニング済みテーブルをリレーショナルストアへ一括投入し、
// テーブルごとに系譜テーブルへ1行追記します。
// - 1テーブル = 1トランザクション（DROP → CREATE → 複数行INSERT）
// - INSERTは最大1000行ずつ、方言のバインド上限も超えないように分割
// - 系譜の記録はコミット後に別の文として実行

use crate::adapters::sql_quote::{max_bind_parameters, placeholder, quote_columns, quote_identifier};
use crate::adapters::table_store;
use crate::adapters::type_mapping::ColumnClass;
use crate::core::config::Dialect;
use crate::core::entity::Entity;
use crate::core::error::{DatabaseError, IoError};
use crate::core::lineage::LineageRecord;
use crate::core::naming::LINEAGE_TABLE;
use crate::services::issue_stats::issue_row_count;
use crate::services::schema_synthesizer::{PrimaryKeyPolicy, SchemaSynthesizer};
use crate::services::stage_report::{StageReport, TableReport};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;
use sqlx::AnyPool;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 1回のINSERT文に含める最大行数
pub const MAX_ROWS_PER_INSERT: usize = 1000;

/// 日時をバインドする際の文字列形式
const TIMESTAMP_BIND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// バインドする1つの値
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(Option<bool>),
    Text(Option<String>),
}

impl BindValue {
    fn bind<'q>(self, query: Query<'q, Any, AnyArguments<'q>>) -> Query<'q, Any, AnyArguments<'q>> {
        match self {
            BindValue::Integer(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::Boolean(v) => query.bind(v),
            BindValue::Text(v) => query.bind(v),
        }
    }
}

/// バインド用に型を揃えたカラム
#[derive(Debug, Clone)]
struct BindColumn {
    class: ColumnClass,
    array: ArrayRef,
}

impl BindColumn {
    fn prepare(table: &str, name: &str, array: &ArrayRef) -> Result<Self, DatabaseError> {
        let class = ColumnClass::from_data_type(array.data_type());
        let target = match class {
            ColumnClass::Integer => DataType::Int64,
            ColumnClass::Decimal => DataType::Float64,
            ColumnClass::Boolean => DataType::Boolean,
            ColumnClass::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            ColumnClass::Text => DataType::Utf8,
        };
        let array = cast(array, &target).map_err(|e| DatabaseError::UnsupportedColumn {
            table: table.to_string(),
            column: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { class, array })
    }

    fn value(&self, row: usize) -> BindValue {
        let valid = self.array.is_valid(row);
        match self.class {
            ColumnClass::Integer => BindValue::Integer(
                valid.then(|| self.array.as_primitive::<Int64Type>().value(row)),
            ),
            ColumnClass::Decimal => BindValue::Float(
                valid.then(|| self.array.as_primitive::<Float64Type>().value(row)),
            ),
            ColumnClass::Boolean => {
                BindValue::Boolean(valid.then(|| self.array.as_boolean().value(row)))
            }
            ColumnClass::Timestamp => BindValue::Text(
                valid
                    .then(|| self.array.as_primitive::<TimestampMicrosecondType>().value(row))
                    .and_then(DateTime::<Utc>::from_timestamp_micros)
                    .map(|dt| dt.naive_utc().format(TIMESTAMP_BIND_FORMAT).to_string()),
            ),
            ColumnClass::Text => BindValue::Text(
                valid.then(|| self.array.as_string::<i32>().value(row).to_string()),
            ),
        }
    }
}

/// 1文あたりの行数（バインド上限と最大行数の小さい方）
pub fn rows_per_insert(dialect: Dialect, column_count: usize) -> usize {
    (max_bind_parameters(dialect) / column_count.max(1)).clamp(1, MAX_ROWS_PER_INSERT)
}

/// ロードステージの実行サービス
#[derive(Debug, Clone)]
pub struct LoaderService {
    dialect: Dialect,
    cleaned_dir: PathBuf,
    synthesizer: SchemaSynthesizer,
}

impl LoaderService {
    pub fn new(dialect: Dialect, cleaned_dir: impl Into<PathBuf>) -> Self {
        Self {
            dialect,
            cleaned_dir: cleaned_dir.into(),
            synthesizer: SchemaSynthesizer::new(dialect),
        }
    }

    /// 全エンティティを順にロード
    ///
    /// クリーニング済みディレクトリが無い場合は何もロードせずに失敗します。
    pub async fn run(&self, pool: &AnyPool, progress: &ProgressBar) -> anyhow::Result<StageReport> {
        if !self.cleaned_dir.is_dir() {
            return Err(IoError::FileNotFound {
                path: self.cleaned_dir.display().to_string(),
            }
            .into());
        }
        self.ensure_lineage_table(pool).await?;

        let mut report = StageReport::new();
        for entity in Entity::ALL {
            report.push(self.load_entity(pool, entity, progress).await);
        }
        progress.finish_and_clear();
        Ok(report)
    }

    /// 1エンティティをロード
    pub async fn load_entity(&self, pool: &AnyPool, entity: Entity, progress: &ProgressBar) -> TableReport {
        let source = self.cleaned_dir.join(entity.file_name());
        let table = match table_store::read_table(&source) {
            Ok(table) => table,
            Err(e) if e.is_missing_input() => {
                warn!(%entity, path = %source.display(), "cleaned table not found, skipping");
                return TableReport::skipped(entity.name(), format!("{} not found", entity.file_name()));
            }
            Err(e) => {
                warn!(%entity, error = %e, "failed to read cleaned table");
                return TableReport::failed(entity.name(), e.to_string());
            }
        };

        progress.set_message(entity.name());
        progress.set_position(0);
        progress.set_length(table.num_rows() as u64);

        let errors = issue_row_count(&table);
        let result = match self.replace_table(pool, entity.name(), &table, progress).await {
            Ok(rows) => {
                let record = LineageRecord::new(entity.file_name(), rows, errors);
                self.record_lineage(pool, &record).await.map(|_| rows)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(rows) => {
                info!(%entity, rows, errors, "loaded");
                TableReport::processed(entity.name(), entity.name(), rows, errors)
            }
            Err(e) => {
                warn!(%entity, error = %e, "failed to load table");
                TableReport::failed(entity.name(), e.to_string())
            }
        }
    }

    /// テーブルを作り直して全行を投入（1トランザクション）
    pub async fn replace_table(
        &self,
        pool: &AnyPool,
        table_name: &str,
        table: &RecordBatch,
        progress: &ProgressBar,
    ) -> Result<usize, DatabaseError> {
        let schema = table.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let columns = names
            .iter()
            .zip(table.columns())
            .map(|(name, array)| BindColumn::prepare(table_name, name, array))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await.map_err(|e| DatabaseError::Transaction {
            message: format!("Failed to start transaction for '{}': {}", table_name, e),
        })?;

        let drop_sql = self.synthesizer.build_drop_table(table_name);
        let create_sql = self
            .synthesizer
            .build_create_table(table_name, &schema, PrimaryKeyPolicy::None);
        for sql in [drop_sql, create_sql] {
            sqlx::query(&sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::Query {
                    message: format!("Failed to prepare table '{}': {}", table_name, e),
                    sql: Some(sql.clone()),
                })?;
        }

        let chunk_rows = rows_per_insert(self.dialect, columns.len());
        let mut start = 0;
        while start < table.num_rows() && !columns.is_empty() {
            let end = (start + chunk_rows).min(table.num_rows());
            let sql = self.build_insert_sql(table_name, &names, &columns, end - start);

            let mut query = sqlx::query(&sql);
            for row in start..end {
                for column in &columns {
                    query = column.value(row).bind(query);
                }
            }
            query.execute(&mut *tx).await.map_err(|e| DatabaseError::Query {
                message: format!(
                    "Failed to insert rows {}..{} into '{}': {}",
                    start, end, table_name, e
                ),
                sql: None,
            })?;

            debug!(table = table_name, start, end, "inserted chunk");
            progress.inc((end - start) as u64);
            start = end;
        }

        tx.commit().await.map_err(|e| DatabaseError::Transaction {
            message: format!("Failed to commit '{}': {}", table_name, e),
        })?;

        Ok(table.num_rows())
    }

    /// 複数行INSERT文を生成
    fn build_insert_sql(
        &self,
        table_name: &str,
        names: &[&str],
        columns: &[BindColumn],
        rows: usize,
    ) -> String {
        let mut tuples = Vec::with_capacity(rows);
        let mut position = 0;
        for _ in 0..rows {
            let mut values = Vec::with_capacity(columns.len());
            for column in columns {
                position += 1;
                values.push(self.value_placeholder(column.class, position));
            }
            tuples.push(format!("({})", values.join(", ")));
        }

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            quote_identifier(self.dialect, table_name),
            quote_columns(self.dialect, names),
            tuples.join(", ")
        )
    }

    /// 日時は文字列でバインドするため、PostgreSQLでは明示的に型変換する
    fn value_placeholder(&self, class: ColumnClass, position: usize) -> String {
        let marker = placeholder(self.dialect, position);
        match (self.dialect, class) {
            (Dialect::PostgreSQL, ColumnClass::Timestamp) => format!("CAST({} AS TIMESTAMP)", marker),
            _ => marker,
        }
    }

    /// 系譜テーブルが無ければ作成
    pub async fn ensure_lineage_table(&self, pool: &AnyPool) -> Result<(), DatabaseError> {
        let sql = self.synthesizer.build_lineage_table(true);
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Query {
                message: format!("Failed to create lineage table: {}", e),
                sql: Some(sql.clone()),
            })
    }

    /// 系譜レコードを1行追記
    pub async fn record_lineage(
        &self,
        pool: &AnyPool,
        record: &LineageRecord,
    ) -> Result<(), DatabaseError> {
        let markers: Vec<String> = (1..=5).map(|i| placeholder(self.dialect, i)).collect();
        let sql = format!(
            "INSERT INTO {} (source_file, total_rows, processed_rows, errors, notes) VALUES ({})",
            quote_identifier(self.dialect, LINEAGE_TABLE),
            markers.join(", ")
        );

        sqlx::query(&sql)
            .bind(record.source_file.clone())
            .bind(record.total_rows)
            .bind(record.processed_rows)
            .bind(record.errors)
            .bind(record.notes.clone())
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Query {
                message: format!("Failed to record lineage for '{}': {}", record.source_file, e),
                sql: Some(sql.clone()),
            })
    }
}
