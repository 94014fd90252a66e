// 型マッピング
//
// 列指向テーブルの実行時型（Arrow DataType）を少数の型クラスに分類し、
// 方言ごとのSQL型文字列へ変換します。

use crate::core::config::Dialect;
use arrow::datatypes::DataType;

/// SQL型の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    /// 整数
    Integer,
    /// 浮動小数点・固定小数点
    Decimal,
    /// 真偽値
    Boolean,
    /// 日時・日付
    Timestamp,
    /// その他すべて（文字列を含む）
    Text,
}

impl ColumnClass {
    /// Arrowの型から分類
    pub fn from_data_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnClass::Integer,
            DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => ColumnClass::Decimal,
            DataType::Boolean => ColumnClass::Boolean,
            DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => {
                ColumnClass::Timestamp
            }
            _ => ColumnClass::Text,
        }
    }
}

/// 方言ごとのSQL型文字列
pub fn sql_type(dialect: Dialect, class: ColumnClass) -> &'static str {
    match (dialect, class) {
        (Dialect::SQLite, ColumnClass::Integer) => "INTEGER",
        (_, ColumnClass::Integer) => "BIGINT",
        (_, ColumnClass::Decimal) => "DECIMAL(18,2)",
        (Dialect::MySQL, ColumnClass::Boolean) => "TINYINT(1)",
        (_, ColumnClass::Boolean) => "BOOLEAN",
        (Dialect::PostgreSQL, ColumnClass::Timestamp) => "TIMESTAMP",
        (Dialect::MySQL, ColumnClass::Timestamp) => "DATETIME(6)",
        (Dialect::SQLite, ColumnClass::Timestamp) => "DATETIME",
        (Dialect::MySQL, ColumnClass::Text) => "LONGTEXT",
        (_, ColumnClass::Text) => "TEXT",
    }
}

/// Arrowの型から直接SQL型文字列へ
pub fn sql_type_for(dialect: Dialect, data_type: &DataType) -> &'static str {
    sql_type(dialect, ColumnClass::from_data_type(data_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::TimeUnit;

    #[test]
    fn test_classify() {
        assert_eq!(ColumnClass::from_data_type(&DataType::Int32), ColumnClass::Integer);
        assert_eq!(ColumnClass::from_data_type(&DataType::Float64), ColumnClass::Decimal);
        assert_eq!(ColumnClass::from_data_type(&DataType::Boolean), ColumnClass::Boolean);
        assert_eq!(
            ColumnClass::from_data_type(&DataType::Timestamp(TimeUnit::Microsecond, None)),
            ColumnClass::Timestamp
        );
        assert_eq!(ColumnClass::from_data_type(&DataType::Utf8), ColumnClass::Text);
        assert_eq!(ColumnClass::from_data_type(&DataType::Binary), ColumnClass::Text);
    }

    #[test]
    fn test_sql_type_per_dialect() {
        assert_eq!(sql_type(Dialect::PostgreSQL, ColumnClass::Integer), "BIGINT");
        assert_eq!(sql_type(Dialect::SQLite, ColumnClass::Integer), "INTEGER");
        assert_eq!(sql_type(Dialect::MySQL, ColumnClass::Decimal), "DECIMAL(18,2)");
        assert_eq!(sql_type(Dialect::MySQL, ColumnClass::Boolean), "TINYINT(1)");
        assert_eq!(sql_type(Dialect::PostgreSQL, ColumnClass::Timestamp), "TIMESTAMP");
        assert_eq!(sql_type(Dialect::MySQL, ColumnClass::Text), "LONGTEXT");
        assert_eq!(sql_type(Dialect::SQLite, ColumnClass::Text), "TEXT");
    }
}
