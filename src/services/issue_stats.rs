// 検証タグの集計
//
// `<field>_issue` カラムのいずれかに値がある行を「エラー行」として数えます。

use crate::core::naming::is_issue_column;
use arrow::array::{Array, ArrayRef};
use arrow::record_batch::RecordBatch;

/// 検証タグカラムを列挙
pub fn issue_columns(table: &RecordBatch) -> Vec<(&str, &ArrayRef)> {
    table
        .schema_ref()
        .fields()
        .iter()
        .zip(table.columns())
        .filter(|(field, _)| is_issue_column(field.name()))
        .map(|(field, column)| (field.name().as_str(), column))
        .collect()
}

/// いずれかの検証タグが立っている行数
pub fn issue_row_count(table: &RecordBatch) -> usize {
    let columns = issue_columns(table);
    if columns.is_empty() {
        return 0;
    }

    (0..table.num_rows())
        .filter(|&row| columns.iter().any(|(_, column)| column.is_valid(row)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::StringArray;
    use std::sync::Arc;

    #[test]
    fn test_rows_with_any_issue_counted_once() {
        let table = RecordBatch::try_from_iter(vec![
            (
                "phone_number_issue",
                Arc::new(StringArray::from(vec![Some("bad_format"), None, Some("bad_format")])) as ArrayRef,
            ),
            (
                "email_issue",
                Arc::new(StringArray::from(vec![Some("bad_format"), None, None])) as ArrayRef,
            ),
            (
                "email",
                Arc::new(StringArray::from(vec![Some("x"), Some("a@b.com"), None])) as ArrayRef,
            ),
        ])
        .unwrap();

        assert_eq!(issue_columns(&table).len(), 2);
        assert_eq!(issue_row_count(&table), 2);
    }

    #[test]
    fn test_no_issue_columns() {
        let table = RecordBatch::try_from_iter(vec![(
            "message",
            Arc::new(StringArray::from(vec![Some("ok")])) as ArrayRef,
        )])
        .unwrap();

        assert_eq!(issue_row_count(&table), 0);
    }
}
