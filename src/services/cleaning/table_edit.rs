// カラム単位のテーブル編集
//
// 既存カラムは同じ位置で置き換え、新しいカラムは末尾に追加します。
// 正規化を出力へ再適用しても同じカラム順になるのはこのためです。

use crate::core::entity::Entity;
use crate::core::error::CleaningError;
use arrow::array::ArrayRef;
use arrow::datatypes::{Field, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// 編集中のテーブル
#[derive(Debug, Clone)]
pub struct TableEdit {
    fields: Vec<FieldRef>,
    columns: Vec<ArrayRef>,
    num_rows: usize,
}

impl TableEdit {
    pub fn new(table: &RecordBatch) -> Self {
        Self {
            fields: table.schema().fields().iter().cloned().collect(),
            columns: table.columns().to_vec(),
            num_rows: table.num_rows(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// カラムが存在するか
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// カラムを取得
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.position(name).map(|index| &self.columns[index])
    }

    /// 候補のうち最初に存在するカラム名を返す
    pub fn first_present<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates
            .iter()
            .copied()
            .find(|name| self.has_column(name))
    }

    /// カラムを置き換え、無ければ末尾に追加
    pub fn set_column(&mut self, name: &str, array: ArrayRef, nullable: bool) {
        let field = Arc::new(Field::new(name, array.data_type().clone(), nullable));
        match self.position(name) {
            Some(index) => {
                self.fields[index] = field;
                self.columns[index] = array;
            }
            None => {
                self.fields.push(field);
                self.columns.push(array);
            }
        }
    }

    /// 存在するカラムにだけ変換を適用（無いカラムは作らない）
    pub fn convert<F>(&mut self, name: &str, convert: F)
    where
        F: Fn(&ArrayRef) -> ArrayRef,
    {
        if let Some(index) = self.position(name) {
            let converted = convert(&self.columns[index]);
            self.fields[index] = Arc::new(Field::new(
                name,
                converted.data_type().clone(),
                true,
            ));
            self.columns[index] = converted;
        }
    }

    /// テーブルを組み立てる
    pub fn finish(self, entity: Entity) -> Result<RecordBatch, CleaningError> {
        let schema = Arc::new(Schema::new(self.fields));
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows));
        RecordBatch::try_new_with_options(schema, self.columns, &options).map_err(|e| {
            CleaningError::Assembly {
                entity: entity.to_string(),
                cause: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, StringArray};

    fn table() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("status", Arc::new(StringArray::from(vec!["active", "blocked"])) as ArrayRef),
            ("card_status", Arc::new(StringArray::from(vec!["x", "y"])) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_present_respects_priority() {
        let edit = TableEdit::new(&table());
        assert_eq!(
            edit.first_present(&["is_blocked", "blocked", "card_status", "status"]),
            Some("card_status")
        );
        assert_eq!(edit.first_present(&["is_blocked"]), None);
    }

    #[test]
    fn test_set_column_replaces_in_place() {
        let mut edit = TableEdit::new(&table());
        let flags: ArrayRef = Arc::new(BooleanArray::from(vec![false, true]));

        edit.set_column("status", flags.clone(), false);
        edit.set_column("is_blocked", flags, false);
        let batch = edit.finish(Entity::Cards).unwrap();

        let names: Vec<&String> = batch.schema_ref().fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["status", "card_status", "is_blocked"]);
    }

    #[test]
    fn test_convert_skips_absent_column() {
        let mut edit = TableEdit::new(&table());
        edit.convert("balance", |array| array.clone());
        let batch = edit.finish(Entity::Cards).unwrap();
        assert_eq!(batch.num_columns(), 2);
    }
}
