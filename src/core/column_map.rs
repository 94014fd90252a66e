// カラムマップ
//
// 難読化されたCSVヘッダー（"01-03" など）を人間可読なカラム名へ
// 変換するためのJSON定義を表現します。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// 1テーブル分のマップ定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMapping {
    /// 生CSVファイル名（例: t01.csv）
    pub file: String,

    /// 出力テーブル名（例: users）
    pub table: String,

    /// カラムキー → カラム名
    #[serde(default)]
    pub columns: HashMap<String, String>,
}

impl TableMapping {
    /// 生ヘッダーからカラム名へのリネーム表を構築
    ///
    /// キー "03" はテーブルID "01" のもとで "01-03" というヘッダーに対応します。
    pub fn rename_map(&self, table_id: &str) -> HashMap<String, String> {
        self.columns
            .iter()
            .map(|(key, name)| (format!("{}-{}", table_id, key), name.clone()))
            .collect()
    }

    /// 生ヘッダーを変換（マップにないヘッダーはそのまま）
    pub fn rename(&self, table_id: &str, header: &str) -> String {
        header
            .strip_prefix(table_id)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|key| self.columns.get(key))
            .cloned()
            .unwrap_or_else(|| header.to_string())
    }
}

/// テーブルID（"01", "02", …）をキーとするマップ全体
///
/// BTreeMapにより、テーブルIDの昇順で処理されます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap {
    pub tables: BTreeMap<String, TableMapping>,
}

impl ColumnMap {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TableMapping)> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromStr for ColumnMap {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json).with_context(|| "Failed to parse column map")
    }
}
