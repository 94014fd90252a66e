// エンティティ定義
//
// パイプライン全段で追跡される論理テーブルの閉じた集合です。
// 新しいエンティティの追加はこの列挙型と正規化ディスパッチの両方に現れます。

use crate::core::naming;
use anyhow::anyhow;
use std::fmt;
use std::str::FromStr;

/// 既知のエンティティ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Users,
    Cards,
    Transactions,
    Logs,
    Reports,
    ScheduledPayments,
}

impl Entity {
    /// 処理順に並べた全エンティティ
    pub const ALL: [Entity; 6] = [
        Entity::Users,
        Entity::Cards,
        Entity::Transactions,
        Entity::Logs,
        Entity::Reports,
        Entity::ScheduledPayments,
    ];

    /// エンティティ名（テーブル名と同一）
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Cards => "cards",
            Entity::Transactions => "transactions",
            Entity::Logs => "logs",
            Entity::Reports => "reports",
            Entity::ScheduledPayments => "scheduled_payments",
        }
    }

    /// 中間ファイル名（users -> users.parquet）
    pub fn file_name(&self) -> String {
        naming::table_file_name(self.name())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .iter()
            .copied()
            .find(|entity| entity.name() == s)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown entity: {}. Known entities: {}",
                    s,
                    Entity::ALL
                        .iter()
                        .map(|e| e.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}
