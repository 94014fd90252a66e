// Core Domain
// エンティティ、設定、カラムマップ、系譜レコードなどの純粋なドメイン定義

pub mod column_map;
pub mod config;
pub mod entity;
pub mod error;
pub mod lineage;
pub mod naming;
