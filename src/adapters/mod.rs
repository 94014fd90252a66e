// Adapters
// データベースとファイルシステムへのアクセスを抽象化

pub mod connection_string;
pub mod database;
pub mod database_introspector;
pub mod sql_quote;
pub mod table_store;
pub mod type_mapping;
