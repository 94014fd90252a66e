// Services Layer
// パイプラインの各ステージを実行するサービス層

pub mod cleaning;
pub mod column_mapper;
pub mod inspector;
pub mod issue_stats;
pub mod loader;
pub mod schema_synthesizer;
pub mod stage_report;
