// Bankflowライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（エンティティ、設定、カラムマップ、エラー、命名規約）
// - adapters: テーブルファイルとデータベースへのアクセスを抽象化
// - services: パイプラインの各ステージ（decode / clean / load / schema / 検査）
// - logging: tracingの初期化

pub mod adapters;
pub mod cli;
pub mod core;
pub mod logging;
pub mod services;
