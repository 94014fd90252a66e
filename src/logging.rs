// ログ初期化
//
// tracingのイベントを標準エラー出力へ書き出します。
// 標準出力はコマンドのステータス行専用です。

use crate::core::naming::APP_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` が無い場合の既定フィルター
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    format!("{}={}", APP_NAME, level)
}

/// グローバルなsubscriberを設定（2回目以降の呼び出しは無視）
pub fn init_logging(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
