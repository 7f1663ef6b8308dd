// ログ初期化 - tracing-subscriberの一度だけのセットアップ

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// ログ出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 1行1イベントの簡潔な形式
    #[default]
    Compact,
    /// 複数行の読みやすい形式
    Pretty,
    /// 構造化JSON
    Json,
}

/// tracingサブスクライバを設定（既に設定済みなら何もしない）
///
/// `RUST_LOG`があればそれに従い、なければ`default_directive`を使う。
/// ログは標準エラーへ出力し、標準出力は進捗表示とJSON結果に使う。
pub fn init_tracing(format: LogFormat, default_directive: &str) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // 他のサブスクライバが既に登録されている場合の失敗は無視する
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    let _ = TRACING_INIT.set(());
}
