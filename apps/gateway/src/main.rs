//! # shipquote gateway サーバー
//!
//! キャリア（Delhivery）API を中継する HTTP サーバー。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │  Storefront  │────▶│   gateway    │────▶│ Carrier API          │
//! │  (Browser)   │     │  port: 3000  │     │ (pin-codes, charges) │
//! └──────────────┘     └──────────────┘     └──────────────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────────┐
//!                      │ Postal directory │
//!                      │ (fallback)       │
//!                      └──────────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `GATEWAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `GATEWAY_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DELHIVERY_TOKEN` | **Yes** | キャリア API トークン（未設定時は各 API が 500 を返す） |
//! | `CARRIER_BASE_URL` | No | キャリア API のベース URL |
//! | `POSTAL_DIRECTORY_URL` | No | 郵便番号ディレクトリのベース URL |
//! | `UPSTREAM_TIMEOUT_SECS` | No | 上流 API のタイムアウト秒数（デフォルト: `10`） |
//! | `ORIGIN_POLICY` | No | `off` / `report` / `enforce`（デフォルト: `report`） |
//! | `ALLOWED_ORIGINS` | No | 許可する Origin（カンマ区切り） |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! DELHIVERY_TOKEN=... cargo run -p shipquote-gateway
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use shipquote_gateway::{app_builder::build_app, config::GatewayConfig};
use shipquote_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// gateway サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("gateway");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = %tracing_config.service_name).entered();

    let config = GatewayConfig::from_env().context("設定の読み込みに失敗しました")?;

    if config.carrier_token.is_none() {
        tracing::warn!(
            "DELHIVERY_TOKEN が設定されていません。配送可否照会と送料見積もりは 500 を返します"
        );
    }

    tracing::info!(
        origin_policy = ?config.origin_policy,
        "gateway サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let app = build_app(&config).context("上流 API クライアントの構築に失敗しました")?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("gateway サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
