//! # アプリケーション構築
//!
//! DI（クライアント・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use shipquote_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    client::{CarrierClient, CarrierClientImpl, PostalDirectoryClient, PostalDirectoryClientImpl},
    config::GatewayConfig,
    handler::{RateState, ServiceabilityState, check_pincode, get_rate, health_check},
    middleware::{OriginState, no_cache, origin_policy, request_id::store_request_id},
    usecase::{RateUseCaseImpl, ServiceabilityUseCaseImpl},
};

/// 設定から上流クライアントを作成し、ルーターを構築する
///
/// # エラー
///
/// 上流 API 用の HTTP クライアントを構築できない場合
pub fn build_app(config: &GatewayConfig) -> Result<Router, reqwest::Error> {
    let carrier: Arc<dyn CarrierClient> = Arc::new(CarrierClientImpl::new(
        &config.carrier_base_url,
        config.upstream_timeout,
    )?);
    let postal_directory: Arc<dyn PostalDirectoryClient> = Arc::new(
        PostalDirectoryClientImpl::new(&config.postal_directory_url, config.upstream_timeout)?,
    );

    Ok(build_app_with_clients(config, carrier, postal_directory))
}

/// 上流クライアントを受け取り、ユースケース → State → Router の順に組み立てる
///
/// テストではスタブのクライアントを渡す。
pub fn build_app_with_clients(
    config: &GatewayConfig,
    carrier: Arc<dyn CarrierClient>,
    postal_directory: Arc<dyn PostalDirectoryClient>,
) -> Router {
    // トークンは各ユースケースに構築時に渡す（ハンドラから環境変数は読まない）
    let serviceability_state = Arc::new(ServiceabilityState {
        usecase: ServiceabilityUseCaseImpl::new(
            carrier.clone(),
            postal_directory,
            config.carrier_token.clone(),
        ),
    });
    let rate_state = Arc::new(RateState {
        usecase: RateUseCaseImpl::new(carrier, config.carrier_token.clone()),
    });

    let origin_state = OriginState {
        policy:          config.origin_policy,
        allowed_origins: config.allowed_origins.clone().into(),
    };

    Router::new()
        .route("/health", get(health_check))
        // 配送可否照会 API（/api 配下にも同じハンドラを公開する）
        .merge(
            Router::new()
                .route("/check-pincode", get(check_pincode))
                .route("/api/check-pincode", get(check_pincode))
                .with_state(serviceability_state),
        )
        // 送料見積もり API
        .merge(
            Router::new()
                .route("/get-rate", post(get_rate))
                .route("/api/get-rate", post(get_rate))
                .with_state(rate_state),
        )
        .layer(from_fn_with_state(origin_state, origin_policy))
        // キャッシュ制御: 見積額や配送可否がキャッシュされないようにする
        .layer(from_fn(no_cache))
        // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 5. store_request_id: task-local に保存し、上流 API へのヘッダー伝播に使用
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
