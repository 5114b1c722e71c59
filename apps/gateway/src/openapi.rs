//! # OpenAPI 仕様定義
//!
//! utoipa を使用して gateway の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::OpenApi;

use crate::handler::{health, pincode, rate};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "shipquote API",
        version = "0.1.0",
        description = "配送可否照会と送料見積もりを提供する shipquote gateway の API"
    ),
    paths(
        health::health_check,
        pincode::check_pincode,
        rate::get_rate,
    ),
    tags(
        (name = "health", description = "ヘルスチェック"),
        (name = "serviceability", description = "PIN コードの配送可否照会"),
        (name = "rate", description = "送料見積もり"),
    )
)]
pub struct ApiDoc;
