//! # キャッシュ制御ミドルウェア
//!
//! 見積額や配送可否はリクエストごとに変わるため、
//! 全レスポンスに `Cache-Control: no-store` を設定する。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// レスポンスに `Cache-Control: no-store` を付与する
///
/// ハンドラが独自に設定した値も上書きする。
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
