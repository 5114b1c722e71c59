//! # ヘルスチェックハンドラ
//!
//! `/health` は Liveness Check で、常に `"healthy"` を返す。
//! 上流 API の疎通は確認しない。

use axum::Json;
use shipquote_shared::HealthResponse;

/// gateway のヘルスチェックエンドポイント
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "サーバー稼働中", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
