//! # Origin 検証ミドルウェア
//!
//! リクエストの `Origin`（なければ `Referer`）が許可リストのいずれかで
//! 始まるかを検証する。
//!
//! | モード | 許可リスト外のリクエスト |
//! |--------|--------------------------|
//! | `off` | 検証しない |
//! | `report` | 警告ログを出して通す |
//! | `enforce` | 403 で拒否する |
//!
//! `Origin` と `Referer` のどちらもないリクエストは常に通す。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;

/// Origin 検証をスキップするパス
const ORIGIN_SKIP_PATHS: &[&str] = &["/health"];

/// Origin 検証のモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginPolicy {
    /// 検証しない
    Off,
    /// 許可リスト外を警告ログに出すのみ
    #[default]
    Report,
    /// 許可リスト外を拒否する
    Enforce,
}

impl OriginPolicy {
    /// 設定値からモードを決定する（不明な値は `None`）
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" => Some(Self::Off),
            "report" => Some(Self::Report),
            "enforce" => Some(Self::Enforce),
            _ => None,
        }
    }
}

/// Origin 検証の状態
#[derive(Debug, Clone)]
pub struct OriginState {
    pub policy:          OriginPolicy,
    pub allowed_origins: Arc<[String]>,
}

/// リクエスト元を取得する（`Origin` 優先、空なら `Referer`）
fn request_origin(headers: &HeaderMap) -> Option<String> {
    [header::ORIGIN, header::REFERER]
        .iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn is_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins
        .iter()
        .any(|allowed| origin.starts_with(allowed.as_str()))
}

/// Origin 検証ミドルウェア
pub async fn origin_policy(
    State(state): State<OriginState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.policy == OriginPolicy::Off || ORIGIN_SKIP_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let Some(origin) = request_origin(request.headers()) else {
        return next.run(request).await;
    };

    if is_allowed(&origin, &state.allowed_origins) {
        return next.run(request).await;
    }

    if state.policy == OriginPolicy::Enforce {
        tracing::warn!(origin = %origin, "許可されていない Origin からのリクエストを拒否しました");
        return GatewayError::OriginRejected.into_response();
    }

    tracing::warn!(origin = %origin, "許可されていない Origin からのリクエストです");
    next.run(request).await
}
