//! テスト共通フィクスチャ
//!
//! ルーターを通した統合テストで共通利用するスタブクライアント・設定・
//! リクエスト送信ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::Value;
use shipquote_domain::{Pincode, ServiceabilityRecord};
use shipquote_gateway::{
    app_builder::build_app_with_clients,
    client::{
        CarrierClient,
        CarrierError,
        CarrierToken,
        ChargesQuery,
        ChargesResponse,
        DirectoryLookup,
        PostalDirectoryClient,
        PostalDirectoryError,
    },
    config::GatewayConfig,
};
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-token";

// --- スタブクライアント ---

pub struct StubCarrier {
    pub lookup:        Result<Option<ServiceabilityRecord>, CarrierError>,
    pub charges:       Result<ChargesResponse, CarrierError>,
    pub lookup_calls:  AtomicUsize,
    pub charges_calls: AtomicUsize,
    pub last_query:    Mutex<Option<ChargesQuery>>,
}

impl StubCarrier {
    pub fn empty() -> Self {
        Self {
            lookup:        Ok(None),
            charges:       Ok(ChargesResponse::new(Value::Array(vec![]))),
            lookup_calls:  AtomicUsize::new(0),
            charges_calls: AtomicUsize::new(0),
            last_query:    Mutex::new(None),
        }
    }

    pub fn with_record(record: ServiceabilityRecord) -> Self {
        Self {
            lookup: Ok(Some(record)),
            ..Self::empty()
        }
    }

    pub fn with_charges(body: Value) -> Self {
        Self {
            charges: Ok(ChargesResponse::new(body)),
            ..Self::empty()
        }
    }

    pub fn failing(err: CarrierError) -> Self {
        Self {
            lookup: Err(err.clone()),
            charges: Err(err),
            ..Self::empty()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst) + self.charges_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierClient for StubCarrier {
    async fn lookup_pincode(
        &self,
        _token: &CarrierToken,
        _pincode: &Pincode,
    ) -> Result<Option<ServiceabilityRecord>, CarrierError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup.clone()
    }

    async fn fetch_charges(
        &self,
        _token: &CarrierToken,
        query: &ChargesQuery,
    ) -> Result<ChargesResponse, CarrierError> {
        self.charges_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.charges.clone()
    }
}

pub struct StubDirectory {
    pub result: Result<DirectoryLookup, PostalDirectoryError>,
    pub calls:  AtomicUsize,
}

impl StubDirectory {
    pub fn returning(result: Result<DirectoryLookup, PostalDirectoryError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostalDirectoryClient for StubDirectory {
    async fn lookup(&self, _pincode: &Pincode) -> Result<DirectoryLookup, PostalDirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

// --- 設定 ---

/// トークン設定済みのテスト用設定
pub fn config() -> GatewayConfig {
    config_with(&[("DELHIVERY_TOKEN", TEST_TOKEN)])
}

/// 指定した環境変数だけを持つテスト用設定
pub fn config_with(vars: &[(&str, &str)]) -> GatewayConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    GatewayConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// スタブを組み込んだルーターを構築する
pub fn app(
    config: &GatewayConfig,
    carrier: &Arc<StubCarrier>,
    directory: &Arc<StubDirectory>,
) -> Router {
    build_app_with_clients(config, carrier.clone(), directory.clone())
}

// --- リクエスト送信 ---

pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: HeaderMap,
    pub body:    Value,
}

/// ルーターにリクエストを 1 件送り、JSON 本文を読み取る
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
