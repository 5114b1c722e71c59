//! # キャリア API クライアント
//!
//! gateway からキャリア（Delhivery）API への通信を担当する。
//!
//! ## エンドポイント
//!
//! - `GET /c/api/pin-codes/json/?filter_codes=...` - PIN コードの配送可否
//! - `GET /api/kinko/v1/invoice/charges/.json` - 送料見積もり
//!
//! どちらも HTTP ステータスは見ず、レスポンス本文を JSON として解釈する。
//! キャリアはエラー時も本文に JSON を返すため、判定は本文の内容で行う。

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shipquote_domain::{CodAmount, PaymentMode, Pincode, ServiceabilityRecord, pricing};
use thiserror::Error;

use super::build_http_client;
use crate::middleware::request_id::inject_request_id;

/// 上流が理由を返さなかった場合の見積もり失敗メッセージ
const RATE_FETCH_FAILED: &str = "Rate fetch failed";

/// キャリア API クライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarrierError {
    /// ネットワークエラー（接続失敗・タイムアウトを含む）
    #[error("{0}")]
    Network(String),

    /// レスポンス本文が JSON として解釈できない
    #[error("{0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CarrierError {
    fn from(err: reqwest::Error) -> Self {
        CarrierError::Network(err.to_string())
    }
}

/// キャリア API トークン
///
/// 空文字列は未設定として扱う。`Debug` 出力では値を伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct CarrierToken(String);

impl CarrierToken {
    /// 空でなければトークンを作成する
    pub fn new(value: String) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl fmt::Debug for CarrierToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CarrierToken(***)")
    }
}

// --- リクエスト/レスポンス型 ---

/// 送料見積もりの照会条件
///
/// PIN コードと重量はリクエストの値をそのまま転送する。
#[derive(Debug, Clone, PartialEq)]
pub struct ChargesQuery {
    pub pickup_pincode:   String,
    pub delivery_pincode: String,
    pub weight:           String,
    pub payment_mode:     PaymentMode,
    pub cod_amount:       CodAmount,
}

/// PIN コード照会レスポンス
///
/// 要素の形はキャリア側で揺れるため、`delivery_codes` は型を固定せずに受け取り、
/// 先頭要素だけを [`normalize_delivery_code`] で正規化する。
#[derive(Debug, Deserialize)]
struct PincodeLookupResponse {
    #[serde(default)]
    delivery_codes: Option<Value>,
}

impl PincodeLookupResponse {
    fn first_record(&self) -> Option<ServiceabilityRecord> {
        self.delivery_codes
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|codes| codes.first())
            .map(normalize_delivery_code)
    }
}

/// `delivery_codes` の要素を [`ServiceabilityRecord`] に正規化する
///
/// ネストした `postal_code` があればそちらを使い、なければ要素そのものを使う。
/// 文字列でない項目は未設定として扱う。
fn normalize_delivery_code(entry: &Value) -> ServiceabilityRecord {
    let info = match entry.get("postal_code") {
        Some(nested) if is_truthy(nested) => nested,
        _ => entry,
    };

    let locality = text_field(info, "district")
        .or_else(|| text_field(info, "city"))
        .unwrap_or_default()
        .to_string();

    ServiceabilityRecord {
        locality,
        state_code: text_field(info, "state_code")
            .unwrap_or_default()
            .to_string(),
        pickup: is_yes(info, "pickup"),
        cod: is_yes(info, "cod"),
        pre_paid: is_yes(info, "pre_paid"),
        cash: is_yes(info, "cash"),
    }
}

/// 空でない文字列の項目のみ取り出す
fn text_field<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    info.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

fn is_yes(info: &Value, key: &str) -> bool {
    info.get(key).is_some_and(|v| v == "Y")
}

/// 送料見積もりレスポンス（JSON 本文そのもの）
///
/// 成功時は配列、失敗時は `error` を持つオブジェクトが返るため、
/// 型を固定せずに保持する。
#[derive(Debug, Clone, PartialEq)]
pub struct ChargesResponse(Value);

impl ChargesResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// 先頭要素の `total_amount` を数値として取り出す
    ///
    /// 値がない・`null`・`false`・`0`・空文字列、または数値として
    /// 解釈できない場合は `None`。
    pub fn total_amount(&self) -> Option<f64> {
        let total = self.0.get(0)?.get("total_amount").filter(|v| is_truthy(v))?;
        match total {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => pricing::parse_leading_decimal(s),
            _ => None,
        }
    }

    /// 見積もり失敗時に返すメッセージ
    ///
    /// 本文が `error` を持つオブジェクトならその内容、なければ既定の文言。
    pub fn error_text(&self) -> String {
        match self.0.get("error").filter(|v| is_truthy(v)) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => RATE_FETCH_FAILED.to_string(),
        }
    }
}

/// 値が「空でない」とみなせるか（`null`・`false`・`0`・空文字列は偽）
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// キャリア API クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// PIN コードの配送可否情報を取得する
    ///
    /// キャリアに該当レコードがない場合は `Ok(None)`。
    async fn lookup_pincode(
        &self,
        token: &CarrierToken,
        pincode: &Pincode,
    ) -> Result<Option<ServiceabilityRecord>, CarrierError>;

    /// 送料見積もりを取得する
    ///
    /// 本文が JSON でない場合は `CarrierError::InvalidResponse`。
    async fn fetch_charges(
        &self,
        token: &CarrierToken,
        query: &ChargesQuery,
    ) -> Result<ChargesResponse, CarrierError>;
}

/// キャリア API クライアント実装
pub struct CarrierClientImpl {
    base_url: String,
    client:   reqwest::Client,
}

impl CarrierClientImpl {
    /// 新しい CarrierClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: キャリア API のベース URL（例: `https://track.delhivery.com`）
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    ///
    /// # エラー
    ///
    /// HTTP クライアント（TLS バックエンド）を初期化できない場合
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client:   build_http_client(timeout)?,
        })
    }

    /// 認証ヘッダー付きで GET し、本文を文字列で返す
    async fn get_text(
        &self,
        token: &CarrierToken,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, CarrierError> {
        let request = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .header(reqwest::header::ACCEPT, "application/json");

        let response = inject_request_id(request).send().await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CarrierClient for CarrierClientImpl {
    async fn lookup_pincode(
        &self,
        token: &CarrierToken,
        pincode: &Pincode,
    ) -> Result<Option<ServiceabilityRecord>, CarrierError> {
        let url = format!("{}/c/api/pin-codes/json/", self.base_url);
        let body = self
            .get_text(token, &url, &[("filter_codes", pincode.to_string())])
            .await?;

        let parsed: PincodeLookupResponse = serde_json::from_str(&body)
            .map_err(|e| CarrierError::InvalidResponse(e.to_string()))?;

        Ok(parsed.first_record())
    }

    async fn fetch_charges(
        &self,
        token: &CarrierToken,
        query: &ChargesQuery,
    ) -> Result<ChargesResponse, CarrierError> {
        let url = format!("{}/api/kinko/v1/invoice/charges/.json", self.base_url);
        let params = [
            ("md", "S".to_string()),
            ("ss", "Delivered".to_string()),
            ("d_pin", query.delivery_pincode.clone()),
            ("o_pin", query.pickup_pincode.clone()),
            ("cgm", query.weight.clone()),
            ("pt", query.payment_mode.carrier_code().to_string()),
            ("cod", query.cod_amount.to_string()),
        ];

        let body = self.get_text(token, &url, &params).await?;

        serde_json::from_str(&body)
            .map(ChargesResponse::new)
            .map_err(|e| CarrierError::InvalidResponse(e.to_string()))
    }
}
