//! # キャリア API クライアントのテスト
//!
//! モックサーバーに対して実際に HTTP を送り、パス・クエリ・認証ヘッダーと
//! レスポンス本文の解釈を検証する。

use std::time::Duration;

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use shipquote_domain::{CodAmount, PaymentMode, Pincode, ServiceabilityRecord};
use shipquote_gateway::client::{
    CarrierClient,
    CarrierClientImpl,
    CarrierError,
    CarrierToken,
    ChargesQuery,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn token() -> CarrierToken {
    CarrierToken::new("secret-token".to_string()).unwrap()
}

fn pincode(value: &str) -> Pincode {
    Pincode::parse(value).unwrap()
}

fn charges_query(payment_mode: PaymentMode, cod_amount: f64) -> ChargesQuery {
    ChargesQuery {
        pickup_pincode: "110001".to_string(),
        delivery_pincode: "400001".to_string(),
        weight: "500".to_string(),
        payment_mode,
        cod_amount: CodAmount::new(cod_amount),
    }
}

#[tokio::test]
async fn test_pinコード照会はトークン付きでfilter_codesを送る() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/c/api/pin-codes/json/")
                .query_param("filter_codes", "110001")
                .header("authorization", "Token secret-token");
            then.status(200).json_body(json!({
                "delivery_codes": [{
                    "postal_code": {
                        "district": "New Delhi",
                        "state_code": "DL",
                        "pickup": "Y",
                        "cod": "N",
                        "pre_paid": "Y",
                        "cash": "N"
                    }
                }]
            }));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let record = sut
        .lookup_pincode(&token(), &pincode("110001"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        record,
        Some(ServiceabilityRecord {
            locality:   "New Delhi".to_string(),
            state_code: "DL".to_string(),
            pickup:     true,
            cod:        false,
            pre_paid:   true,
            cash:       false,
        })
    );
}

#[tokio::test]
async fn test_delivery_codesが空なら該当なし() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/c/api/pin-codes/json/");
            then.status(200).json_body(json!({ "delivery_codes": [] }));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let record = sut
        .lookup_pincode(&token(), &pincode("999999"))
        .await
        .unwrap();

    assert_eq!(record, None);
}

#[tokio::test]
async fn test_jsonでない照会レスポンスはinvalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/c/api/pin-codes/json/");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let result = sut.lookup_pincode(&token(), &pincode("110001")).await;

    assert!(matches!(result, Err(CarrierError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_見積もりは固定パラメータと照会条件を送る() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/kinko/v1/invoice/charges/.json")
                .query_param("md", "S")
                .query_param("ss", "Delivered")
                .query_param("d_pin", "400001")
                .query_param("o_pin", "110001")
                .query_param("cgm", "500")
                .query_param("pt", "COD")
                .query_param("cod", "1500")
                .header("authorization", "Token secret-token");
            then.status(200)
                .json_body(json!([{ "total_amount": 95.5, "charge_DL": 40 }]));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let response = sut
        .fetch_charges(&token(), &charges_query(PaymentMode::Cod, 1500.0))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.total_amount(), Some(95.5));
}

#[tokio::test]
async fn test_前払いはpre_paidコードで照会する() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/kinko/v1/invoice/charges/.json")
                .query_param("pt", "Pre-paid")
                .query_param("cod", "0");
            then.status(200)
                .json_body(json!([{ "total_amount": "100.00" }]));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let response = sut
        .fetch_charges(&token(), &charges_query(PaymentMode::Prepaid, 0.0))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.total_amount(), Some(100.0));
}

#[tokio::test]
async fn test_エラー本文はステータスに関わらずそのまま返す() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/kinko/v1/invoice/charges/.json");
            then.status(400)
                .json_body(json!({ "error": "Invalid origin pin" }));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let response = sut
        .fetch_charges(&token(), &charges_query(PaymentMode::Prepaid, 0.0))
        .await
        .unwrap();

    assert_eq!(response.total_amount(), None);
    assert_eq!(response.error_text(), "Invalid origin pin");
}

#[tokio::test]
async fn test_jsonでない見積もりレスポンスはinvalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/kinko/v1/invoice/charges/.json");
            then.status(200).body("Service Unavailable");
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let result = sut
        .fetch_charges(&token(), &charges_query(PaymentMode::Prepaid, 0.0))
        .await;

    assert!(matches!(result, Err(CarrierError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_タイムアウトはネットワークエラー() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/c/api/pin-codes/json/");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "delivery_codes": [] }));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), Duration::from_millis(50)).unwrap();

    let result = sut.lookup_pincode(&token(), &pincode("110001")).await;

    assert!(matches!(result, Err(CarrierError::Network(_))));
}

#[tokio::test]
async fn test_文字列でない項目を含む照会レスポンスも判定できる() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/c/api/pin-codes/json/");
            then.status(200).json_body(json!({
                "delivery_codes": [
                    {
                        "postal_code": {
                            "district": "New Delhi",
                            "state_code": "DL",
                            "pickup": true,
                            "pre_paid": "Y",
                            "pin": 110001
                        }
                    },
                    { "postal_code": { "district": 42, "cod": null } }
                ]
            }));
        })
        .await;
    let sut = CarrierClientImpl::new(&server.base_url(), TIMEOUT).unwrap();

    let record = sut
        .lookup_pincode(&token(), &pincode("110001"))
        .await
        .unwrap();

    assert_eq!(
        record,
        Some(ServiceabilityRecord {
            locality:   "New Delhi".to_string(),
            state_code: "DL".to_string(),
            pickup:     false,
            cod:        false,
            pre_paid:   true,
            cash:       false,
        })
    );
}
