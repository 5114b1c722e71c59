//! # Gateway 設定
//!
//! 環境変数から gateway サーバーの設定を読み込む。
//!
//! 読み込みは [`GatewayConfig::from_lookup`] に集約し、テストでは
//! 環境変数の代わりに任意のマップを渡せるようにしている。

use std::{env, time::Duration};

use thiserror::Error;

use crate::{client::CarrierToken, middleware::OriginPolicy};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CARRIER_BASE_URL: &str = "https://track.delhivery.com";
const DEFAULT_POSTAL_DIRECTORY_URL: &str = "https://api.postalpincode.in";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{name} の値が不正です: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Gateway サーバーの設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// バインドアドレス
    pub host:                 String,
    /// ポート番号
    pub port:                 u16,
    /// キャリア API トークン
    ///
    /// 未設定でも起動はする。リクエスト時に 500 を返す。
    pub carrier_token:        Option<CarrierToken>,
    /// キャリア API のベース URL
    pub carrier_base_url:     String,
    /// 郵便番号ディレクトリのベース URL
    pub postal_directory_url: String,
    /// 上流 API 呼び出しのタイムアウト
    pub upstream_timeout:     Duration,
    /// Origin 検証のモード
    pub origin_policy:        OriginPolicy,
    /// 許可する Origin の一覧
    pub allowed_origins:      Vec<String>,
}

impl GatewayConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キーから値を引く関数を使って設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("GATEWAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("GATEWAY_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "GATEWAY_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let carrier_token = lookup("DELHIVERY_TOKEN").and_then(CarrierToken::new);

        let carrier_base_url = lookup("CARRIER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CARRIER_BASE_URL.to_string());
        let postal_directory_url = lookup("POSTAL_DIRECTORY_URL")
            .unwrap_or_else(|| DEFAULT_POSTAL_DIRECTORY_URL.to_string());

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        value,
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let origin_policy = match lookup("ORIGIN_POLICY") {
            Some(value) => OriginPolicy::parse(&value).ok_or(ConfigError::InvalidValue {
                name: "ORIGIN_POLICY",
                value,
            })?,
            None => OriginPolicy::default(),
        };

        let allowed_origins = parse_origins(
            lookup("ALLOWED_ORIGINS")
                .as_deref()
                .unwrap_or(DEFAULT_ALLOWED_ORIGINS),
        );

        Ok(Self {
            host,
            port,
            carrier_token,
            carrier_base_url,
            postal_directory_url,
            upstream_timeout,
            origin_policy,
            allowed_origins,
        })
    }
}

/// カンマ区切りの Origin 一覧を分割する（空要素は捨てる）
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use maplit::hashmap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(vars: HashMap<&'static str, &'static str>) -> Result<GatewayConfig, ConfigError> {
        GatewayConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_未設定のときデフォルト値を使う() {
        let config = load(HashMap::new()).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.carrier_token.is_none());
        assert_eq!(config.carrier_base_url, "https://track.delhivery.com");
        assert_eq!(config.postal_directory_url, "https://api.postalpincode.in");
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.origin_policy, OriginPolicy::Report);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_設定値を読み込む() {
        let config = load(hashmap! {
            "GATEWAY_HOST" => "127.0.0.1",
            "GATEWAY_PORT" => "8080",
            "DELHIVERY_TOKEN" => "secret-token",
            "CARRIER_BASE_URL" => "http://carrier.test",
            "POSTAL_DIRECTORY_URL" => "http://postal.test",
            "UPSTREAM_TIMEOUT_SECS" => "3",
            "ORIGIN_POLICY" => "enforce",
            "ALLOWED_ORIGINS" => "https://shop.example.com, https://admin.example.com,",
        })
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.carrier_token.as_ref().map(CarrierToken::as_str),
            Some("secret-token")
        );
        assert_eq!(config.carrier_base_url, "http://carrier.test");
        assert_eq!(config.postal_directory_url, "http://postal.test");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.origin_policy, OriginPolicy::Enforce);
        assert_eq!(
            config.allowed_origins,
            vec!["https://shop.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn test_空のトークンは未設定として扱う() {
        let config = load(hashmap! { "DELHIVERY_TOKEN" => "" }).unwrap();

        assert!(config.carrier_token.is_none());
    }

    #[rstest]
    #[case("GATEWAY_PORT", "abc")]
    #[case("GATEWAY_PORT", "70000")]
    #[case("UPSTREAM_TIMEOUT_SECS", "0")]
    #[case("UPSTREAM_TIMEOUT_SECS", "ten")]
    #[case("ORIGIN_POLICY", "strict")]
    fn test_不正な値はエラーになる(#[case] name: &'static str, #[case] value: &'static str) {
        let result = load(hashmap! { name => value });

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                name,
                value: value.to_string(),
            }
        );
    }

    #[test]
    fn test_debug出力にトークンを含めない() {
        let config = load(hashmap! { "DELHIVERY_TOKEN" => "secret-token" }).unwrap();

        let debug = format!("{config:?}");

        assert!(!debug.contains("secret-token"));
    }
}
