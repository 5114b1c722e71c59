//! # 郵便番号ディレクトリクライアント
//!
//! キャリアに該当レコードがない PIN コードについて、公開の郵便番号
//! ディレクトリ（India Post）から所在地を引く。
//!
//! ## エンドポイント
//!
//! - `GET /pincode/{pincode}` - PIN コードに属する郵便局の一覧（認証なし）

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use shipquote_domain::Pincode;
use thiserror::Error;

use super::build_http_client;
use crate::middleware::request_id::inject_request_id;

/// 照会成功を表す `Status` の値
const STATUS_SUCCESS: &str = "Success";

/// 郵便番号ディレクトリクライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostalDirectoryError {
    /// ネットワークエラー（接続失敗・タイムアウトを含む）
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// レスポンスの形が想定と異なる
    #[error("不正なレスポンス: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PostalDirectoryError {
    fn from(err: reqwest::Error) -> Self {
        PostalDirectoryError::Network(err.to_string())
    }
}

/// 照会結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLookup {
    /// 所在地が見つかった
    Found { district: String, state: String },
    /// ディレクトリに存在しない PIN コード
    NotFound,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    #[serde(rename = "Status", default)]
    status:      Option<String>,
    #[serde(rename = "PostOffice", default)]
    post_office: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "State", default)]
    state:    Option<String>,
}

/// レスポンス本文から照会結果を組み立てる
fn interpret(entries: Vec<DirectoryEntry>) -> Result<DirectoryLookup, PostalDirectoryError> {
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| PostalDirectoryError::InvalidResponse("結果が空です".to_string()))?;

    if entry.status.as_deref() != Some(STATUS_SUCCESS) {
        return Ok(DirectoryLookup::NotFound);
    }

    let office = entry
        .post_office
        .and_then(|offices| offices.into_iter().next())
        .ok_or_else(|| PostalDirectoryError::InvalidResponse("郵便局がありません".to_string()))?;

    Ok(DirectoryLookup::Found {
        district: office.district.unwrap_or_default(),
        state:    office.state.unwrap_or_default(),
    })
}

/// 郵便番号ディレクトリクライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait PostalDirectoryClient: Send + Sync {
    /// PIN コードの所在地を照会する
    async fn lookup(&self, pincode: &Pincode) -> Result<DirectoryLookup, PostalDirectoryError>;
}

/// 郵便番号ディレクトリクライアント実装
pub struct PostalDirectoryClientImpl {
    base_url: String,
    client:   reqwest::Client,
}

impl PostalDirectoryClientImpl {
    /// 新しい PostalDirectoryClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: ディレクトリのベース URL（例: `https://api.postalpincode.in`）
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
}

#[async_trait]
impl PostalDirectoryClient for PostalDirectoryClientImpl {
    async fn lookup(&self, pincode: &Pincode) -> Result<DirectoryLookup, PostalDirectoryError> {
        let url = format!(
            "{}/pincode/{}",
            self.base_url,
            urlencoding::encode(pincode.as_str())
        );

        let response = inject_request_id(self.client.get(&url)).send().await?;
        let body = response.text().await?;

        let entries: Vec<DirectoryEntry> = serde_json::from_str(&body)
            .map_err(|e| PostalDirectoryError::InvalidResponse(e.to_string()))?;

        interpret(entries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn interpret_json(value: serde_json::Value) -> Result<DirectoryLookup, PostalDirectoryError> {
        interpret(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_成功時は先頭の郵便局の地区と州を返す() {
        let result = interpret_json(json!([{
            "Status": "Success",
            "PostOffice": [
                { "District": "Pune", "State": "Maharashtra" },
                { "District": "Other", "State": "Other" }
            ]
        }]));

        assert_eq!(
            result,
            Ok(DirectoryLookup::Found {
                district: "Pune".to_string(),
                state:    "Maharashtra".to_string(),
            })
        );
    }

    #[test]
    fn test_成功以外のステータスはnot_found() {
        let result = interpret_json(json!([{ "Status": "Error", "PostOffice": null }]));

        assert_eq!(result, Ok(DirectoryLookup::NotFound));
    }

    #[test]
    fn test_結果が空配列ならエラー() {
        assert!(matches!(
            interpret_json(json!([])),
            Err(PostalDirectoryError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_成功でも郵便局がなければエラー() {
        assert!(matches!(
            interpret_json(json!([{ "Status": "Success", "PostOffice": [] }])),
            Err(PostalDirectoryError::InvalidResponse(_))
        ));
        assert!(matches!(
            interpret_json(json!([{ "Status": "Success" }])),
            Err(PostalDirectoryError::InvalidResponse(_))
        ));
    }
}
