//! # 外部 API クライアント
//!
//! キャリア API と郵便番号ディレクトリとの通信を担当する。

pub mod carrier;
pub mod postal_directory;

pub use carrier::{
    CarrierClient,
    CarrierClientImpl,
    CarrierError,
    CarrierToken,
    ChargesQuery,
    ChargesResponse,
};
pub use postal_directory::{
    DirectoryLookup,
    PostalDirectoryClient,
    PostalDirectoryClientImpl,
    PostalDirectoryError,
};

/// 上流 API 用の HTTP クライアントを作成する
///
/// 設定したタイムアウトを必ず適用するため、構築に失敗した場合はエラーを返す。
pub(crate) fn build_http_client(
    timeout: std::time::Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}
