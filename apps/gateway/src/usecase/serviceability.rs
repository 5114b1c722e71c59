//! 配送可否照会ユースケース

use std::sync::Arc;

use shipquote_domain::{Pincode, ServiceType, Serviceability};

use crate::{
    client::{CarrierClient, CarrierToken, DirectoryLookup, PostalDirectoryClient},
    error::GatewayError,
};

/// トークン未設定時のメッセージ
const TOKEN_MISSING: &str = "Server Error: Token Missing";

/// 配送可否照会ユースケース
pub struct ServiceabilityUseCaseImpl {
    carrier:          Arc<dyn CarrierClient>,
    postal_directory: Arc<dyn PostalDirectoryClient>,
    token:            Option<CarrierToken>,
}

impl ServiceabilityUseCaseImpl {
    pub fn new(
        carrier: Arc<dyn CarrierClient>,
        postal_directory: Arc<dyn PostalDirectoryClient>,
        token: Option<CarrierToken>,
    ) -> Self {
        Self {
            carrier,
            postal_directory,
            token,
        }
    }

    /// PIN コードの配送可否を判定する
    ///
    /// 1. トークンが設定されていることを確認
    /// 2. PIN コードを検証（上流を呼ぶ前に弾く）
    /// 3. キャリアの PIN コード情報で判定
    /// 4. キャリアに該当がなければ郵便番号ディレクトリで所在地を引き、対象外とする
    #[tracing::instrument(skip_all, fields(service_type = %service_type))]
    pub async fn check(
        &self,
        pincode: Option<&str>,
        service_type: ServiceType,
    ) -> Result<Serviceability, GatewayError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration(TOKEN_MISSING.to_string()))?;

        let pincode = pincode
            .ok_or(GatewayError::InvalidPincode)
            .and_then(|value| Pincode::parse(value).map_err(|_| GatewayError::InvalidPincode))?;

        match self.carrier.lookup_pincode(token, &pincode).await? {
            Some(record) => Ok(record.evaluate(service_type)),
            None => Ok(self.fallback(&pincode).await),
        }
    }

    /// キャリアに該当がない場合のメッセージを郵便番号ディレクトリから組み立てる
    ///
    /// ディレクトリ側の失敗はエラーにせず、メッセージに吸収する。
    async fn fallback(&self, pincode: &Pincode) -> Serviceability {
        match self.postal_directory.lookup(pincode).await {
            Ok(DirectoryLookup::Found { district, state }) => {
                Serviceability::not_serviceable_in(&district, &state)
            }
            Ok(DirectoryLookup::NotFound) => Serviceability::invalid_pincode(),
            Err(e) => {
                tracing::warn!(%pincode, "郵便番号ディレクトリの照会に失敗しました: {}", e);
                Serviceability::directory_unavailable()
            }
        }
    }
}
