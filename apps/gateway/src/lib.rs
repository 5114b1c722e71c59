//! # shipquote gateway ライブラリ
//!
//! キャリア API を中継し、配送可否照会と送料見積もりを提供する HTTP サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 依存の組み立てとルーター構築
//! - `client`: 上流 API クライアント（キャリア・郵便番号ディレクトリ）
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー型と HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（Origin 検証・キャッシュ制御・Request ID 伝播）
//! - `openapi`: OpenAPI 仕様定義
//! - `usecase`: ユースケース

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod usecase;
