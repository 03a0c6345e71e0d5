//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - エラー型: 設定、リモート呼び出し、ゲートウェイの3層

pub mod config;
pub mod error;
pub mod infra;

// 便利な再エクスポート
pub use config::{ConfigError, ConfigResult};
pub use error::{GatewayError, GatewayResult};
pub use infra::{RemoteError, RemoteResult};
