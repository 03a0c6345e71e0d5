//! ポートフォリオ・ブログ用のデータアクセス層
//!
//! - [`app::PortfolioGateway`]: ホスティングサービスのストアドプロシージャと
//!   オブジェクトストレージへの唯一の窓口
//! - [`timing`]: 入力などに応じた呼び出し頻度の制御

pub mod app;
pub mod domain;
pub mod infra;
pub mod timing;
pub mod types;

// 便利な再エクスポート
pub use app::{GatewayConfig, GatewaySettings, PortfolioGateway};
pub use types::{GatewayError, GatewayResult};
