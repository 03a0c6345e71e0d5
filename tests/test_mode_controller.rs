//! テストモード制御モジュール
//!
//! このモジュールは、テストの実行モード（モック/オンライン）を
//! 動的に切り替える機能を提供します。
//!
//! オンラインモードでは`SUPABASE_URL`・`SUPABASE_ANON_KEY`で指定した
//! 実際のサービスに接続する。ネットワークや設定の問題ではテストを失敗させない。

use portfolio_gateway::domain::article::{ArticleListQuery, ArticlePage};
use portfolio_gateway::infra::api::MockRemoteClient;
use portfolio_gateway::{GatewayResult, GatewaySettings, PortfolioGateway};
use serde_json::json;
use std::sync::Arc;

/// オンラインテストモードかどうかを判定する
///
/// 以下の条件でオンラインモードと判定される：
/// 1. `online` featureが有効
/// 2. `TEST_ONLINE` 環境変数が設定されている
pub fn is_online_mode() -> bool {
    cfg!(feature = "online") || std::env::var("TEST_ONLINE").is_ok()
}

/// テストモードに応じたゲートウェイを作成する
///
/// オンラインモードで設定が無い場合は`None`を返す。
pub fn create_gateway() -> Option<PortfolioGateway> {
    if is_online_mode() {
        match PortfolioGateway::from_env() {
            Ok(gateway) => Some(gateway),
            Err(e) => {
                println!("⚠️ オンライン設定が見つかりません: {}", e);
                None
            }
        }
    } else {
        let mock = MockRemoteClient::new().with_rpc(
            "get_articles_with_pagination",
            json!({
                "articles": [{
                    "id": "mock-1",
                    "title": "モック記事",
                    "slug": "mock-article",
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-01T00:00:00Z"
                }],
                "total_count": 1
            }),
        );
        Some(PortfolioGateway::new(
            Arc::new(mock),
            GatewaySettings::default(),
        ))
    }
}

/// アサーション用ヘルパー関数
/// モードに応じて適切なアサーションを実行する
fn assert_first_page(result: GatewayResult<ArticlePage>) {
    match result {
        Ok(page) if is_online_mode() => {
            assert!(page.articles.len() <= 6, "ページサイズを超えている");
            println!("✅ オンライン統合テスト成功: {}件取得", page.articles.len());
        }
        Ok(page) => {
            assert_eq!(page.total, 1);
            assert_eq!(page.articles[0].slug, "mock-article");
            println!("✅ モックテスト成功");
        }
        Err(e) if is_online_mode() => {
            println!("⚠️ リクエストが失敗: {}", e);
            println!("ネットワーク接続を確認してください");
        }
        Err(e) => panic!("モックテストが失敗: {}", e),
    }
}

#[tokio::test]
async fn test_unified_first_page() {
    let Some(gateway) = create_gateway() else {
        return;
    };

    let result = gateway.list_articles(&ArticleListQuery::default()).await;

    assert_first_page(result);
}

/// 重い統合テスト - 実際のサービスで統計と履歴書URLを確認
#[cfg(feature = "online-slow")]
#[tokio::test]
async fn test_online_stats_and_resume_url() {
    let Some(gateway) = create_gateway() else {
        return;
    };

    match gateway.get_article_stats().await {
        Ok(stats) => println!("✅ 記事統計: 全{}件", stats.total_articles),
        Err(e) => println!("⚠️ 統計の取得に失敗: {}", e),
    }

    let url = gateway.resume_url(None);
    assert!(url.contains("/storage/v1/object/public/"));
}
