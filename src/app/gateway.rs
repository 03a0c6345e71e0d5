use std::sync::Arc;

use crate::app::config::{GatewayConfig, GatewaySettings};
use crate::domain::article::{
    get_article_detail_with_client, get_article_stats_with_client,
    get_category_stats_with_client, get_popular_tags_with_client,
    get_related_articles_with_client, increment_view_count_with_client,
    list_articles_with_client, search_articles_with_client, ArticleBundle, ArticleListQuery,
    ArticlePage, ArticleStats, ArticleSummary, CategoryStat, TagStat,
};
use crate::domain::project::{list_projects_with_client, ProjectListing, ProjectQuery};
use crate::domain::storage::{
    download_resume_with_client, resume_url_with_client, upload_article_content_with_client,
    upload_image_with_client,
};
use crate::infra::api::{RemoteClient, ReqwestRemoteClient};
use crate::types::GatewayResult;

/// 検索結果の既定件数
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// 関連記事の既定件数
pub const DEFAULT_RELATED_LIMIT: u32 = 3;
/// 人気タグの既定件数
pub const DEFAULT_TAG_LIMIT: usize = 20;

/// ホスティングサービスとの唯一の窓口
///
/// 状態を持たず、各メソッドはリモート呼び出しを1回だけ行う（再試行なし）。
/// クライアントは構築時に注入するので、テストではモックに差し替えられる。
/// `Clone`はクライアントを共有するだけなので、タイマーのコールバックへ渡せる。
#[derive(Clone)]
pub struct PortfolioGateway {
    client: Arc<dyn RemoteClient>,
    settings: GatewaySettings,
}

impl PortfolioGateway {
    /// 注入されたクライアントからゲートウェイを作成
    pub fn new(client: Arc<dyn RemoteClient>, settings: GatewaySettings) -> Self {
        Self { client, settings }
    }

    /// 設定から本番用クライアントを構築してゲートウェイを作成
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = ReqwestRemoteClient::new(
            &config.supabase_url,
            &config.anon_key,
            config.settings.request_timeout_secs,
        )?;
        tracing::info!(url = %config.supabase_url, "ゲートウェイを初期化");
        Ok(Self::new(Arc::new(client), config.settings.clone()))
    }

    /// 環境変数からゲートウェイを作成（必須設定が無ければ通信前に失敗する）
    pub fn from_env() -> GatewayResult<Self> {
        let config = GatewayConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    fn client(&self) -> &dyn RemoteClient {
        self.client.as_ref()
    }

    pub async fn list_articles(&self, query: &ArticleListQuery) -> GatewayResult<ArticlePage> {
        list_articles_with_client(self.client(), query).await
    }

    pub async fn get_article_detail(&self, article_id: &str) -> GatewayResult<ArticleBundle> {
        get_article_detail_with_client(self.client(), article_id).await
    }

    pub async fn increment_view_count(&self, article_id: &str) -> GatewayResult<()> {
        increment_view_count_with_client(self.client(), article_id).await
    }

    pub async fn search_articles(
        &self,
        search_query: &str,
        limit: Option<u32>,
    ) -> GatewayResult<Vec<ArticleSummary>> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        search_articles_with_client(self.client(), search_query, limit).await
    }

    pub async fn get_related_articles(
        &self,
        article_id: &str,
        limit: Option<u32>,
    ) -> GatewayResult<Vec<ArticleSummary>> {
        let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT);
        get_related_articles_with_client(self.client(), article_id, limit).await
    }

    pub async fn get_article_stats(&self) -> GatewayResult<ArticleStats> {
        get_article_stats_with_client(self.client()).await
    }

    pub async fn list_projects(&self, query: &ProjectQuery) -> GatewayResult<ProjectListing> {
        list_projects_with_client(self.client(), query).await
    }

    pub async fn get_category_stats(&self) -> GatewayResult<Vec<CategoryStat>> {
        get_category_stats_with_client(self.client()).await
    }

    pub async fn get_popular_tags(&self, limit: Option<usize>) -> GatewayResult<Vec<TagStat>> {
        let limit = limit.unwrap_or(DEFAULT_TAG_LIMIT);
        get_popular_tags_with_client(self.client(), limit).await
    }

    /// 画像をアップロードし、公開URLを返す
    pub async fn upload_image(
        &self,
        image: Vec<u8>,
        content_type: &str,
        path: &str,
    ) -> GatewayResult<String> {
        upload_image_with_client(self.client(), &self.settings.buckets, image, content_type, path)
            .await
    }

    /// 記事本文をアップロードし、保存先パスを返す
    pub async fn upload_article_content(
        &self,
        content: &str,
        file_name: &str,
    ) -> GatewayResult<String> {
        upload_article_content_with_client(self.client(), &self.settings.buckets, content, file_name)
            .await
    }

    /// 履歴書をダウンロードする（`None`は設定の既定ファイル名）
    pub async fn download_resume(&self, file_name: Option<&str>) -> GatewayResult<Vec<u8>> {
        let file_name = file_name.unwrap_or(&self.settings.resume_file_name);
        download_resume_with_client(self.client(), &self.settings.buckets, file_name).await
    }

    /// 履歴書の公開URL（通信なし）
    pub fn resume_url(&self, file_name: Option<&str>) -> String {
        let file_name = file_name.unwrap_or(&self.settings.resume_file_name);
        resume_url_with_client(self.client(), &self.settings.buckets, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::api::MockRemoteClient;
    use crate::types::{ConfigError, GatewayError};
    use serde_json::json;

    fn gateway_with(mock: MockRemoteClient) -> (PortfolioGateway, Arc<MockRemoteClient>) {
        let mock = Arc::new(mock);
        let gateway = PortfolioGateway::new(mock.clone(), GatewaySettings::default());
        (gateway, mock)
    }

    #[test]
    fn test_from_config_rejects_invalid_url() {
        let config = GatewayConfig::new("demo.supabase.co", "anon").unwrap();

        let result = PortfolioGateway::from_config(&config);

        assert!(matches!(
            result,
            Err(GatewayError::Configuration(ConfigError::InvalidEndpoint { .. }))
        ));
    }

    #[tokio::test]
    async fn test_default_limits() {
        let (gateway, mock) = gateway_with(
            MockRemoteClient::new()
                .with_rpc("search_articles_optimized", json!([]))
                .with_rpc("get_related_articles_optimized", json!([])),
        );

        gateway.search_articles("vue", None).await.unwrap();
        gateway.get_related_articles("a1", None).await.unwrap();
        gateway.search_articles("vue", Some(5)).await.unwrap();

        let search = mock.rpc_params("search_articles_optimized");
        assert_eq!(search[0]["result_limit"], json!(10));
        assert_eq!(search[1]["result_limit"], json!(5));
        assert_eq!(mock.rpc_params("get_related_articles_optimized")[0]["p_limit"], json!(3));
    }

    #[tokio::test]
    async fn test_resume_uses_configured_default() {
        let settings = GatewaySettings {
            resume_file_name: "CV.pdf".to_string(),
            ..GatewaySettings::default()
        };
        let mock = Arc::new(MockRemoteClient::new().with_object("personal-info", "CV.pdf", b"pdf"));
        let gateway = PortfolioGateway::new(mock, settings);

        assert_eq!(gateway.download_resume(None).await.unwrap(), b"pdf");
        assert!(gateway.resume_url(None).ends_with("/personal-info/CV.pdf"));
        assert!(gateway.resume_url(Some("Other.pdf")).ends_with("/personal-info/Other.pdf"));
    }

    #[tokio::test]
    async fn test_each_call_is_single_round_trip() {
        let (gateway, mock) = gateway_with(
            MockRemoteClient::new().with_rpc_error("get_article_stats", 503, "unavailable"),
        );

        let err = gateway.get_article_stats().await.unwrap_err();

        assert!(matches!(err, GatewayError::RemoteCall { .. }));
        assert_eq!(mock.calls().len(), 1, "再試行してはいけない");
    }
}
