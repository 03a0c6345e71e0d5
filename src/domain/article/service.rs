use super::model::{
    tally_categories, tally_popular_tags, ArticleBundle, ArticleBundlePayload, ArticleListQuery,
    ArticlePage, ArticleStats, ArticleSummary, CategoryRow, CategoryStat, TagRow, TagStat,
};
use crate::domain::procedure::{call_procedure, decode, decode_or_default};
use crate::infra::api::RemoteClient;
use crate::types::{GatewayError, GatewayResult};
use serde::de::DeserializeOwned;
use serde_json::json;

/// 集計対象となる公開済み記事の条件
const PUBLISHED_FILTER: [(&str, &str); 1] = [("status", "published")];

async fn select_published<T: DeserializeOwned>(
    client: &dyn RemoteClient,
    columns: &str,
) -> GatewayResult<Vec<T>> {
    let operation = format!("articles.{}", columns);
    tracing::debug!(columns, "公開記事の列を取得");
    let rows = client
        .select_rows("articles", columns, &PUBLISHED_FILTER)
        .await
        .map_err(|e| {
            tracing::warn!(columns, error = %e, "公開記事の取得に失敗");
            GatewayError::remote_call(&operation, e)
        })?;
    rows.into_iter().map(|row| decode(&operation, row)).collect()
}

/// 記事一覧をページ単位で取得する
///
/// 絞り込み条件が`None`の場合は`null`を送り、空文字とは区別する。
/// ページ番号・件数は型で正の値に限られ、そのまま送る。
pub async fn list_articles_with_client(
    client: &dyn RemoteClient,
    query: &ArticleListQuery,
) -> GatewayResult<ArticlePage> {
    let params = json!({
        "p_page": query.page,
        "p_page_size": query.page_size,
        "p_category": query.category,
        "p_search_query": query.search_query,
        "p_sort_by": query.sort_by,
    });
    let payload = call_procedure(client, "get_articles_with_pagination", params).await?;
    decode_or_default("get_articles_with_pagination", payload)
}

/// 記事詳細と画像・関連記事を取得する
///
/// ## エラー
/// - ペイロード無し: `NotFound`
/// - `article`フィールド無し: `MalformedResponse`
pub async fn get_article_detail_with_client(
    client: &dyn RemoteClient,
    article_id: &str,
) -> GatewayResult<ArticleBundle> {
    let payload = call_procedure(
        client,
        "get_article_detail",
        json!({ "p_article_id": article_id }),
    )
    .await?
    .ok_or_else(|| GatewayError::not_found(format!("article {}", article_id)))?;

    let payload: ArticleBundlePayload = decode("get_article_detail", payload)?;
    let article = payload.article.ok_or_else(|| {
        GatewayError::malformed("get_article_detail", "articleフィールドがありません")
    })?;

    Ok(ArticleBundle {
        article,
        images: payload.images,
        related_articles: payload.related_articles,
    })
}

/// 記事の閲覧数を1増やす
pub async fn increment_view_count_with_client(
    client: &dyn RemoteClient,
    article_id: &str,
) -> GatewayResult<()> {
    call_procedure(
        client,
        "increment_view_count",
        json!({ "article_id": article_id }),
    )
    .await?;
    Ok(())
}

/// 記事を検索する（順序はリモート側の順位のまま）
///
/// 該当なしはエラーではなく空の結果になる。
pub async fn search_articles_with_client(
    client: &dyn RemoteClient,
    search_query: &str,
    limit: u32,
) -> GatewayResult<Vec<ArticleSummary>> {
    let payload = call_procedure(
        client,
        "search_articles_optimized",
        json!({ "search_query": search_query, "result_limit": limit }),
    )
    .await?;
    decode_or_default("search_articles_optimized", payload)
}

/// 関連記事を取得する
pub async fn get_related_articles_with_client(
    client: &dyn RemoteClient,
    article_id: &str,
    limit: u32,
) -> GatewayResult<Vec<ArticleSummary>> {
    let payload = call_procedure(
        client,
        "get_related_articles_optimized",
        json!({ "p_article_id": article_id, "p_limit": limit }),
    )
    .await?;
    decode_or_default("get_related_articles_optimized", payload)
}

/// 記事全体の統計を取得する
pub async fn get_article_stats_with_client(client: &dyn RemoteClient) -> GatewayResult<ArticleStats> {
    let payload = call_procedure(client, "get_article_stats", json!({})).await?;
    decode_or_default("get_article_stats", payload)
}

/// 公開記事のカテゴリ別件数をローカルで集計する
pub async fn get_category_stats_with_client(
    client: &dyn RemoteClient,
) -> GatewayResult<Vec<CategoryStat>> {
    let rows: Vec<CategoryRow> = select_published(client, "category").await?;
    Ok(tally_categories(rows.into_iter().map(|row| row.category)))
}

/// 公開記事の人気タグをローカルで集計し、上位`limit`件を返す
pub async fn get_popular_tags_with_client(
    client: &dyn RemoteClient,
    limit: usize,
) -> GatewayResult<Vec<TagStat>> {
    let rows: Vec<TagRow> = select_published(client, "tags").await?;
    Ok(tally_popular_tags(rows.into_iter().map(|row| row.tags), limit))
}
