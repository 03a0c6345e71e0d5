use crate::domain::null_as_default;
use crate::domain::stats::{count_occurrences, rank_by_count, NamedCount};
use crate::types::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// カテゴリ統計（カテゴリ名と記事数）
pub type CategoryStat = NamedCount;
/// タグ統計（タグ名と出現回数）
pub type TagStat = NamedCount;

/// カテゴリ未設定の記事をまとめる名前
pub const UNCATEGORIZED: &str = "uncategorized";

/// 一覧表示用の軽量記事エンティティ（本文を含まない）
///
/// タイムスタンプはISO-8601文字列のまま保持し、ローカルでは解釈しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reading_time: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// 記事詳細エンティティ（一覧用の項目に本文などを加えたもの）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    /// Markdown本文
    #[serde(default)]
    pub content: Option<String>,
    pub author_id: String,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_count: u64,
}

/// 記事に紐づく画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleImage {
    pub id: String,
    pub article_id: String,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// 本文中での位置
    #[serde(default)]
    pub position_in_content: Option<u32>,
    #[serde(default)]
    pub is_cover: bool,
    pub created_at: String,
}

/// 記事一覧の1ページ分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<ArticleSummary>,
    #[serde(default, deserialize_with = "null_as_default", alias = "total_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryStat>,
}

/// 記事詳細と付随データ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleBundle {
    pub article: ArticleDetail,
    pub images: Vec<ArticleImage>,
    pub related_articles: Vec<ArticleSummary>,
}

/// `get_article_detail`のペイロード
///
/// `article`の有無は呼び出し側で検証するため`Option`で受ける。
#[derive(Debug, Deserialize)]
pub(crate) struct ArticleBundlePayload {
    #[serde(default)]
    pub article: Option<ArticleDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ArticleImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_articles: Vec<ArticleSummary>,
}

/// 記事全体の統計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_articles: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryStat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popular_tags: Vec<TagStat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_articles: Vec<ArticleSummary>,
}

/// 公開記事のカテゴリ列（集計用の生データ）
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    #[serde(default)]
    pub category: Option<String>,
}

/// 公開記事のタグ列（集計用の生データ）
#[derive(Debug, Deserialize)]
pub(crate) struct TagRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(6) {
    Some(size) => size,
    None => panic!("page size must be positive"),
};

/// 記事一覧の検索条件
///
/// ページ番号・件数は正の整数のみ表現できる。外部入力からは[`ArticleListQuery::try_new`]で作る。
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleListQuery {
    /// 1始まりのページ番号
    pub page: NonZeroU32,
    pub page_size: NonZeroU32,
    /// `None`は「絞り込みなし」、`Some("")`は空文字での絞り込み
    pub category: Option<String>,
    pub search_query: Option<String>,
    pub sort_by: String,
}

impl Default for ArticleListQuery {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            page_size: DEFAULT_PAGE_SIZE,
            category: None,
            search_query: None,
            sort_by: "date".to_string(),
        }
    }
}

impl ArticleListQuery {
    pub fn page(page: NonZeroU32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// 数値のページ番号・件数から作成（0は通信前に拒否）
    pub fn try_new(page: u32, page_size: u32) -> GatewayResult<Self> {
        let positive = |name: &str, value: u32| {
            NonZeroU32::new(value).ok_or_else(|| {
                GatewayError::invalid_argument(format!("{}は1以上である必要があります", name))
            })
        };
        Ok(Self {
            page: positive("page", page)?,
            page_size: positive("page_size", page_size)?,
            ..Self::default()
        })
    }
}

/// カテゴリごとの記事数を集計する（記事数の降順）
///
/// カテゴリ未設定・空文字は`UNCATEGORIZED`にまとめる。
pub fn tally_categories<I>(categories: I) -> Vec<CategoryStat>
where
    I: IntoIterator<Item = Option<String>>,
{
    let counts = count_occurrences(categories.into_iter().map(|category| {
        category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }));
    rank_by_count(counts, None)
}

/// 記事ごとのタグ一覧から人気タグの上位`limit`件を求める
pub fn tally_popular_tags<I>(tag_lists: I, limit: usize) -> Vec<TagStat>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let counts = count_occurrences(tag_lists.into_iter().flatten());
    rank_by_count(counts, Some(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(lists: &[&[&str]]) -> Vec<Vec<String>> {
        lists
            .iter()
            .map(|list| list.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_tally_popular_tags() {
        let popular = tally_popular_tags(tags(&[&["a", "b"], &["a"], &["c", "c"]]), 20);

        assert_eq!(popular.len(), 3);
        let count_of = |name: &str| popular.iter().find(|s| s.name == name).map(|s| s.count);
        assert_eq!(count_of("a"), Some(2));
        assert_eq!(count_of("b"), Some(1));
        assert_eq!(count_of("c"), Some(2));
        // 回数の降順であること（同数の順序は問わない）
        assert_eq!(popular[2], TagStat::new("b", 1));
    }

    #[test]
    fn test_tally_popular_tags_limit() {
        let popular = tally_popular_tags(tags(&[&["rust", "vue"], &["rust"], &["go"]]), 1);
        assert_eq!(popular, vec![TagStat::new("rust", 2)]);
    }

    #[test]
    fn test_tally_categories_groups_missing() {
        let stats = tally_categories(vec![
            Some("tech".to_string()),
            None,
            Some(String::new()),
            Some("tech".to_string()),
            Some("life".to_string()),
        ]);

        assert_eq!(stats.len(), 3);
        assert!(stats.contains(&CategoryStat::new(UNCATEGORIZED, 2)));
        assert!(stats.contains(&CategoryStat::new("tech", 2)));
        assert_eq!(stats[2], CategoryStat::new("life", 1));
    }

    #[test]
    fn test_article_detail_flattens_summary() {
        let detail: ArticleDetail = serde_json::from_value(json!({
            "id": "a1",
            "title": "Rustで書くゲートウェイ",
            "slug": "rust-gateway",
            "tags": ["rust"],
            "view_count": 12,
            "reading_time": 5,
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-02T00:00:00Z",
            "content": "# 本文",
            "author_id": "u1",
            "status": "published",
            "word_count": 1200
        }))
        .unwrap();

        assert_eq!(detail.summary.id, "a1");
        assert_eq!(detail.summary.tags, Some(vec!["rust".to_string()]));
        assert_eq!(detail.content.as_deref(), Some("# 本文"));
        assert_eq!(detail.word_count, 1200);
    }

    #[test]
    fn test_article_page_accepts_total_count() {
        let page: ArticlePage = serde_json::from_value(json!({
            "articles": null,
            "total_count": 42,
            "categories": [{"name": "tech", "count": 3}]
        }))
        .unwrap();

        assert!(page.articles.is_empty());
        assert_eq!(page.total, 42);
        assert_eq!(page.categories, vec![CategoryStat::new("tech", 3)]);
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ArticleListQuery::default();
        assert_eq!(query.page.get(), 1);
        assert_eq!(query.page_size.get(), 6);
        assert_eq!(query.sort_by, "date");
        assert!(query.category.is_none());
    }

    #[test]
    fn test_list_query_rejects_zero() {
        let query = ArticleListQuery::try_new(2, 12).unwrap();
        assert_eq!((query.page.get(), query.page_size.get()), (2, 12));

        for (page, page_size) in [(0, 6), (1, 0), (0, 0)] {
            let result = ArticleListQuery::try_new(page, page_size);
            assert!(
                matches!(result, Err(GatewayError::InvalidArgument { .. })),
                "({}, {})が受け入れられた",
                page,
                page_size
            );
        }
    }
}
