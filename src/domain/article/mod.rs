pub mod model;
pub mod service;

// 公開APIの再エクスポート

// model.rsから
pub use model::{
    tally_categories, tally_popular_tags, ArticleBundle, ArticleDetail, ArticleImage,
    ArticleListQuery, ArticlePage, ArticleStats, ArticleSummary, CategoryStat, TagStat,
    UNCATEGORIZED,
};

// service.rsから
pub use service::{
    get_article_detail_with_client, get_article_stats_with_client,
    get_category_stats_with_client, get_popular_tags_with_client,
    get_related_articles_with_client, increment_view_count_with_client,
    list_articles_with_client, search_articles_with_client,
};
