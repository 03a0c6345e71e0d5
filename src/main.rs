use anyhow::{Context, Result};
use portfolio_gateway::app::search::{SearchAsYouType, DEFAULT_SEARCH_DEBOUNCE};
use portfolio_gateway::domain::article::ArticleListQuery;
use portfolio_gateway::domain::project::ProjectQuery;
use portfolio_gateway::PortfolioGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let gateway = PortfolioGateway::from_env().context("ゲートウェイの初期化に失敗しました")?;

    println!("=== 記事一覧 ===");
    match gateway.list_articles(&ArticleListQuery::default()).await {
        Ok(page) => {
            println!("全{}件中 {}件を表示", page.total, page.articles.len());
            for article in &page.articles {
                println!("- {} ({}回閲覧, {}分)", article.title, article.view_count, article.reading_time);
            }
        }
        Err(e) => eprintln!("記事一覧の取得中にエラーが発生しました: {}", e),
    }

    println!("\n=== 人気タグ ===");
    match gateway.get_popular_tags(Some(10)).await {
        Ok(tags) => {
            for tag in tags {
                println!("- {}: {}", tag.name, tag.count);
            }
        }
        Err(e) => eprintln!("タグの集計中にエラーが発生しました: {}", e),
    }

    println!("\n=== プロジェクト ===");
    match gateway.list_projects(&ProjectQuery::default()).await {
        Ok(listing) => {
            let stats = listing.status_stats;
            println!(
                "完了{}件、進行中{}件、計画中{}件",
                stats.completed, stats.in_progress, stats.planned
            );
            for project in &listing.projects {
                println!("- [{}] {}", project.status, project.title);
            }
        }
        Err(e) => eprintln!("プロジェクトの取得中にエラーが発生しました: {}", e),
    }

    println!("\n履歴書: {}", gateway.resume_url(None));

    // 入力中検索: 連続した入力は最後の1回だけ検索される
    if let Some(query) = std::env::args().nth(1).filter(|q| !q.trim().is_empty()) {
        println!("\n=== 検索: {} ===", query);
        let mut search = SearchAsYouType::new(gateway.clone(), DEFAULT_SEARCH_DEBOUNCE, None);
        let mut typed = String::new();
        for ch in query.chars() {
            typed.push(ch);
            search.type_query(typed.clone());
        }
        match search.next_outcome().await {
            Some(outcome) => match outcome.result {
                Ok(results) if results.is_empty() => println!("該当する記事はありません"),
                Ok(results) => {
                    for article in results {
                        println!("- {} (/{})", article.title, article.slug);
                    }
                }
                Err(e) => eprintln!("検索中にエラーが発生しました: {}", e),
            },
            None => eprintln!("検索結果を受け取れませんでした"),
        }
    }

    Ok(())
}
