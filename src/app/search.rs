use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::gateway::PortfolioGateway;
use crate::domain::article::ArticleSummary;
use crate::timing::{debounce, Debounced};
use crate::types::GatewayResult;

/// 入力中検索の既定の待ち時間
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// 検索結果と、それを生んだ検索語
///
/// 完了順は保証されないので、受け取り側は最新の入力と`query`を比べて
/// 古い結果を捨てる。
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    pub result: GatewayResult<Vec<ArticleSummary>>,
}

/// 入力中検索
///
/// 入力のたびに`input`を呼ぶと、入力が`delay`止まった時点で最後の検索語だけを
/// 検索し、結果を`outcomes`へ送る。空白だけの入力は通信せず空の結果を送るので、
/// 落ち着いた入力1回ごとに結果が必ず1件届く。
pub struct SearchAsYouType {
    pub input: Debounced<String>,
    pub outcomes: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl SearchAsYouType {
    pub fn new(gateway: PortfolioGateway, delay: Duration, limit: Option<u32>) -> Self {
        let (sender, outcomes) = mpsc::unbounded_channel();
        let input = debounce(
            move |query: String| {
                let query = query.trim().to_string();
                if query.is_empty() {
                    let _ = sender.send(SearchOutcome {
                        query,
                        result: Ok(Vec::new()),
                    });
                    return;
                }
                let gateway = gateway.clone();
                let sender = sender.clone();
                tokio::spawn(async move {
                    let result = gateway.search_articles(&query, limit).await;
                    // 受け取り側が既に無ければ結果は捨てる
                    let _ = sender.send(SearchOutcome { query, result });
                });
            },
            delay,
        );
        Self { input, outcomes }
    }

    /// 入力を1回分渡す
    pub fn type_query<Q: Into<String>>(&self, query: Q) {
        self.input.call(query.into());
    }

    /// 次の検索結果を待つ
    ///
    /// 送信側は`input`が保持しているので、`SearchAsYouType`が生きている間は
    /// `None`にならない。入力が無ければ結果が届くまで待ち続ける。
    pub async fn next_outcome(&mut self) -> Option<SearchOutcome> {
        self.outcomes.recv().await
    }
}
