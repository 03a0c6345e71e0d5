use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 名前と出現回数の組（技術スタック・カテゴリ・タグの統計に共通）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

impl NamedCount {
    pub fn new<N: Into<String>>(name: N, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// 値ごとの出現回数を数える
///
/// 同じ値が何度現れてもその都度1回として数える。
pub fn count_occurrences<I, S>(values: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value.into()).or_insert(0) += 1;
    }
    counts
}

/// 出現回数の降順に並べ、先頭`limit`件を返す
///
/// 並び替えは回数のみで行う。同数の要素の順序は保証しない。
pub fn rank_by_count(counts: HashMap<String, u64>, limit: Option<usize>) -> Vec<NamedCount> {
    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
