pub mod article;
mod procedure;
pub mod project;
pub mod stats;
pub mod storage;

use serde::{Deserialize, Deserializer};

/// 欠落と`null`の両方をデフォルト値として扱うデシリアライザ
///
/// リモートのプロシージャは空の集合を`null`で返すことがあるため、
/// `#[serde(default, deserialize_with = "null_as_default")]`と組み合わせて使う。
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        total: u64,
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let explicit: Payload = serde_json::from_value(json!({"items": null, "total": null})).unwrap();
        assert!(explicit.items.is_empty());
        assert_eq!(explicit.total, 0);

        let missing: Payload = serde_json::from_value(json!({})).unwrap();
        assert!(missing.items.is_empty());

        let present: Payload = serde_json::from_value(json!({"items": ["a"], "total": 3})).unwrap();
        assert_eq!(present.items, vec!["a"]);
        assert_eq!(present.total, 3);
    }
}
