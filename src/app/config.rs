//! ゲートウェイの設定
//!
//! | 変数                      | 必須 | 説明                                   |
//! |---------------------------|------|----------------------------------------|
//! | `SUPABASE_URL`            | yes  | ホスティングサービスのベースURL        |
//! | `SUPABASE_ANON_KEY`       | yes  | 匿名キー                               |
//! | `PORTFOLIO_SETTINGS_FILE` | no   | `GatewaySettings`を記述したYAMLファイル |

use crate::domain::storage::StorageBuckets;
use crate::infra::file::load_yaml_from_file;
use crate::types::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::env;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const SETTINGS_FILE_VAR: &str = "PORTFOLIO_SETTINGS_FILE";

/// 任意設定（YAMLファイルで上書き可能）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// リクエストごとのタイムアウト（秒）
    pub request_timeout_secs: u64,
    #[serde(flatten)]
    pub buckets: StorageBuckets,
    /// ファイル名を省略した場合の履歴書ファイル
    pub resume_file_name: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            buckets: StorageBuckets::default(),
            resume_file_name: "Resume.pdf".to_string(),
        }
    }
}

/// 必須の接続情報と任意設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub settings: GatewaySettings,
}

impl GatewayConfig {
    /// 接続情報から設定を作成する（空文字は欠落として扱う）
    pub fn new<U: Into<String>, K: Into<String>>(supabase_url: U, anon_key: K) -> ConfigResult<Self> {
        let supabase_url = non_empty(URL_VAR, Some(supabase_url.into()))?;
        let anon_key = non_empty(KEY_VAR, Some(anon_key.into()))?;
        Ok(Self {
            supabase_url,
            anon_key,
            settings: GatewaySettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: GatewaySettings) -> Self {
        self.settings = settings;
        self
    }

    /// 環境変数（`.env`があれば先に読み込む）から設定を作成する
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意のキー検索関数から設定を作成する
    ///
    /// プロセスの環境変数を書き換えずにテストするために使う。
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = non_empty(URL_VAR, lookup(URL_VAR))?;
        let anon_key = non_empty(KEY_VAR, lookup(KEY_VAR))?;

        let settings = match lookup(SETTINGS_FILE_VAR).filter(|path| !path.trim().is_empty()) {
            Some(path) => {
                tracing::info!(path = %path, "設定ファイルを読み込み");
                load_yaml_from_file(&path)?
            }
            None => GatewaySettings::default(),
        };

        if settings.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "request_timeout_secsは1以上である必要があります",
            ));
        }

        Ok(Self {
            supabase_url,
            anon_key,
            settings,
        })
    }
}

fn non_empty(name: &str, value: Option<String>) -> ConfigResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::missing_env_var(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_requires_url_and_key() {
        let missing_url = GatewayConfig::from_lookup(lookup_from(&[(KEY_VAR, "anon")]));
        assert!(matches!(
            missing_url,
            Err(ConfigError::MissingEnvironmentVariable { ref name }) if name == URL_VAR
        ));

        let blank_key = GatewayConfig::from_lookup(lookup_from(&[
            (URL_VAR, "https://demo.supabase.co"),
            (KEY_VAR, "   "),
        ]));
        assert!(matches!(
            blank_key,
            Err(ConfigError::MissingEnvironmentVariable { ref name }) if name == KEY_VAR
        ));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (URL_VAR, "https://demo.supabase.co"),
            (KEY_VAR, "anon"),
        ]))
        .unwrap();

        assert_eq!(config.supabase_url, "https://demo.supabase.co");
        assert_eq!(config.settings, GatewaySettings::default());
        assert_eq!(config.settings.buckets.image_bucket, "article-images");
    }

    #[test]
    fn test_missing_settings_file() {
        let result = GatewayConfig::from_lookup(lookup_from(&[
            (URL_VAR, "https://demo.supabase.co"),
            (KEY_VAR, "anon"),
            (SETTINGS_FILE_VAR, "does/not/exist.yaml"),
        ]));

        assert!(matches!(result, Err(ConfigError::MissingConfigFile { .. })));
    }

    #[test]
    fn test_settings_yaml_partial_override() {
        let yaml = "request_timeout_secs: 5\npersonal_bucket: files\nresume_file_name: CV.pdf\n";
        let settings: GatewaySettings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.buckets.personal_bucket, "files");
        assert_eq!(settings.buckets.image_bucket, "article-images");
        assert_eq!(settings.resume_file_name, "CV.pdf");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(GatewayConfig::new("", "anon").is_err());
        assert!(GatewayConfig::new("https://demo.supabase.co", "anon").is_ok());
    }
}
