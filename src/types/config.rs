use thiserror::Error;

/// 起動時の設定エラー
///
/// 接続先（`SUPABASE_URL`）と匿名キー（`SUPABASE_ANON_KEY`）の組、および
/// 任意の設定YAML（`PORTFOLIO_SETTINGS_FILE`）を検証する段階でだけ発生する。
/// 通信を始めた後にこの型が返ることはない。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 接続先または匿名キーが未設定（空白のみも未設定扱い）
    #[error("環境変数が見つかりません: {name}（.envまたは環境に設定してください）")]
    MissingEnvironmentVariable { name: String },

    /// 接続先URLがhttp(s)の絶対URLとして解釈できない
    #[error("接続先URLが不正です: {url} - {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// 匿名キー・タイムアウトなど個別の値が使えない
    #[error("設定値が不正です: {reason}")]
    InvalidValue { reason: String },

    /// 設定YAMLを開けない
    #[error("設定ファイルが見つかりません: {path}")]
    MissingConfigFile { path: String },

    /// 設定YAMLの内容が`GatewaySettings`として読めない
    #[error("設定ファイルを解析できません: {path} - {reason}")]
    InvalidSettingsFile { path: String, reason: String },
}

impl ConfigError {
    pub fn missing_env_var<N: Into<String>>(name: N) -> Self {
        Self::MissingEnvironmentVariable { name: name.into() }
    }

    pub fn invalid_endpoint<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value<R: Into<String>>(reason: R) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    pub fn missing_config_file<P: Into<String>>(path: P) -> Self {
        Self::MissingConfigFile { path: path.into() }
    }

    pub fn invalid_settings_file<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::InvalidSettingsFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
