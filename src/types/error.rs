use thiserror::Error;

use crate::types::{ConfigError, RemoteError};

/// ゲートウェイ全体のエラー型
///
/// 呼び出し側は`NotFound`を「存在しない」表示に、それ以外を汎用エラー表示に
/// 振り分けることを想定している。
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 必須設定の欠落（起動時に一度だけ発生）
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// リモート呼び出し層が報告した失敗
    #[error("リモート呼び出しに失敗: {operation} - {source}")]
    RemoteCall {
        operation: String,
        #[source]
        source: RemoteError,
    },

    /// 呼び出しは成功したが対象が存在しない
    #[error("リソースが見つかりません: {resource}")]
    NotFound { resource: String },

    /// 呼び出し側の引数が使えない（通信前に検出）
    #[error("引数が不正です: {reason}")]
    InvalidArgument { reason: String },

    /// 呼び出しは成功したがペイロードが最低限の形を満たさない
    #[error("レスポンス形式が不正です: {operation} - {reason}")]
    MalformedResponse { operation: String, reason: String },
}

impl GatewayError {
    /// リモート呼び出しエラーを作成
    pub fn remote_call<O: Into<String>>(operation: O, source: RemoteError) -> Self {
        Self::RemoteCall {
            operation: operation.into(),
            source,
        }
    }

    /// 未検出エラーを作成
    pub fn not_found<R: Into<String>>(resource: R) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn invalid_argument<R: Into<String>>(reason: R) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// 形式不正エラーを作成
    pub fn malformed<O: Into<String>, R: Into<String>>(operation: O, reason: R) -> Self {
        Self::MalformedResponse {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// ゲートウェイのResult型エイリアス
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
