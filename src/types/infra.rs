use thiserror::Error;

/// リモート呼び出し層のエラー型
/// 通信、認可、ストアドプロシージャ側のエラーなど、ホスティングサービスから
/// 報告された失敗をそのまま保持する
#[derive(Error, Debug)]
pub enum RemoteError {
    /// HTTP通信そのものの失敗（接続、タイムアウトなど）
    #[error("通信エラー: {operation} - {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// サービスが2xx以外のステータスを返した
    #[error("リモートエラー: {operation} (HTTP {status}) - {message}")]
    Status {
        operation: String,
        status: u16,
        message: String,
    },

    /// レスポンス本文がJSONとして解釈できない
    #[error("レスポンス解析エラー: {context} - {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// 通信エラーを作成
    pub fn transport<O: Into<String>>(operation: O, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// ステータスエラーを作成
    pub fn status<O: Into<String>, M: Into<String>>(operation: O, status: u16, message: M) -> Self {
        Self::Status {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// 解析エラーを作成
    pub fn decode<C: Into<String>>(context: C, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTPステータスコード（ステータスエラーの場合のみ）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// リモート呼び出しのResult型エイリアス
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
