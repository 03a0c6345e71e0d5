use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::types::{ConfigError, ConfigResult, RemoteError, RemoteResult};

/// ホスティングサービスへの呼び出しを抽象化するトレイト
///
/// 本番用のHTTP実装とテスト用のモック実装を統一的に扱うためのインターフェース。
/// ゲートウェイは構築時にこのトレイトの実装を受け取る。
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// 名前付きストアドプロシージャを呼び出す
    ///
    /// 成功してもペイロードが無い（`null`・空本文）場合は`Ok(None)`を返す。
    async fn call_rpc(&self, procedure: &str, params: Value) -> RemoteResult<Option<Value>>;

    /// テーブルから指定カラムの行を取得する
    ///
    /// # Arguments
    /// * `table` - 対象テーブル名
    /// * `columns` - `select`に渡すカラム指定
    /// * `filters` - 等価条件 `(カラム, 値)` の並び
    async fn select_rows(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
    ) -> RemoteResult<Vec<Value>>;

    /// オブジェクトストレージにアップロードし、保存先パスを返す
    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> RemoteResult<String>;

    /// オブジェクトをダウンロードする。存在しない場合は`Ok(None)`
    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Option<Vec<u8>>>;

    /// 公開URLを組み立てる（通信なし）
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// ストレージのパスを正規化する
///
/// 先頭と末尾の`/`を除去し、連続する`/`を1つにまとめる。
pub fn clean_object_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// JSON値をペイロードとして解釈する（`null`はペイロード無し）
fn payload_from_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

/// ベースURLに対してパスセグメントを追加したURLを作る
fn join_segments<'a, I>(base: &Url, segments: I) -> Url
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    // 構築時にcannot-be-a-baseでないことを検証済み
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        path.extend(segments);
    }
    url
}

/// `reqwest` を使用した本番用のクライアント実装
///
/// REST (`/rest/v1`) とストレージ (`/storage/v1`) の両エンドポイントを扱う。
pub struct ReqwestRemoteClient {
    client: Client,
    base_url: Url,
}

impl ReqwestRemoteClient {
    /// 新しいクライアントを作成
    ///
    /// # Arguments
    /// * `base_url` - サービスのベースURL
    /// * `api_key` - 匿名キー（`apikey`ヘッダとBearerトークンに使う）
    /// * `timeout_secs` - リクエストごとのタイムアウト（秒）
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> ConfigResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::invalid_endpoint(base_url, e.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_endpoint(
                base_url.as_str(),
                "http(s)の絶対URLが必要です",
            ));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| ConfigError::invalid_value("APIキーにヘッダとして使えない文字が含まれています"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ConfigError::invalid_value("APIキーにヘッダとして使えない文字が含まれています"))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ConfigError::invalid_value(format!("HTTPクライアントの初期化に失敗: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn rest_url(&self, segments: &[&str]) -> Url {
        join_segments(&self.base_url, ["rest", "v1"].into_iter().chain(segments.iter().copied()))
    }

    fn object_url(&self, bucket: &str, path: &str) -> Url {
        let path = clean_object_path(path);
        join_segments(
            &self.base_url,
            ["storage", "v1", "object", bucket]
                .into_iter()
                .chain(path.split('/')),
        )
    }

    /// エラーレスポンスからメッセージを取り出す
    ///
    /// PostgREST・ストレージともに`message`（または`error`）フィールドを持つJSONを返す。
    async fn error_message(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(text),
            Err(_) => text,
        }
    }
}

#[async_trait]
impl RemoteClient for ReqwestRemoteClient {
    async fn call_rpc(&self, procedure: &str, params: Value) -> RemoteResult<Option<Value>> {
        let operation = format!("rpc/{}", procedure);
        let response = self
            .client
            .post(self.rest_url(&["rpc", procedure]))
            .json(&params)
            .send()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(RemoteError::status(operation, status.as_u16(), message));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value =
            serde_json::from_str(&text).map_err(|e| RemoteError::decode(&operation, e))?;
        Ok(payload_from_value(value))
    }

    async fn select_rows(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
    ) -> RemoteResult<Vec<Value>> {
        let operation = format!("select/{}", table);
        let mut query: Vec<(String, String)> = vec![("select".to_string(), columns.to_string())];
        query.extend(
            filters
                .iter()
                .map(|(column, value)| (column.to_string(), format!("eq.{}", value))),
        );

        let response = self
            .client
            .get(self.rest_url(&[table]))
            .query(&query)
            .send()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(RemoteError::status(operation, status.as_u16(), message));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;
        serde_json::from_str(&text).map_err(|e| RemoteError::decode(operation, e))
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> RemoteResult<String> {
        let operation = format!("upload/{}", bucket);
        let response = self
            .client
            .post(self.object_url(bucket, path))
            .header(CONTENT_TYPE, content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(RemoteError::status(operation, status.as_u16(), message));
        }

        Ok(clean_object_path(path))
    }

    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Option<Vec<u8>>> {
        let operation = format!("download/{}", bucket);
        let response = self
            .client
            .get(self.object_url(bucket, path))
            .send()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
            // ストレージは未検出を400 + statusCode "404" で返すことがある
            if body.get("statusCode").and_then(Value::as_str) == Some("404") {
                return Ok(None);
            }
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(text);
            return Err(RemoteError::status(operation, status.as_u16(), message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(&operation, e))?;
        Ok(Some(bytes.to_vec()))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        let path = clean_object_path(path);
        join_segments(
            &self.base_url,
            ["storage", "v1", "object", "public", bucket]
                .into_iter()
                .chain(path.split('/')),
        )
        .to_string()
    }
}

/// モックに記録された呼び出し
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Rpc {
        procedure: String,
        params: Value,
    },
    Select {
        table: String,
        columns: String,
        filters: Vec<(String, String)>,
    },
    Upload {
        bucket: String,
        path: String,
        body: Vec<u8>,
        content_type: String,
    },
    Download {
        bucket: String,
        path: String,
    },
}

/// モックが返す応答
#[derive(Debug, Clone)]
enum MockReply<T> {
    Success(T),
    Failure { status: u16, message: String },
}

impl<T: Clone> MockReply<T> {
    fn resolve(&self, operation: &str) -> RemoteResult<T> {
        match self {
            Self::Success(value) => Ok(value.clone()),
            Self::Failure { status, message } => {
                Err(RemoteError::status(operation, *status, message.clone()))
            }
        }
    }
}

/// テスト用のモッククライアント
///
/// 実際の通信を行わずに、定義済みのレスポンスやエラーを返す。
/// すべての呼び出しを記録するので、パラメータの形を検証できる。
#[derive(Default)]
pub struct MockRemoteClient {
    rpc_replies: HashMap<String, MockReply<Value>>,
    table_replies: HashMap<String, MockReply<Vec<Value>>>,
    objects: HashMap<(String, String), Vec<u8>>,
    upload_failure: Option<(u16, String)>,
    public_base: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRemoteClient {
    /// 何も登録されていないモッククライアントを作成
    pub fn new() -> Self {
        Self {
            public_base: "https://mock.supabase.local".to_string(),
            ..Self::default()
        }
    }

    /// プロシージャの成功レスポンスを登録（`Value::Null`はペイロード無し）
    pub fn with_rpc(mut self, procedure: &str, payload: Value) -> Self {
        self.rpc_replies
            .insert(procedure.to_string(), MockReply::Success(payload));
        self
    }

    /// プロシージャのエラーレスポンスを登録
    pub fn with_rpc_error(mut self, procedure: &str, status: u16, message: &str) -> Self {
        self.rpc_replies.insert(
            procedure.to_string(),
            MockReply::Failure {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// テーブル取得の成功レスポンスを登録
    pub fn with_rows(mut self, table: &str, rows: Vec<Value>) -> Self {
        self.table_replies
            .insert(table.to_string(), MockReply::Success(rows));
        self
    }

    /// テーブル取得のエラーレスポンスを登録
    pub fn with_rows_error(mut self, table: &str, status: u16, message: &str) -> Self {
        self.table_replies.insert(
            table.to_string(),
            MockReply::Failure {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// ダウンロード可能なオブジェクトを登録
    pub fn with_object(mut self, bucket: &str, path: &str, body: &[u8]) -> Self {
        self.objects
            .insert((bucket.to_string(), clean_object_path(path)), body.to_vec());
        self
    }

    /// すべてのアップロードを拒否させる
    pub fn with_upload_error(mut self, status: u16, message: &str) -> Self {
        self.upload_failure = Some((status, message.to_string()));
        self
    }

    /// 記録された呼び出しの一覧
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    /// 記録されたプロシージャ呼び出しのパラメータ（呼び出し順）
    pub fn rpc_params(&self, procedure: &str) -> Vec<Value> {
        self.recorded()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Rpc { procedure: p, params } if p == procedure => Some(params.clone()),
                _ => None,
            })
            .collect()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: RecordedCall) {
        self.recorded().push(call);
    }
}

#[async_trait]
impl RemoteClient for MockRemoteClient {
    async fn call_rpc(&self, procedure: &str, params: Value) -> RemoteResult<Option<Value>> {
        self.record(RecordedCall::Rpc {
            procedure: procedure.to_string(),
            params,
        });
        let operation = format!("rpc/{}", procedure);
        match self.rpc_replies.get(procedure) {
            Some(reply) => reply.resolve(&operation).map(payload_from_value),
            None => Err(RemoteError::status(
                operation,
                404,
                format!("モックにプロシージャが未登録: {}", procedure),
            )),
        }
    }

    async fn select_rows(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
    ) -> RemoteResult<Vec<Value>> {
        self.record(RecordedCall::Select {
            table: table.to_string(),
            columns: columns.to_string(),
            filters: filters
                .iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        });
        let operation = format!("select/{}", table);
        match self.table_replies.get(table) {
            Some(reply) => reply.resolve(&operation),
            None => Ok(Vec::new()),
        }
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> RemoteResult<String> {
        self.record(RecordedCall::Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        match &self.upload_failure {
            Some((status, message)) => Err(RemoteError::status(
                format!("upload/{}", bucket),
                *status,
                message.clone(),
            )),
            None => Ok(clean_object_path(path)),
        }
    }

    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Option<Vec<u8>>> {
        self.record(RecordedCall::Download {
            bucket: bucket.to_string(),
            path: path.to_string(),
        });
        Ok(self
            .objects
            .get(&(bucket.to_string(), clean_object_path(path)))
            .cloned())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.public_base,
            bucket,
            clean_object_path(path)
        )
    }
}
