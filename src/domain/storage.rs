use crate::infra::api::{clean_object_path, RemoteClient};
use crate::types::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

/// 記事本文ファイルのコンテンツタイプ
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// ストレージのバケット名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBuckets {
    /// 記事中の画像
    pub image_bucket: String,
    /// 記事本文（Markdown）
    pub content_bucket: String,
    /// 履歴書などの個人ファイル
    pub personal_bucket: String,
}

impl Default for StorageBuckets {
    fn default() -> Self {
        Self {
            image_bucket: "article-images".to_string(),
            content_bucket: "article-contents".to_string(),
            personal_bucket: "personal-info".to_string(),
        }
    }
}

async fn upload(
    client: &dyn RemoteClient,
    bucket: &str,
    path: &str,
    body: Vec<u8>,
    content_type: &str,
) -> GatewayResult<String> {
    // 空パスはバケット直下への書き込みになる
    if clean_object_path(path).is_empty() {
        return Err(GatewayError::invalid_argument(format!(
            "保存先パスが空です: {:?}",
            path
        )));
    }
    tracing::debug!(bucket, path, size = body.len(), "ストレージへアップロード");
    client
        .upload_object(bucket, path, body, content_type)
        .await
        .map_err(|e| {
            tracing::warn!(bucket, path, error = %e, "アップロードに失敗");
            GatewayError::remote_call(format!("upload {}/{}", bucket, path), e)
        })
}

/// 画像をアップロードし、公開URLを返す
pub async fn upload_image_with_client(
    client: &dyn RemoteClient,
    buckets: &StorageBuckets,
    image: Vec<u8>,
    content_type: &str,
    path: &str,
) -> GatewayResult<String> {
    let stored = upload(client, &buckets.image_bucket, path, image, content_type).await?;
    Ok(client.public_url(&buckets.image_bucket, &stored))
}

/// 記事本文（Markdown）をアップロードし、保存先パスを返す
pub async fn upload_article_content_with_client(
    client: &dyn RemoteClient,
    buckets: &StorageBuckets,
    content: &str,
    file_name: &str,
) -> GatewayResult<String> {
    upload(
        client,
        &buckets.content_bucket,
        file_name,
        content.as_bytes().to_vec(),
        MARKDOWN_CONTENT_TYPE,
    )
    .await
}

/// 履歴書ファイルをダウンロードする
pub async fn download_resume_with_client(
    client: &dyn RemoteClient,
    buckets: &StorageBuckets,
    file_name: &str,
) -> GatewayResult<Vec<u8>> {
    let bucket = &buckets.personal_bucket;
    tracing::debug!(bucket = %bucket, file_name, "履歴書をダウンロード");
    client
        .download_object(bucket, file_name)
        .await
        .map_err(|e| {
            tracing::warn!(file_name, error = %e, "履歴書のダウンロードに失敗");
            GatewayError::remote_call(format!("download {}/{}", bucket, file_name), e)
        })?
        .ok_or_else(|| GatewayError::not_found(format!("{}/{}", bucket, file_name)))
}

/// 履歴書の公開URL（通信なし）
pub fn resume_url_with_client(
    client: &dyn RemoteClient,
    buckets: &StorageBuckets,
    file_name: &str,
) -> String {
    client.public_url(&buckets.personal_bucket, file_name)
}
