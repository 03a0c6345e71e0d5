use crate::infra::api::RemoteClient;
use crate::types::{GatewayError, GatewayResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// ストアドプロシージャを1回呼び出し、失敗はそのまま`RemoteCall`として返す
pub(crate) async fn call_procedure(
    client: &dyn RemoteClient,
    procedure: &str,
    params: Value,
) -> GatewayResult<Option<Value>> {
    tracing::debug!(procedure, %params, "ストアドプロシージャ呼び出し");
    client.call_rpc(procedure, params).await.map_err(|e| {
        tracing::warn!(procedure, error = %e, "ストアドプロシージャ呼び出しに失敗");
        GatewayError::remote_call(procedure, e)
    })
}

/// ペイロードをローカルの型に変換する（ペイロード無しはデフォルト値）
pub(crate) fn decode_or_default<T>(operation: &str, payload: Option<Value>) -> GatewayResult<T>
where
    T: DeserializeOwned + Default,
{
    match payload {
        Some(value) => decode(operation, value),
        None => Ok(T::default()),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> GatewayResult<T> {
    serde_json::from_value(value).map_err(|e| GatewayError::malformed(operation, e.to_string()))
}
