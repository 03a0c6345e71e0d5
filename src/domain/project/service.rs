use super::model::{ProjectListing, ProjectQuery};
use crate::domain::procedure::{call_procedure, decode_or_default};
use crate::infra::api::RemoteClient;
use crate::types::GatewayResult;
use serde_json::json;

/// プロジェクト一覧・技術スタック統計・状態別件数を取得する
///
/// 状態別件数が無い場合はすべて0になる。
pub async fn list_projects_with_client(
    client: &dyn RemoteClient,
    query: &ProjectQuery,
) -> GatewayResult<ProjectListing> {
    let params = json!({
        "p_status": query.status,
        "p_technology": query.technology,
        "p_sort_by": query.sort_by,
    });
    let payload = call_procedure(client, "get_projects", params).await?;
    decode_or_default("get_projects", payload)
}
