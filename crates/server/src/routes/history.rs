use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Serialize;
use service::{Collection, Item};

use crate::{errors::JsonApiError, extract::ItemBody, routes::ServerState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedHistoryResponse {
    pub status: &'static str,
    pub saved_history_item: Item,
}

#[utoipa::path(get, path = "/api/history", tag = "history", responses((status = 200, description = "All history entries")))]
pub async fn list_history(State(state): State<ServerState>) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.collections.list(Collection::History).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post, path = "/api/history", tag = "history",
    request_body = crate::openapi::ItemDoc,
    responses((status = 200, description = "Saved"))
)]
pub async fn create_history(
    State(state): State<ServerState>,
    ItemBody(body): ItemBody,
) -> Result<Json<SavedHistoryResponse>, JsonApiError> {
    let saved_history_item = state.collections.create(Collection::History, body).await?;
    Ok(Json(SavedHistoryResponse { status: "success", saved_history_item }))
}

/// Unknown ids still answer 204; the miss is only logged.
#[utoipa::path(
    delete, path = "/api/history/{id}", tag = "history",
    params(("id" = String, Path, description = "History entry id")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.collections.delete(Collection::History, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/api/history", tag = "history", responses((status = 204, description = "History cleared")))]
pub async fn clear_history(State(state): State<ServerState>) -> Result<StatusCode, JsonApiError> {
    state.collections.clear(Collection::History).await?;
    Ok(StatusCode::NO_CONTENT)
}
