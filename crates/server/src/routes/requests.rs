use axum::{extract::{Path, State}, Json};
use serde::Serialize;
use service::{errors::ServiceError, Collection, Item};

use crate::{errors::JsonApiError, extract::ItemBody, routes::ServerState};

const NOT_FOUND: &str = "Request not found";

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub status: &'static str,
    pub saved: Item,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub status: &'static str,
    pub updated: Item,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub status: &'static str,
    pub id: String,
}

fn request_error(e: ServiceError) -> JsonApiError {
    if e.is_not_found() {
        JsonApiError::not_found(NOT_FOUND)
    } else {
        e.into()
    }
}

#[utoipa::path(get, path = "/api/requests", tag = "requests", responses((status = 200, description = "All saved requests"), (status = 500, description = "Storage Error")))]
pub async fn list_requests(State(state): State<ServerState>) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.collections.list(Collection::Requests).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/api/requests/{id}", tag = "requests",
    params(("id" = String, Path, description = "Request id")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, JsonApiError> {
    state.collections.get(Collection::Requests, &id).await
        .map(Json)
        .map_err(request_error)
}

#[utoipa::path(
    post, path = "/api/requests", tag = "requests",
    request_body = crate::openapi::ItemDoc,
    responses((status = 200, description = "Saved"), (status = 400, description = "Body is not a JSON object"), (status = 500, description = "Storage Error"))
)]
pub async fn create_request(
    State(state): State<ServerState>,
    ItemBody(body): ItemBody,
) -> Result<Json<SavedResponse>, JsonApiError> {
    let saved = state.collections.create(Collection::Requests, body).await?;
    Ok(Json(SavedResponse { status: "success", saved }))
}

#[utoipa::path(
    put, path = "/api/requests/{id}", tag = "requests",
    params(("id" = String, Path, description = "Request id")),
    request_body = crate::openapi::ItemDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_request(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ItemBody(patch): ItemBody,
) -> Result<Json<UpdatedResponse>, JsonApiError> {
    let updated = state.collections.update(Collection::Requests, &id, patch).await
        .map_err(request_error)?;
    Ok(Json(UpdatedResponse { status: "updated", updated }))
}

#[utoipa::path(
    delete, path = "/api/requests/{id}", tag = "requests",
    params(("id" = String, Path, description = "Request id")),
    responses((status = 200, description = "Deleted, or already absent"))
)]
pub async fn delete_request(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    state.collections.delete(Collection::Requests, &id).await?;
    Ok(Json(DeletedResponse { status: "deleted", id }))
}
