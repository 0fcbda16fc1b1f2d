use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// A stored item. Any other JSON fields are accepted and kept as-is;
/// `id` is assigned by the server and ignored in request bodies.
#[derive(ToSchema)]
pub struct ItemDoc {
    pub id: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::requests::list_requests,
        crate::routes::requests::get_request,
        crate::routes::requests::create_request,
        crate::routes::requests::update_request,
        crate::routes::requests::delete_request,
        crate::routes::history::list_history,
        crate::routes::history::create_history,
        crate::routes::history::delete_history,
        crate::routes::history::clear_history,
    ),
    components(
        schemas(
            HealthResponse,
            ItemDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "requests"),
        (name = "history")
    )
)]
pub struct ApiDoc;
