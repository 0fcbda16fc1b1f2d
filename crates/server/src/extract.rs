use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use service::Item;

use crate::errors::JsonApiError;

/// JSON object body for create/update routes.
///
/// A missing or blank body reads as `{}`, whatever the Content-Type.
/// Anything else must be a JSON object.
#[derive(Debug, Default)]
pub struct ItemBody(pub Item);

#[async_trait]
impl<S> FromRequest<S> for ItemBody
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonApiError::new(e.status(), "Invalid body", Some(e.body_text())))?;
        parse(&bytes).map(ItemBody)
    }
}

fn parse(bytes: &[u8]) -> Result<Item, JsonApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Item::default());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid JSON body", Some(e.to_string()))
    })
}
