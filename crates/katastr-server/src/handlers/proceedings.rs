use axum::extract::{Path, State};
use axum::response::Response;
use katastr_cache::cache_key;

use super::{json_bytes, parse_id};
use crate::error::ApiError;
use crate::scope::RequestScope;
use crate::state::AppState;

/// `GET /api/proceedings/{id}`
pub async fn get(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let key = cache_key("proceeding", &[&id]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.detail, || {
            state.client.get_proceeding(cancel, id)
        })
        .await?;

    Ok(json_bytes(bytes))
}
