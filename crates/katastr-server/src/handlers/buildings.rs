use axum::extract::{Path, Query, State};
use axum::response::Response;
use katastr_cache::cache_key;
use serde::Deserialize;

use super::{json_bytes, non_empty, parse_area, parse_id};
use crate::error::ApiError;
use crate::scope::RequestScope;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    area: Option<String>,
    number: Option<String>,
}

/// `GET /api/buildings/search?area={code}&number={num}`
pub async fn search(
    State(state): State<AppState>,
    scope: RequestScope,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let (Some(area), Some(number)) = (non_empty(query.area), non_empty(query.number)) else {
        return Err(ApiError::BadRequest("missing required parameters: area, number"));
    };
    let area_code = parse_area(&area)?;

    let key = cache_key("buildings:search", &[&area_code, &number]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.search, || {
            state.client.search_buildings(cancel, area_code, &number)
        })
        .await?;

    Ok(json_bytes(bytes))
}

/// `GET /api/buildings/{id}`
pub async fn get(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let key = cache_key("building", &[&id]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.detail, || state.client.get_building(cancel, id))
        .await?;

    Ok(json_bytes(bytes))
}
