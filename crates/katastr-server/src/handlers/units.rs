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
    #[serde(rename = "buildingNo")]
    building_no: Option<String>,
    #[serde(rename = "unitNo")]
    unit_no: Option<String>,
}

/// `GET /api/units/search?area={code}&buildingNo={no}&unitNo={no}`
pub async fn search(
    State(state): State<AppState>,
    scope: RequestScope,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let (Some(area), Some(building_no), Some(unit_no)) = (
        non_empty(query.area),
        non_empty(query.building_no),
        non_empty(query.unit_no),
    ) else {
        return Err(ApiError::BadRequest(
            "missing required parameters: area, buildingNo, unitNo",
        ));
    };
    let area_code = parse_area(&area)?;

    let key = cache_key("units:search", &[&area_code, &building_no, &unit_no]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.search, || {
            state
                .client
                .search_units(cancel, area_code, &building_no, &unit_no)
        })
        .await?;

    Ok(json_bytes(bytes))
}

/// `GET /api/units/{id}`
pub async fn get(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let key = cache_key("unit", &[&id]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.detail, || state.client.get_unit(cancel, id))
        .await?;

    Ok(json_bytes(bytes))
}
