use axum::extract::{Path, Query, State};
use axum::response::Response;
use katastr_cache::cache_key;
use serde::Deserialize;

use super::{json_bytes, non_empty, parse_area, parse_id};
use crate::error::ApiError;
use crate::scope::RequestScope;
use crate::state::AppState;

/// Half-size of the polygon square in metres when `radius` is absent or not
/// an integer.
pub const DEFAULT_RADIUS: i32 = 5;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    area: Option<String>,
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PolygonQuery {
    lat: Option<String>,
    lon: Option<String>,
    radius: Option<String>,
}

/// `GET /api/parcels/search?area={code}&number={num}`
pub async fn search(
    State(state): State<AppState>,
    scope: RequestScope,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let (Some(area), Some(number)) = (non_empty(query.area), non_empty(query.number)) else {
        return Err(ApiError::BadRequest("missing required parameters: area, number"));
    };
    let area_code = parse_area(&area)?;

    let key = cache_key("parcels:search", &[&area_code, &number]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.search, || {
            state.client.search_parcels(cancel, area_code, &number)
        })
        .await?;

    Ok(json_bytes(bytes))
}

/// `GET /api/parcels/{id}`
pub async fn get(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let key = cache_key("parcel", &[&id]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.detail, || state.client.get_parcel(cancel, id))
        .await?;

    Ok(json_bytes(bytes))
}

/// `GET /api/parcels/polygon?lat={lat}&lon={lon}&radius={m}`
///
/// The WGS-84 point is converted to S-JTSK before querying the registry.
pub async fn polygon(
    State(state): State<AppState>,
    scope: RequestScope,
    Query(query): Query<PolygonQuery>,
) -> Result<Response, ApiError> {
    let (Some(lat), Some(lon)) = (non_empty(query.lat), non_empty(query.lon)) else {
        return Err(ApiError::BadRequest("missing required parameters: lat, lon"));
    };
    let lat: f64 = lat.parse().map_err(|_| ApiError::BadRequest("invalid lat"))?;
    let lon: f64 = lon.parse().map_err(|_| ApiError::BadRequest("invalid lon"))?;
    let radius = parse_radius(query.radius.as_deref());

    let (x, y) = katastr_coords::to_projected(lat, lon);
    tracing::debug!(
        "Polygon around ({}, {}) -> S-JTSK ({:.2}, {:.2}), radius {}",
        lat,
        lon,
        x,
        y,
        radius
    );

    let key = cache_key("parcels:polygon", &[&x, &y, &radius]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.search, || {
            state.client.polygon_parcels(cancel, x, y, radius)
        })
        .await?;

    Ok(json_bytes(bytes))
}

/// `GET /api/parcels/neighbors/{id}`
pub async fn neighbors(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let key = cache_key("parcels:neighbors", &[&id]);
    let cancel = scope.token();
    let bytes = state
        .fetcher
        .resolve(cancel, &key, state.ttl.detail, || {
            state.client.neighbor_parcels(cancel, id)
        })
        .await?;

    Ok(json_bytes(bytes))
}

fn parse_radius(value: Option<&str>) -> i32 {
    value
        .and_then(|r| r.parse().ok())
        .unwrap_or(DEFAULT_RADIUS)
}
