//! Parcel endpoints (`/Parcely`).

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::client::{CuzkClient, UpstreamRequest};
use crate::error::CuzkError;
use crate::types::{NeighborParcelsResponse, Parcel, ParcelSearchResponse};

impl CuzkClient {
    /// Search parcels by cadastral area code and parcel number.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn search_parcels(
        &self,
        cancel: &CancellationToken,
        area_code: u32,
        number: &str,
    ) -> Result<ParcelSearchResponse, CuzkError> {
        let request = UpstreamRequest::new("/Parcely/Vyhledani")
            .query("katastralniUzemi", area_code)
            .query("kmenoveCislo", number);

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("search parcels"))
    }

    /// Get parcel detail by ISKN id.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn get_parcel(&self, cancel: &CancellationToken, id: i64) -> Result<Parcel, CuzkError> {
        let request = UpstreamRequest::new(format!("/Parcely/{}", id));

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("get parcel"))
    }

    /// Find parcels inside a square of half-size `radius` metres around a
    /// registry S-JTSK point (positive `x`, `y`).
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn polygon_parcels(
        &self,
        cancel: &CancellationToken,
        x: f64,
        y: f64,
        radius: i32,
    ) -> Result<ParcelSearchResponse, CuzkError> {
        let request = polygon_request(x, y, radius);

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("polygon parcels"))
    }

    /// Parcels sharing a boundary with the given parcel.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn neighbor_parcels(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> Result<NeighborParcelsResponse, CuzkError> {
        let request = UpstreamRequest::new(format!("/Parcely/SousedniParcely/{}", id));

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("neighbor parcels"))
    }
}

/// Corners go (x-r, y-r), (x-r, y+r), (x+r, y+r), (x+r, y-r), whole metres.
fn polygon_request(x: f64, y: f64, radius: i32) -> UpstreamRequest {
    let r = f64::from(radius);
    let xs = [x - r, x - r, x + r, x + r];
    let ys = [y - r, y + r, y + r, y - r];

    let request = xs
        .iter()
        .fold(UpstreamRequest::new("/Parcely/Polygon"), |req, v| {
            req.query("souradniceX", format!("{:.0}", v))
        });
    ys.iter().fold(request, |req, v| req.query("souradniceY", format!("{:.0}", v)))
}
