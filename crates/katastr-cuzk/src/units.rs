//! Property unit endpoints (`/Jednotky`).

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::client::{CuzkClient, UpstreamRequest};
use crate::error::CuzkError;
use crate::types::{Unit, UnitSearchResponse};

impl CuzkClient {
    /// Search units by cadastral area, building number and unit number.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn search_units(
        &self,
        cancel: &CancellationToken,
        area_code: u32,
        building_no: &str,
        unit_no: &str,
    ) -> Result<UnitSearchResponse, CuzkError> {
        let request = UpstreamRequest::new("/Jednotky/Vyhledani")
            .query("katastralniUzemi", area_code)
            .query("cisloStavby", building_no)
            .query("cisloJednotky", unit_no);

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("search units"))
    }

    /// Get unit detail by ISKN id.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn get_unit(&self, cancel: &CancellationToken, id: i64) -> Result<Unit, CuzkError> {
        let request = UpstreamRequest::new(format!("/Jednotky/{}", id));

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("get unit"))
    }
}
