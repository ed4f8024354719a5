//! Building endpoints (`/Stavby`).

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::client::{CuzkClient, UpstreamRequest};
use crate::error::CuzkError;
use crate::types::{Building, BuildingSearchResponse};

impl CuzkClient {
    /// Search buildings by cadastral area code and building number.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn search_buildings(
        &self,
        cancel: &CancellationToken,
        area_code: u32,
        number: &str,
    ) -> Result<BuildingSearchResponse, CuzkError> {
        let request = UpstreamRequest::new("/Stavby/Vyhledani")
            .query("katastralniUzemi", area_code)
            .query("cislo", number);

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("search buildings"))
    }

    /// Get building detail by ISKN id.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn get_building(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> Result<Building, CuzkError> {
        let request = UpstreamRequest::new(format!("/Stavby/{}", id));

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("get building"))
    }
}
