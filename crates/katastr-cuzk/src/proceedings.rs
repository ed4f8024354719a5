//! Proceeding endpoints (`/Rizeni`).

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::client::{CuzkClient, UpstreamRequest};
use crate::error::CuzkError;
use crate::types::Proceeding;

impl CuzkClient {
    /// Get proceeding detail by ISKN id.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn get_proceeding(
        &self,
        cancel: &CancellationToken,
        id: i64,
    ) -> Result<Proceeding, CuzkError> {
        let request = UpstreamRequest::new(format!("/Rizeni/{}", id));

        self.get(cancel, &request)
            .await
            .map_err(|e| e.context("get proceeding"))
    }
}
