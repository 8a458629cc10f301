use crate::measures::error::MeasuresError;
use crate::transport::Transport;
use crate::types::bulk_measures::BulkMeasures;
use crate::types::time_chunk::TimeChunk;
use log::debug;
use serde_json::Value;
use std::time::Duration;

pub(crate) fn measures_route(station_id: &str) -> String {
    format!("/stations/{station_id}/measures")
}

/// Query parameters for one measures call. An empty field filter means "all fields".
pub(crate) fn measures_params(chunk: TimeChunk, fields: Option<&[String]>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("start_time", chunk.start_epoch().to_string()),
        ("end_time", chunk.end_epoch().to_string()),
    ];
    if let Some(fields) = fields.filter(|f| !f.is_empty()) {
        params.push(("fields", fields.join(",")));
    }
    params
}

/// Issues one measures call per chunk, handing back the decoded or the raw body.
///
/// Never retries; a failed call is reported with the station and the chunk it covered.
pub struct MeasurementFetcher<'a, T: Transport> {
    transport: &'a T,
    timeout: Duration,
}

impl<'a, T: Transport> MeasurementFetcher<'a, T> {
    pub fn new(transport: &'a T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// The response body for one chunk, exactly as the service returned it.
    pub async fn fetch_raw(
        &self,
        station_id: &str,
        chunk: TimeChunk,
        fields: Option<&[String]>,
    ) -> Result<Value, MeasuresError> {
        let route = measures_route(station_id);
        let params = measures_params(chunk, fields);
        debug!("Fetching measures for station {} over {}", station_id, chunk);

        self.transport
            .get_json(&route, &params, self.timeout)
            .await
            .map_err(|source| MeasuresError::Fetch {
                station: station_id.to_string(),
                chunk,
                source,
            })
    }

    pub async fn fetch(
        &self,
        station_id: &str,
        chunk: TimeChunk,
        fields: Option<&[String]>,
    ) -> Result<BulkMeasures, MeasuresError> {
        let body = self.fetch_raw(station_id, chunk, fields).await?;
        let measures: BulkMeasures =
            serde_json::from_value(body).map_err(|source| MeasuresError::Decode {
                station: station_id.to_string(),
                chunk,
                source,
            })?;
        debug!(
            "Station {} over {}: {} instants, {} fields",
            station_id,
            chunk,
            measures.data.len(),
            measures.fieldlist.len()
        );
        Ok(measures)
    }
}
