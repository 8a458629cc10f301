//! Station directory and per-station field catalogs.

use crate::stations::error::StationError;
use crate::transport::Transport;
use crate::types::field::Field;
use crate::types::station::Station;
use log::{debug, info};
use std::time::Duration;

pub(crate) const STATIONS_ROUTE: &str = "/stations/";

/// Stations the API lists but never reports data for.
pub const NO_DATA_STATION_IDS: [&str; 2] = ["WNTEST1", "MITEST1"];

pub(crate) fn fields_route(station_id: &str) -> String {
    format!("/fields/{station_id}/available_fields")
}

/// Fetches every station in the directory, minus [`NO_DATA_STATION_IDS`].
pub async fn all_stations<T: Transport>(
    transport: &T,
    timeout: Duration,
) -> Result<Vec<Station>, StationError> {
    let body = transport
        .get_json(STATIONS_ROUTE, &[], timeout)
        .await
        .map_err(StationError::Directory)?;
    let stations: Vec<Station> =
        serde_json::from_value(body).map_err(StationError::DirectoryDecode)?;

    let listed = stations.len();
    let stations: Vec<Station> = stations
        .into_iter()
        .filter(|s| !NO_DATA_STATION_IDS.contains(&s.station_id.as_str()))
        .collect();
    info!(
        "Loaded {} stations ({} test stations skipped)",
        stations.len(),
        listed - stations.len()
    );
    Ok(stations)
}

/// Fetches the catalog of fields `station_id` reports.
pub async fn station_fields<T: Transport>(
    transport: &T,
    station_id: &str,
    timeout: Duration,
) -> Result<Vec<Field>, StationError> {
    let body = transport
        .get_json(&fields_route(station_id), &[], timeout)
        .await
        .map_err(|source| StationError::Fields {
            station: station_id.to_string(),
            source,
        })?;
    let fields: Vec<Field> =
        serde_json::from_value(body).map_err(|source| StationError::FieldsDecode {
            station: station_id.to_string(),
            source,
        })?;
    debug!("Station {} reports {} fields", station_id, fields.len());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_json, stations_json, MockTransport};
    use crate::transport::TransportError;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_directory_skips_test_stations() -> Result<(), StationError> {
        let transport = MockTransport::new().with_route(STATIONS_ROUTE, stations_json());
        let stations = all_stations(&transport, TIMEOUT).await?;

        let ids: Vec<&str> = stations.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, ["ALTN", "MAPL", "HNCK"]);
        assert_eq!(stations[0].latitude, 43.3015);
        assert_eq!(stations[1].elevation, 330.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_errors() {
        let transport = MockTransport::new();
        let err = all_stations(&transport, TIMEOUT).await.unwrap_err();
        assert!(matches!(
            err,
            StationError::Directory(TransportError::HttpStatus { .. })
        ));

        let transport = MockTransport::new().with_route(STATIONS_ROUTE, json!({"stations": []}));
        let err = all_stations(&transport, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, StationError::DirectoryDecode(_)));
    }

    #[tokio::test]
    async fn test_field_catalog() -> Result<(), StationError> {
        let transport = MockTransport::new().with_route("/fields/ALTN/available_fields", catalog_json());
        let fields = station_fields(&transport, "ALTN", TIMEOUT).await?;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].measure_type.as_deref(), Some("Relative Humidity"));

        let err = station_fields(&transport, "MAPL", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, StationError::Fields { ref station, .. } if station == "MAPL"));
        Ok(())
    }
}
