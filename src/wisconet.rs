//! Entry point of the crate: the station directory plus per-station clients.

use crate::clients::station_client::StationClient;
use crate::config::{ConnectionLimits, WisconetConfig};
use crate::error::WisconetError;
use crate::measures::reshape::MeasureTable;
use crate::stations::directory::all_stations;
use crate::stations::locate_station::StationLocator;
use crate::transport::{HttpTransport, Transport};
use crate::types::field::Field;
use crate::types::local_time::StationLocalTime;
use crate::types::station::Station;
use bon::bon;
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::Mutex;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use wisconet::LatLon;
///
/// let madison = LatLon(43.0731, -89.4012);
/// assert_eq!(madison.0, 43.0731); // Latitude
/// assert_eq!(madison.1, -89.4012); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A client for the Wisconet API.
///
/// Holds the station directory, loaded once at construction, and hands out a
/// [`StationClient`] per station. Field catalogs are fetched lazily and kept for
/// the lifetime of the client.
///
/// # Examples
///
/// ```no_run
/// # use wisconet::{Wisconet, WisconetError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), WisconetError> {
/// let client = Wisconet::new().await?;
/// let arlington = client.require_station("ALTN")?;
///
/// let table = arlington
///     .bulk_fetch()
///     .start("2025-01-01T00:00:00")
///     .end("2025-03-04T00:00:00")
///     .call()
///     .await?;
/// match table {
///     Some(table) => println!("{}", table.to_dataframe()?),
///     None => println!("No data in range"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Wisconet<T: Transport = HttpTransport> {
    transport: T,
    config: WisconetConfig,
    stations: Vec<Station>,
    field_cache: Mutex<HashMap<String, Vec<Field>>>,
}

impl Wisconet {
    /// Connects to the public API with default settings and loads the station directory.
    pub async fn new() -> Result<Self, WisconetError> {
        Self::with_config(WisconetConfig::default()).await
    }

    pub async fn with_config(config: WisconetConfig) -> Result<Self, WisconetError> {
        let transport = HttpTransport::new(&config.base_url, config.limits)?;
        Self::with_transport(transport, config).await
    }
}

#[bon]
impl<T: Transport> Wisconet<T> {
    /// Loads the station directory through `transport`. Test stations are skipped.
    pub async fn with_transport(transport: T, config: WisconetConfig) -> Result<Self, WisconetError> {
        let stations = all_stations(&transport, config.timeout).await?;
        Ok(Self::from_stations(transport, config, stations))
    }

    /// Builds a client around an already loaded directory, without any remote call.
    pub fn from_stations(transport: T, config: WisconetConfig, stations: Vec<Station>) -> Self {
        Self {
            transport,
            config,
            stations,
            field_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &WisconetConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn field_cache(&self) -> &Mutex<HashMap<String, Vec<Field>>> {
        &self.field_cache
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Display names of all stations, falling back to the id when a station has no name.
    pub fn all_station_names(&self) -> Vec<&str> {
        self.stations
            .iter()
            .map(|s| s.station_name.as_deref().unwrap_or(&s.station_id))
            .collect()
    }

    /// Looks a station up by id, slug or name, ignoring case.
    pub fn get_station(&self, key: &str) -> Option<StationClient<'_, T>> {
        self.stations
            .iter()
            .find(|s| s.matches(key))
            .map(|station| StationClient::new(self, station))
    }

    /// [`Wisconet::get_station`], failing with [`WisconetError::UnknownStation`].
    pub fn require_station(&self, key: &str) -> Result<StationClient<'_, T>, WisconetError> {
        self.get_station(key)
            .ok_or_else(|| WisconetError::UnknownStation(key.to_string()))
    }

    /// The closest station to `location` and its distance in meters.
    pub fn nearest_station(&self, location: LatLon) -> Option<(StationClient<'_, T>, f64)> {
        StationLocator::new(&self.stations)
            .nearest(location)
            .map(|(station, distance)| (StationClient::new(self, station), distance))
    }

    /// Stations around a location, nearest first, with distances in meters.
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.max_distance_m(f64)`: Optional radius. Unbounded by default.
    /// * `.limit(usize)`: Optional. At most this many stations; defaults to `3`.
    ///
    /// ```no_run
    /// # use wisconet::{LatLon, Wisconet, WisconetError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), WisconetError> {
    /// let client = Wisconet::new().await?;
    /// for (station, meters) in client
    ///     .nearest_stations()
    ///     .location(LatLon(43.0731, -89.4012))
    ///     .max_distance_m(50_000.0)
    ///     .call()
    /// {
    ///     println!("{} at {:.1} km", station.station().station_id, meters / 1000.0);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn nearest_stations<'s>(
        &'s self,
        location: LatLon,
        max_distance_m: Option<f64>,
        limit: Option<usize>,
    ) -> Vec<(StationClient<'s, T>, f64)> {
        let limit = limit.unwrap_or(3);
        StationLocator::new(&self.stations)
            .query(location, limit, max_distance_m)
            .into_iter()
            .map(|(station, distance)| (StationClient::new(self, station), distance))
            .collect()
    }

    /// Bulk fetches the same local time range from several stations, one station
    /// after the other, and concatenates the tables in `station_ids` order.
    ///
    /// `start` and `end` are read in each station's own timezone. Ids that match
    /// no station are skipped with a warning. `Ok(None)` when no station
    /// returned any measures.
    ///
    /// Optional: `.fields(&[..])`, `.limits(ConnectionLimits)` and
    /// `.duration_days(u32)`, with the defaults from [`WisconetConfig`].
    #[builder]
    pub async fn get_data<S, E>(
        &self,
        station_ids: &[&str],
        start: S,
        end: E,
        fields: Option<&[String]>,
        limits: Option<ConnectionLimits>,
        duration_days: Option<u32>,
    ) -> Result<Option<MeasureTable>, WisconetError>
    where
        S: StationLocalTime + Clone + fmt::Debug,
        E: StationLocalTime + Clone + fmt::Debug,
    {
        let mut tables = Vec::new();
        for key in station_ids {
            let Some(station) = self.get_station(key) else {
                warn!("No station matches '{}', skipping", key);
                continue;
            };
            let table = station
                .bulk_fetch()
                .start(start.clone())
                .end(end.clone())
                .maybe_fields(fields)
                .maybe_limits(limits)
                .maybe_duration_days(duration_days)
                .call()
                .await?;
            match table {
                Some(table) => tables.push(table),
                None => info!("Station {} returned no measures", station.station().station_id),
            }
        }
        Ok(MeasureTable::concat(tables))
    }
}
