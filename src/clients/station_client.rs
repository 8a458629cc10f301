//! Provides [`StationClient`], the handle for everything scoped to one station.
//!
//! Clients are obtained from [`Wisconet::get_station`] and friends. Time ranges
//! passed to the fetch builders are read as wall-clock time at the station, and
//! returned tables are localized to the station's timezone.

use crate::config::ConnectionLimits;
use crate::error::WisconetError;
use crate::measures::dump::{dump_measures_to_disk, ensure_dump_target};
use crate::measures::fetcher::MeasurementFetcher;
use crate::measures::orchestrator::ChunkedFetcher;
use crate::measures::reshape::{bulk_measures_to_table, to_table, MeasureTable};
use crate::stations::directory::station_fields;
use crate::transport::Transport;
use crate::types::bulk_measures::BulkMeasures;
use crate::types::field::Field;
use crate::types::local_time::StationLocalTime;
use crate::types::station::Station;
use crate::types::time_chunk::TimeChunk;
use crate::{LatLon, Wisconet};
use bon::bon;
use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One station of a [`Wisconet`] client.
pub struct StationClient<'a, T: Transport> {
    client: &'a Wisconet<T>,
    station: &'a Station,
}

impl<T: Transport> Clone for StationClient<'_, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            station: self.station,
        }
    }
}

impl<T: Transport> fmt::Debug for StationClient<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationClient")
            .field("station_id", &self.station.station_id)
            .field("station_name", &self.station.station_name)
            .finish()
    }
}

fn resolve<L: StationLocalTime + fmt::Debug>(value: L, tz: Tz) -> Result<DateTime<Utc>, WisconetError> {
    let shown = format!("{value:?}");
    value
        .to_station_utc(tz)
        .ok_or(WisconetError::DateParsing(shown))
}

#[bon]
impl<'a, T: Transport> StationClient<'a, T> {
    pub(crate) fn new(client: &'a Wisconet<T>, station: &'a Station) -> Self {
        Self { client, station }
    }

    pub fn station(&self) -> &'a Station {
        self.station
    }

    /// The station's timezone.
    ///
    /// # Errors
    ///
    /// [`WisconetError::UnknownTimezone`] when the directory names a zone the IANA
    /// database does not know.
    pub fn timezone(&self) -> Result<Tz, WisconetError> {
        self.station
            .timezone()
            .ok_or_else(|| WisconetError::UnknownTimezone {
                station: self.station.station_id.clone(),
                timezone: self.station.station_timezone.clone(),
            })
    }

    /// Great-circle distance in meters from the station to `location`.
    pub fn distance_to(&self, location: LatLon) -> f64 {
        self.station.distance_to(location)
    }

    /// The fields this station reports. Fetched once per [`Wisconet`] client.
    pub async fn fields(&self) -> Result<Vec<Field>, WisconetError> {
        let id = &self.station.station_id;
        if let Some(fields) = self.client.field_cache().lock().await.get(id) {
            return Ok(fields.clone());
        }
        let fields = station_fields(self.client.transport(), id, self.client.config().timeout).await?;
        self.client
            .field_cache()
            .lock()
            .await
            .insert(id.clone(), fields.clone());
        Ok(fields)
    }

    /// `standard_name` of every field, optionally only those containing `filter`.
    pub async fn field_names(&self, filter: Option<&str>) -> Result<Vec<String>, WisconetError> {
        Ok(self
            .fields()
            .await?
            .into_iter()
            .filter_map(|f| f.standard_name)
            .filter(|name| filter.map_or(true, |needle| name.contains(needle)))
            .collect())
    }

    /// Fetches a local time range with a single request.
    ///
    /// Meant for short ranges; use [`StationClient::bulk_fetch`] for anything the
    /// API would rather receive in pieces. `.timeout(Duration)` defaults to the
    /// configured `timeout`. Returns `Ok(None)` when the range holds no measures.
    #[builder]
    pub async fn fetch_data<S, E>(
        &self,
        start: S,
        end: E,
        fields: Option<&[String]>,
        timeout: Option<Duration>,
    ) -> Result<Option<MeasureTable>, WisconetError>
    where
        S: StationLocalTime + fmt::Debug,
        E: StationLocalTime + fmt::Debug,
    {
        let tz = self.timezone()?;
        // Whole seconds, as sent on the wire
        let start = resolve(start, tz)?.trunc_subsecs(0);
        let end = resolve(end, tz)?.trunc_subsecs(0);
        if start >= end {
            debug!("Empty range for station {}", self.station.station_id);
            return Ok(None);
        }
        let timeout = timeout.unwrap_or(self.client.config().timeout);
        let measures = MeasurementFetcher::new(self.client.transport(), timeout)
            .fetch(&self.station.station_id, TimeChunk::new(start, end), fields)
            .await?;
        Ok(bulk_measures_to_table(
            &measures,
            Some(tz),
            Some(&self.station.station_id),
        )?)
    }

    /// Fetches a local time range as concurrent chunked requests and reshapes the
    /// result into one table ordered by time.
    ///
    /// Optional builder methods:
    /// * `.fields(&[String])`: restrict to these `standard_name`s. All fields by default.
    /// * `.duration_days(u32)`: days per chunk, must be at least 1. Defaults to 30.
    /// * `.timeout(Duration)`: per-chunk timeout. Defaults to 60 seconds.
    /// * `.limits(ConnectionLimits)`: the in-flight ceiling for this call.
    ///
    /// # Errors
    ///
    /// Any failing chunk fails the whole call; no partial table is returned.
    #[builder]
    pub async fn bulk_fetch<S, E>(
        &self,
        start: S,
        end: E,
        fields: Option<&[String]>,
        duration_days: Option<u32>,
        timeout: Option<Duration>,
        limits: Option<ConnectionLimits>,
    ) -> Result<Option<MeasureTable>, WisconetError>
    where
        S: StationLocalTime + fmt::Debug,
        E: StationLocalTime + fmt::Debug,
    {
        let tz = self.timezone()?;
        let (start, end) = (resolve(start, tz)?, resolve(end, tz)?);
        let payloads = self
            .fetch_chunks(start, end, fields, duration_days, timeout, limits)
            .await?;
        Ok(to_table(&payloads, Some(tz), Some(&self.station.station_id))?)
    }

    /// Bulk fetches everything from the station's `earliest_api_date` up to now.
    ///
    /// Takes the same optional settings as [`StationClient::bulk_fetch`].
    #[builder]
    pub async fn fetch_all_available_data(
        &self,
        fields: Option<&[String]>,
        duration_days: Option<u32>,
        timeout: Option<Duration>,
        limits: Option<ConnectionLimits>,
    ) -> Result<Option<MeasureTable>, WisconetError> {
        self.bulk_fetch()
            .start(self.station.earliest_api_datetime())
            .end(Utc::now())
            .maybe_fields(fields)
            .maybe_duration_days(duration_days)
            .maybe_timeout(timeout)
            .maybe_limits(limits)
            .call()
            .await
    }

    /// Writes the raw responses for the station's whole history to
    /// `<dir>/<STATION_ID>_measures.json` and returns the path.
    ///
    /// Fails with [`crate::MeasuresError::DumpExists`] when the file is already
    /// there, unless `.overwrite(true)` is given.
    #[builder]
    pub async fn dump_all_measures(
        &self,
        dir: &Path,
        #[builder(default)] overwrite: bool,
        fields: Option<&[String]>,
        duration_days: Option<u32>,
        timeout: Option<Duration>,
        limits: Option<ConnectionLimits>,
    ) -> Result<PathBuf, WisconetError> {
        // Fail before fetching years of data
        ensure_dump_target(dir, &self.station.station_id, overwrite).await?;
        let tz = self.timezone()?;
        let start = resolve(self.station.earliest_api_datetime(), tz)?;
        let (duration_days, timeout, limits) = self.chunk_settings(duration_days, timeout, limits);
        let bodies = ChunkedFetcher::new(self.client.transport(), timeout, limits)
            .run_raw(&self.station.station_id, start, Utc::now(), duration_days, fields)
            .await?;
        Ok(dump_measures_to_disk(&bodies, dir, &self.station.station_id, overwrite).await?)
    }

    /// Per-call overrides, falling back to the client configuration.
    fn chunk_settings(
        &self,
        duration_days: Option<u32>,
        timeout: Option<Duration>,
        limits: Option<ConnectionLimits>,
    ) -> (u32, Duration, ConnectionLimits) {
        let config = self.client.config();
        (
            duration_days.unwrap_or(config.duration_days),
            timeout.unwrap_or(config.bulk_timeout),
            limits.unwrap_or(config.limits),
        )
    }

    async fn fetch_chunks(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        fields: Option<&[String]>,
        duration_days: Option<u32>,
        timeout: Option<Duration>,
        limits: Option<ConnectionLimits>,
    ) -> Result<Vec<BulkMeasures>, WisconetError> {
        let (duration_days, timeout, limits) = self.chunk_settings(duration_days, timeout, limits);

        info!(
            "Bulk fetch for station {} from {} to {}",
            self.station.station_id, start, end
        );
        let payloads = ChunkedFetcher::new(self.client.transport(), timeout, limits)
            .run(&self.station.station_id, start, end, duration_days, fields)
            .await?;
        Ok(payloads)
    }
}
