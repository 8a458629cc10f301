mod clients;
mod config;
mod error;
mod filtering;
mod measures;
mod stations;
mod transport;
mod types;
mod wisconet;

#[cfg(test)]
mod test_support;

pub use config::{ConnectionLimits, WisconetConfig, DEFAULT_DURATION_DAYS};
pub use error::WisconetError;
pub use filtering::{filter_fields, FieldCriterion};
pub use transport::{HttpTransport, Transport, TransportError, BASE_URL};
pub use wisconet::*;

pub use clients::station_client::StationClient;

pub use measures::chunker::{chunk, chunk_count};
pub use measures::dump::{dump_measures_to_disk, dump_path};
pub use measures::error::MeasuresError;
pub use measures::fetcher::MeasurementFetcher;
pub use measures::orchestrator::ChunkedFetcher;
pub use measures::reshape::{bulk_measures_to_table, to_table, MeasureRow, MeasureTable};

pub use stations::directory::{all_stations, station_fields, NO_DATA_STATION_IDS};
pub use stations::error::StationError;
pub use stations::locate_station::StationLocator;

pub use types::bulk_measures::{BulkMeasures, DataByTime, Measure, MeasureValue};
pub use types::field::Field;
pub use types::local_time::{local_to_utc, StationLocalTime};
pub use types::station::Station;
pub use types::time_chunk::TimeChunk;
pub use types::variables::{CollectionFrequency, MeasureType, Units};
