use crate::measures::error::MeasuresError;
use crate::stations::error::StationError;
use crate::transport::TransportError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WisconetError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Measures(#[from] MeasuresError),

    #[error("Station '{station}' reports unknown timezone '{timezone}'")]
    UnknownTimezone { station: String, timezone: String },

    #[error("Could not read {0} as a date or datetime")]
    DateParsing(String),

    #[error("No station matches '{0}'")]
    UnknownStation(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
