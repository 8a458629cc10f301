use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Failed to fetch the station directory")]
    Directory(#[source] TransportError),

    #[error("Failed to decode the station directory")]
    DirectoryDecode(#[source] serde_json::Error),

    #[error("Failed to fetch the field catalog for station '{station}'")]
    Fields {
        station: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to decode the field catalog for station '{station}'")]
    FieldsDecode {
        station: String,
        #[source]
        source: serde_json::Error,
    },
}
