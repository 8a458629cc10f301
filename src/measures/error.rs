use crate::transport::TransportError;
use crate::types::time_chunk::TimeChunk;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasuresError {
    #[error("Chunk duration must be at least one day")]
    InvalidChunkDuration,

    #[error("Fetching measures for station '{station}' over {chunk} failed")]
    Fetch {
        station: String,
        chunk: TimeChunk,
        #[source]
        source: TransportError,
    },

    #[error("Failed to decode measures for station '{station}' over {chunk}")]
    Decode {
        station: String,
        chunk: TimeChunk,
        #[source]
        source: serde_json::Error,
    },

    // Wraps the first failing chunk of a concurrent batch; nothing else from the batch is returned
    #[error("Chunk {index} of {total} {chunk} for station '{station}' failed, batch aborted")]
    ChunkBatch {
        station: String,
        index: usize,
        total: usize,
        chunk: TimeChunk,
        #[source]
        source: Box<MeasuresError>,
    },

    #[error("Measurement at {collection_time} references field id {field_id}, which is not in the field list")]
    UnknownField { field_id: i64, collection_time: i64 },

    #[error("Collection time {0} is outside the representable range")]
    InvalidTimestamp(i64),

    #[error("Refusing to overwrite existing dump file '{0}'")]
    DumpExists(PathBuf),

    #[error("I/O error writing dump file '{0}'")]
    DumpIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode dump file '{0}'")]
    DumpEncode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to build measures DataFrame")]
    DataFrame(#[from] PolarsError),
}

impl MeasuresError {
    /// The chunk a fetch-related error refers to, if any.
    pub fn chunk(&self) -> Option<TimeChunk> {
        match self {
            MeasuresError::Fetch { chunk, .. }
            | MeasuresError::Decode { chunk, .. }
            | MeasuresError::ChunkBatch { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }
}
