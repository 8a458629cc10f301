//! Drives a chunked bulk fetch: split the interval, fetch every chunk under a
//! connection ceiling, and hand back the results in chunk order.

use crate::config::ConnectionLimits;
use crate::measures::chunker::chunk;
use crate::measures::error::MeasuresError;
use crate::measures::fetcher::MeasurementFetcher;
use crate::transport::Transport;
use crate::types::bulk_measures::BulkMeasures;
use crate::types::time_chunk::TimeChunk;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{info, warn};
use serde_json::Value;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

/// Fetches long intervals for one station as concurrent chunked requests.
///
/// Each [`ChunkedFetcher::run`] owns its own batch of requests; the only thing
/// shared between runs is the transport's connection pool.
pub struct ChunkedFetcher<'a, T: Transport> {
    fetcher: MeasurementFetcher<'a, T>,
    limits: ConnectionLimits,
}

impl<'a, T: Transport> ChunkedFetcher<'a, T> {
    /// `timeout` bounds each chunk's request, not the batch.
    pub fn new(transport: &'a T, timeout: Duration, limits: ConnectionLimits) -> Self {
        Self {
            fetcher: MeasurementFetcher::new(transport, timeout),
            limits,
        }
    }

    /// Fetches `[start, end)` for `station_id` in chunks of `duration_days`.
    ///
    /// At most `limits.max_connections` chunk requests are in flight at once; the
    /// rest wait for a slot. Results come back ordered by chunk start whatever
    /// order the requests complete in.
    ///
    /// The batch is all-or-nothing: the first failing chunk aborts it, pending
    /// requests are dropped and the error names that chunk. An empty interval
    /// yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`MeasuresError::InvalidChunkDuration`] when `duration_days` is zero,
    /// and [`MeasuresError::ChunkBatch`] wrapping the first chunk failure otherwise.
    pub async fn run(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_days: u32,
        fields: Option<&[String]>,
    ) -> Result<Vec<BulkMeasures>, MeasuresError> {
        self.gather(station_id, start, end, duration_days, |chunk| {
            self.fetcher.fetch(station_id, chunk, fields)
        })
        .await
    }

    /// [`ChunkedFetcher::run`], keeping every response body exactly as served.
    pub async fn run_raw(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_days: u32,
        fields: Option<&[String]>,
    ) -> Result<Vec<Value>, MeasuresError> {
        self.gather(station_id, start, end, duration_days, |chunk| {
            self.fetcher.fetch_raw(station_id, chunk, fields)
        })
        .await
    }

    async fn gather<O, F, Fut>(
        &self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_days: u32,
        fetch_one: F,
    ) -> Result<Vec<O>, MeasuresError>
    where
        F: Fn(TimeChunk) -> Fut,
        Fut: Future<Output = Result<O, MeasuresError>>,
    {
        let duration_days =
            NonZeroU32::new(duration_days).ok_or(MeasuresError::InvalidChunkDuration)?;
        let chunks = chunk(start, end, duration_days);
        if chunks.is_empty() {
            info!("Nothing to fetch for station {}: empty interval", station_id);
            return Ok(Vec::new());
        }

        let total = chunks.len();
        let ceiling = self.limits.max_connections.max(1);
        info!(
            "Fetching {} chunk(s) of up to {} days for station {} with at most {} connections",
            total, duration_days, station_id, ceiling
        );

        let mut gathered: Vec<(TimeChunk, O)> = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| {
                let pending = fetch_one(chunk);
                async move {
                    match pending.await {
                        Ok(output) => Ok((chunk, output)),
                        Err(source) => {
                            warn!(
                                "Chunk {} of {} {} for station {} failed: {}",
                                index, total, chunk, station_id, source
                            );
                            Err(MeasuresError::ChunkBatch {
                                station: station_id.to_string(),
                                index,
                                total,
                                chunk,
                                source: Box::new(source),
                            })
                        }
                    }
                }
            })
            .buffer_unordered(ceiling)
            .try_collect()
            .await?;

        // Completion order is arbitrary
        gathered.sort_by_key(|(chunk, _)| chunk.start);
        Ok(gathered.into_iter().map(|(_, output)| output).collect())
    }
}
