//! Client configuration: where the API lives, how long calls may take and how
//! many connections a bulk fetch may hold open at once.

use crate::transport::BASE_URL;
use bon::Builder;
use std::time::Duration;

/// Default number of days covered by one chunk of a bulk fetch.
pub const DEFAULT_DURATION_DAYS: u32 = 30;

/// Caps on the shared connection pool.
///
/// `max_connections` is the ceiling on requests in flight during one bulk fetch;
/// chunks beyond it wait for a free slot. `max_keepalive_connections` is the
/// number of idle connections the pool keeps per host between requests.
///
/// # Examples
///
/// ```
/// use wisconet::ConnectionLimits;
///
/// let limits = ConnectionLimits::default();
/// assert_eq!(limits.max_connections, 5);
/// assert_eq!(limits.max_keepalive_connections, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub max_connections: usize,
    pub max_keepalive_connections: usize,
}

impl ConnectionLimits {
    pub fn new(max_connections: usize, max_keepalive_connections: usize) -> Self {
        Self {
            max_connections,
            max_keepalive_connections,
        }
    }
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

/// Settings for a [`crate::Wisconet`] client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wisconet::{ConnectionLimits, WisconetConfig};
///
/// let config = WisconetConfig::builder()
///     .bulk_timeout(Duration::from_secs(120))
///     .duration_days(14)
///     .limits(ConnectionLimits::new(8, 8))
///     .build();
/// assert_eq!(config.base_url, "https://wisconet.wisc.edu/api/v1");
/// assert_eq!(config.duration_days, 14);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct WisconetConfig {
    /// Root of the API, without a trailing slash.
    #[builder(into, default = BASE_URL.to_string())]
    pub base_url: String,
    /// Timeout for metadata calls and single unchunked fetches.
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
    /// Timeout for each chunk of a bulk fetch.
    #[builder(default = Duration::from_secs(60))]
    pub bulk_timeout: Duration,
    /// Days per chunk for bulk fetches.
    #[builder(default = DEFAULT_DURATION_DAYS)]
    pub duration_days: u32,
    #[builder(default)]
    pub limits: ConnectionLimits,
}

impl Default for WisconetConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
