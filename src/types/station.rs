//! Defines the data structures representing Wisconet weather stations and their metadata.
//!
//! The station directory delivers coordinates as either numbers or strings and the
//! first day of available data as `MM/DD/YYYY`; both are normalized while decoding.

use crate::LatLon;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use haversine::{distance, Location as HaversineLocation, Units};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A single Wisconet station as listed by `GET /stations/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Numeric database identifier.
    pub id: i64,
    /// Short unique code used in every route (e.g. "ALTN").
    pub station_id: String,
    /// Display name (e.g. "Arlington").
    pub station_name: Option<String>,
    /// URL-friendly name.
    pub station_slug: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(deserialize_with = "number_or_string")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(deserialize_with = "number_or_string")]
    pub longitude: f64,
    /// Elevation in meters.
    #[serde(deserialize_with = "number_or_string")]
    pub elevation: f64,
    /// IANA name of the station's local zone (e.g. "America/Chicago").
    pub station_timezone: String,
    /// First day with data available from the API.
    #[serde(with = "us_date")]
    pub earliest_api_date: NaiveDate,
    pub city: Option<String>,
    pub county: Option<String>,
    pub location: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub campbell_cloud_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub legacy_id: Option<String>,
}

impl Station {
    /// Resolves `station_timezone` against the IANA database.
    ///
    /// Returns `None` for names the database does not know.
    pub fn timezone(&self) -> Option<Tz> {
        self.station_timezone.parse::<Tz>().ok()
    }

    /// `earliest_api_date` at local midnight.
    pub fn earliest_api_datetime(&self) -> NaiveDateTime {
        self.earliest_api_date.and_time(NaiveTime::MIN)
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// Great-circle distance in meters from this station to `location`.
    pub fn distance_to(&self, location: LatLon) -> f64 {
        let km = distance(
            HaversineLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            HaversineLocation {
                latitude: location.0,
                longitude: location.1,
            },
            Units::Kilometers,
        );
        km * 1000.0
    }

    /// True when `key` equals the station id, slug or name, ignoring case.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.station_id.to_lowercase() == key
            || self
                .station_slug
                .as_deref()
                .is_some_and(|slug| slug.to_lowercase() == key)
            || self
                .station_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == key)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid number '{s}': {e}"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientString {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<LenientString>::deserialize(deserializer)?.map(|value| match value {
            LenientString::Text(s) => s,
            LenientString::Integer(i) => i.to_string(),
            LenientString::Float(f) => f.to_string(),
        }),
    )
}

mod us_date {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid date '{s}': {e}")))
    }
}
