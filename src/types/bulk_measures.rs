//! Wire types for `GET /stations/{station_id}/measures`.

use crate::types::field::Field;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single observed value. The API mixes numbers, strings and nulls in one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Number(f64),
    Text(String),
    Null,
}

impl MeasureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MeasureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MeasureValue::Null)
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Number(n) => write!(f, "{n}"),
            MeasureValue::Text(s) => write!(f, "{s}"),
            MeasureValue::Null => write!(f, "null"),
        }
    }
}

/// One `[field_id, value]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, MeasureValue)", into = "(i64, MeasureValue)")]
pub struct Measure {
    pub field_id: i64,
    pub value: MeasureValue,
}

impl From<(i64, MeasureValue)> for Measure {
    fn from((field_id, value): (i64, MeasureValue)) -> Self {
        Self { field_id, value }
    }
}

impl From<Measure> for (i64, MeasureValue) {
    fn from(measure: Measure) -> Self {
        (measure.field_id, measure.value)
    }
}

/// All values observed at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataByTime {
    /// Seconds since the Unix epoch, UTC.
    pub collection_time: i64,
    pub measures: Vec<Measure>,
}

impl DataByTime {
    /// `collection_time` as a UTC instant, or `None` when it is out of range.
    pub fn collection_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.collection_time, 0)
    }
}

/// The payload of one bulk request: a field catalog plus the rows that refer to it.
///
/// Every `field_id` in `data` is expected to resolve against `fieldlist`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BulkMeasures {
    pub fieldlist: Vec<Field>,
    pub data: Vec<DataByTime>,
}

impl BulkMeasures {
    /// Number of `(instant, field)` pairs, i.e. rows after unpivoting.
    pub fn measure_count(&self) -> usize {
        self.data.iter().map(|entry| entry.measures.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.measure_count() == 0
    }

    pub fn field_lookup(&self) -> HashMap<i64, &Field> {
        self.fieldlist.iter().map(|field| (field.id, field)).collect()
    }
}
