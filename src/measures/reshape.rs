//! Unpivots bulk measure payloads into one flat row per `(instant, field)`.

use crate::measures::error::MeasuresError;
use crate::types::bulk_measures::{BulkMeasures, MeasureValue};
use crate::types::field::Field;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use polars::prelude::*;

/// One observed value joined with the metadata of the field it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRow {
    pub collection_time: DateTime<Tz>,
    pub value: MeasureValue,
    pub station_id: Option<String>,
    pub field: Field,
}

impl MeasureRow {
    pub fn standard_name(&self) -> Option<&str> {
        self.field.standard_name.as_deref()
    }
}

/// Rows in the order they were produced: payload order, then instant order, then
/// measure order. `collection_time` is the access path but is not unique.
///
/// A table is never empty when handed out by [`to_table`]; "no data" is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureTable {
    rows: Vec<MeasureRow>,
}

impl MeasureTable {
    // Callers guarantee `rows` is non-empty
    pub(crate) fn from_rows(rows: Vec<MeasureRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MeasureRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MeasureRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasureRow> {
        self.rows.iter()
    }

    /// Appends tables in order. Returns `None` when nothing has rows.
    pub fn concat(tables: impl IntoIterator<Item = MeasureTable>) -> Option<MeasureTable> {
        let rows: Vec<MeasureRow> = tables.into_iter().flat_map(|t| t.rows).collect();
        (!rows.is_empty()).then(|| MeasureTable { rows })
    }

    /// Earliest and latest `collection_time`.
    pub fn time_range(&self) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        let min = self.rows.iter().map(|r| r.collection_time).min()?;
        let max = self.rows.iter().map(|r| r.collection_time).max()?;
        Some((min, max))
    }

    /// All rows observed at `instant`, whatever zone either side is expressed in.
    pub fn rows_at(&self, instant: DateTime<Utc>) -> impl Iterator<Item = &MeasureRow> {
        self.rows
            .iter()
            .filter(move |row| row.collection_time.with_timezone(&Utc) == instant)
    }

    /// Builds a polars frame with one column per row attribute.
    ///
    /// `collection_time` is a millisecond `Datetime` column in the rows' zone (UTC
    /// if the rows mix zones). Numbers land in `value`, strings in `value_text`.
    /// `station_id` is only present when at least one row carries one.
    pub fn to_dataframe(&self) -> Result<DataFrame, MeasuresError> {
        let zone = self.common_zone().unwrap_or(Tz::UTC);

        let millis: Vec<i64> = self
            .rows
            .iter()
            .map(|r| r.collection_time.timestamp_millis())
            .collect();
        let times = Int64Chunked::from_vec("collection_time".into(), millis)
            .into_datetime(TimeUnit::Milliseconds, Some(zone.name().into()))
            .into_series();

        let mut columns: Vec<Column> = vec![
            times.into(),
            Column::new(
                "value".into(),
                self.rows.iter().map(|r| r.value.as_f64()).collect::<Vec<_>>(),
            ),
            Column::new(
                "value_text".into(),
                self.rows
                    .iter()
                    .map(|r| r.value.as_text().map(str::to_string))
                    .collect::<Vec<_>>(),
            ),
        ];
        if self.rows.iter().any(|r| r.station_id.is_some()) {
            columns.push(Column::new(
                "station_id".into(),
                self.rows
                    .iter()
                    .map(|r| r.station_id.clone())
                    .collect::<Vec<_>>(),
            ));
        }
        columns.push(Column::new(
            "field_id".into(),
            self.rows.iter().map(|r| r.field.id).collect::<Vec<_>>(),
        ));
        for (i, name) in Field::ATTRIBUTE_NAMES.iter().enumerate() {
            let values: Vec<Option<String>> = self
                .rows
                .iter()
                .map(|r| r.field.attributes()[i].map(str::to_string))
                .collect();
            columns.push(Column::new((*name).into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }

    pub fn lazy(&self) -> Result<LazyFrame, MeasuresError> {
        Ok(self.to_dataframe()?.lazy())
    }

    fn common_zone(&self) -> Option<Tz> {
        let first = self.rows.first()?.collection_time.timezone();
        self.rows
            .iter()
            .all(|r| r.collection_time.timezone() == first)
            .then_some(first)
    }
}

impl<'a> IntoIterator for &'a MeasureTable {
    type Item = &'a MeasureRow;
    type IntoIter = std::slice::Iter<'a, MeasureRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Unpivots payloads into a single table, in input order and without deduplication.
///
/// Each payload's measures are joined against that payload's own field list.
/// Collection times are read as UTC and shown in `target_tz` (UTC when `None`);
/// the instant never changes. When `station_id` is given every row carries it.
///
/// Returns `Ok(None)` when the payloads hold no measures at all.
///
/// # Errors
///
/// [`MeasuresError::UnknownField`] when a measure refers to a field id missing
/// from its payload's field list, and [`MeasuresError::InvalidTimestamp`] for a
/// collection time chrono cannot represent.
pub fn to_table<'a>(
    payloads: impl IntoIterator<Item = &'a BulkMeasures>,
    target_tz: Option<Tz>,
    station_id: Option<&str>,
) -> Result<Option<MeasureTable>, MeasuresError> {
    let tz = target_tz.unwrap_or(Tz::UTC);
    let mut rows = Vec::new();

    for payload in payloads {
        let lookup = payload.field_lookup();
        rows.reserve(payload.measure_count());
        for entry in &payload.data {
            if entry.measures.is_empty() {
                continue;
            }
            let collection_time = entry
                .collection_time_utc()
                .ok_or(MeasuresError::InvalidTimestamp(entry.collection_time))?
                .with_timezone(&tz);
            for measure in &entry.measures {
                let field = lookup
                    .get(&measure.field_id)
                    .ok_or(MeasuresError::UnknownField {
                        field_id: measure.field_id,
                        collection_time: entry.collection_time,
                    })?;
                rows.push(MeasureRow {
                    collection_time,
                    value: measure.value.clone(),
                    station_id: station_id.map(str::to_string),
                    field: (*field).clone(),
                });
            }
        }
    }

    Ok((!rows.is_empty()).then(|| MeasureTable::from_rows(rows)))
}

/// [`to_table`] for a single payload.
pub fn bulk_measures_to_table(
    payload: &BulkMeasures,
    target_tz: Option<Tz>,
    station_id: Option<&str>,
) -> Result<Option<MeasureTable>, MeasuresError> {
    to_table(std::iter::once(payload), target_tz, station_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{synthetic_measures, AIR_TEMP, HUMIDITY};
    use crate::types::bulk_measures::{DataByTime, Measure};
    use chrono::{TimeDelta, TimeZone};
    use chrono_tz::America::Chicago;

    const JAN_FIRST: i64 = 1_735_689_600;

    fn payload(start: i64, hours: i64) -> BulkMeasures {
        serde_json::from_value(synthetic_measures(start, start + hours * 3_600, 3_600, None)).unwrap()
    }

    #[test]
    fn test_unpivot_emits_one_row_per_measure() -> Result<(), MeasuresError> {
        let bulk = payload(JAN_FIRST, 5);
        let table = bulk_measures_to_table(&bulk, None, Some("ALTN"))?.unwrap();

        // 5 instants x 2 fields
        assert_eq!(table.len(), 10);
        for row in &table {
            assert_eq!(row.station_id.as_deref(), Some("ALTN"));
            let expected_name = if row.field.id == 1 { AIR_TEMP } else { HUMIDITY };
            assert_eq!(row.standard_name(), Some(expected_name));
        }
        let first = &table.rows()[0];
        assert_eq!(first.collection_time.timestamp(), JAN_FIRST);
        assert_eq!(first.field.final_units.as_deref(), Some("fahrenheit"));
        assert_eq!(table.rows_at(Utc.timestamp_opt(JAN_FIRST, 0).unwrap()).count(), 2);
        Ok(())
    }

    #[test]
    fn test_unknown_field_id_is_fatal() {
        let mut bulk = payload(JAN_FIRST, 3);
        bulk.data[1].measures.push(Measure {
            field_id: 42,
            value: MeasureValue::Number(1.0),
        });

        let err = bulk_measures_to_table(&bulk, None, None).unwrap_err();
        match err {
            MeasuresError::UnknownField {
                field_id,
                collection_time,
            } => {
                assert_eq!(field_id, 42);
                assert_eq!(collection_time, JAN_FIRST + 3_600);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_no_measures_is_none_not_error() -> Result<(), MeasuresError> {
        let empty = BulkMeasures::default();
        assert!(bulk_measures_to_table(&empty, Some(Chicago), Some("ALTN"))?.is_none());

        let hollow = BulkMeasures {
            fieldlist: payload(JAN_FIRST, 1).fieldlist,
            data: vec![DataByTime {
                collection_time: JAN_FIRST,
                measures: Vec::new(),
            }],
        };
        assert!(to_table([&empty, &hollow], None, None)?.is_none());
        assert!(to_table(Vec::<&BulkMeasures>::new(), None, None)?.is_none());
        Ok(())
    }

    #[test]
    fn test_timezone_conversion_keeps_the_instant() -> Result<(), MeasuresError> {
        let january = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap().timestamp();
        let july = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap().timestamp();

        for (epoch, local_hour) in [(january, 6), (july, 7)] {
            let table = bulk_measures_to_table(&payload(epoch, 1), Some(Chicago), None)?.unwrap();
            let shown = table.rows()[0].collection_time;
            assert_eq!(shown.timezone(), Chicago);
            assert_eq!(chrono::Timelike::hour(&shown), local_hour);
            assert_eq!(shown.timestamp(), epoch);
            assert_eq!(shown.with_timezone(&Utc).timestamp(), epoch);
        }
        Ok(())
    }

    #[test]
    fn test_repeated_local_hour_keeps_distinct_instants() -> Result<(), MeasuresError> {
        use chrono::{Offset, Timelike};

        // Chicago falls back at 07:00 UTC on 2025-11-02; both instants read 01:30 locally
        let first = Utc.with_ymd_and_hms(2025, 11, 2, 6, 30, 0).unwrap().timestamp();
        let table = bulk_measures_to_table(&payload(first, 2), Some(Chicago), None)?.unwrap();

        let times: Vec<DateTime<Tz>> = table.iter().map(|r| r.collection_time).collect();
        let (daylight, standard) = (times[0], times[2]);
        assert_eq!((daylight.hour(), daylight.minute()), (1, 30));
        assert_eq!((standard.hour(), standard.minute()), (1, 30));
        assert_eq!(daylight.naive_local(), standard.naive_local());

        assert_eq!(daylight.timestamp(), first);
        assert_eq!(standard.timestamp(), first + 3_600);
        assert_eq!(daylight.offset().fix().local_minus_utc(), -5 * 3_600);
        assert_eq!(standard.offset().fix().local_minus_utc(), -6 * 3_600);
        Ok(())
    }

    #[test]
    fn test_concatenation_keeps_order_and_duplicates() -> Result<(), MeasuresError> {
        let first = payload(JAN_FIRST, 2);
        let second = payload(JAN_FIRST + 2 * 3_600, 2);
        let overlapping = payload(JAN_FIRST + 3 * 3_600, 1);

        let table = to_table([&first, &second, &overlapping], None, None)?.unwrap();
        assert_eq!(table.len(), (2 + 2 + 1) * 2);

        let times: Vec<i64> = table.iter().map(|r| r.collection_time.timestamp()).collect();
        assert!(times[..8].windows(2).all(|w| w[0] <= w[1]));
        let last_hour = JAN_FIRST + 3 * 3_600;
        assert_eq!(table.rows_at(Utc.timestamp_opt(last_hour, 0).unwrap()).count(), 4);

        let (min, max) = table.time_range().unwrap();
        assert_eq!(max - min, TimeDelta::hours(3));
        Ok(())
    }

    #[test]
    fn test_concat_of_tables() -> Result<(), MeasuresError> {
        let a = bulk_measures_to_table(&payload(JAN_FIRST, 1), None, Some("ALTN"))?.unwrap();
        let b = bulk_measures_to_table(&payload(JAN_FIRST, 1), None, Some("MAPL"))?.unwrap();
        let both = MeasureTable::concat([a, b]).unwrap();
        assert_eq!(both.len(), 4);
        assert_eq!(both.rows()[3].station_id.as_deref(), Some("MAPL"));
        assert!(MeasureTable::concat(Vec::new()).is_none());
        Ok(())
    }

    #[test]
    fn test_dataframe_columns() -> Result<(), MeasuresError> {
        let mut bulk = payload(JAN_FIRST, 3);
        bulk.data[0].measures[1].value = MeasureValue::Text("NW".into());
        bulk.data[2].measures[0].value = MeasureValue::Null;
        let table = bulk_measures_to_table(&bulk, Some(Chicago), Some("ALTN"))?.unwrap();

        let df = table.to_dataframe()?;
        assert_eq!(df.height(), 6);
        assert_eq!(df.width(), 5 + Field::ATTRIBUTE_NAMES.len());
        assert!(matches!(
            df.column("collection_time")?.dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, Some(_))
        ));

        let values = df.column("value")?.f64()?;
        assert_eq!(values.null_count(), 2);
        assert_eq!(df.column("value_text")?.str()?.get(1), Some("NW"));
        assert_eq!(df.column("station_id")?.str()?.get(5), Some("ALTN"));
        assert_eq!(df.column("standard_name")?.str()?.get(0), Some(AIR_TEMP));

        let unlabelled = bulk_measures_to_table(&bulk, None, None)?.unwrap().to_dataframe()?;
        assert!(unlabelled.column("station_id").is_err());
        Ok(())
    }
}
