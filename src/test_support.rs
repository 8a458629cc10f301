//! In-memory transport and fixtures shared by the unit tests.

use crate::transport::{Transport, TransportError};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const AIR_TEMP: &str = "60min_air_temp_f_avg";
pub(crate) const HUMIDITY: &str = "60min_relative_humidity_pct_avg";

type DelayFn = Box<dyn Fn(i64) -> Duration + Send + Sync>;

/// Serves fixed JSON for metadata routes and synthesizes hourly measures for any
/// `/stations/{id}/measures` call, recording how the calls overlapped.
pub(crate) struct MockTransport {
    routes: HashMap<String, Value>,
    step_secs: i64,
    delay: DelayFn,
    fail_on_start: Option<i64>,
    orphan_field: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: Mutex<Vec<i64>>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: HashMap::new(),
            step_secs: 3_600,
            delay: Box::new(|_| Duration::from_millis(1)),
            fail_on_start: None,
            orphan_field: false,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_route(mut self, route: &str, body: Value) -> Self {
        self.routes.insert(route.to_string(), body);
        self
    }

    pub(crate) fn with_step(mut self, step_secs: i64) -> Self {
        self.step_secs = step_secs;
        self
    }

    /// Sleep applied to a measures call, keyed by its `start_time`.
    pub(crate) fn with_delay(mut self, delay: impl Fn(i64) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub(crate) fn failing_on(mut self, start_epoch: i64) -> Self {
        self.fail_on_start = Some(start_epoch);
        self
    }

    /// Adds a measure whose field id is missing from the field list.
    pub(crate) fn with_orphan_field(mut self) -> Self {
        self.orphan_field = true;
        self
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// `start_time` of every finished measures call, in completion order.
    pub(crate) fn completion_order(&self) -> Vec<i64> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn measure_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|(route, _)| route.ends_with("/measures"))
            .count()
    }
}

fn param(params: &[(&'static str, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.clone())
}

impl Transport for MockTransport {
    async fn get_json(
        &self,
        route: &str,
        params: &[(&'static str, String)],
        _timeout: Duration,
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push((
            route.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));

        if let Some(body) = self.routes.get(route) {
            return Ok(body.clone());
        }
        if !route.ends_with("/measures") {
            return Err(TransportError::HttpStatus {
                url: route.to_string(),
                status: StatusCode::NOT_FOUND,
            });
        }

        let start: i64 = param(params, "start_time").unwrap().parse().unwrap();
        let end: i64 = param(params, "end_time").unwrap().parse().unwrap();
        let fields = param(params, "fields");

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep((self.delay)(start)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(start);

        if self.fail_on_start == Some(start) {
            return Err(TransportError::HttpStatus {
                url: route.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }

        let mut body = synthetic_measures(start, end, self.step_secs, fields.as_deref());
        if self.orphan_field {
            if let Some(first) = body["data"].get_mut(0) {
                first["measures"]
                    .as_array_mut()
                    .unwrap()
                    .push(json!([999, 1.0]));
            }
        }
        Ok(body)
    }
}

pub(crate) fn field_json(id: i64, standard_name: &str, measure_type: &str, units: &str) -> Value {
    json!({
        "id": id,
        "collection_frequency": "60min",
        "conversion_type": null,
        "data_type": "float",
        "final_units": units,
        "measure_type": measure_type,
        "qualifier": "avg",
        "sensor": "HMP155",
        "source_field": standard_name,
        "source_units": units,
        "standard_name": standard_name,
        "units_abbrev": null,
        "use_for": "public"
    })
}

pub(crate) fn catalog_json() -> Value {
    json!([
        field_json(1, AIR_TEMP, "Air Temp", "fahrenheit"),
        field_json(2, HUMIDITY, "Relative Humidity", "pct"),
    ])
}

/// One entry every `step_secs` in `[start, end)`, each carrying every requested field.
pub(crate) fn synthetic_measures(start: i64, end: i64, step_secs: i64, fields: Option<&str>) -> Value {
    let wanted: Option<Vec<&str>> = fields.map(|csv| csv.split(',').collect());
    let fieldlist: Vec<Value> = catalog_json()
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| {
            wanted
                .as_ref()
                .map_or(true, |names| names.contains(&f["standard_name"].as_str().unwrap()))
        })
        .cloned()
        .collect();
    let ids: Vec<i64> = fieldlist.iter().map(|f| f["id"].as_i64().unwrap()).collect();

    let mut data = Vec::new();
    let mut t = start;
    while t < end {
        let measures: Vec<Value> = ids
            .iter()
            .map(|id| json!([id, ((t / 3_600) % 50) as f64 + *id as f64 / 10.0]))
            .collect();
        data.push(json!({"collection_time": t, "measures": measures}));
        t += step_secs;
    }
    json!({"fieldlist": fieldlist, "data": data})
}

pub(crate) fn stations_json() -> Value {
    json!([
        {
            "id": 1,
            "station_id": "ALTN",
            "station_name": "Arlington",
            "station_slug": "arlington",
            "latitude": "43.3015",
            "longitude": "-89.3457",
            "elevation": 315,
            "station_timezone": "America/Chicago",
            "earliest_api_date": "01/01/2025",
            "state": "WI"
        },
        {
            "id": 2,
            "station_id": "MAPL",
            "station_name": "Maple",
            "station_slug": "maple",
            "latitude": 46.59,
            "longitude": -91.70,
            "elevation": "330.5",
            "station_timezone": "America/Chicago",
            "earliest_api_date": "06/15/2024",
            "state": "WI"
        },
        {
            "id": 3,
            "station_id": "HNCK",
            "station_name": "Hancock",
            "station_slug": "hancock",
            "latitude": 44.1190,
            "longitude": -89.5354,
            "elevation": 328,
            "station_timezone": "America/Chicago",
            "earliest_api_date": "04/01/2023",
            "state": "WI"
        },
        {
            "id": 99,
            "station_id": "WNTEST1",
            "station_name": "Test station",
            "station_slug": "test-station",
            "latitude": 43.0,
            "longitude": -89.0,
            "elevation": 0,
            "station_timezone": "America/Chicago",
            "earliest_api_date": "01/01/2020"
        }
    ])
}
