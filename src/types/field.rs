use serde::{Deserialize, Serialize};

/// One measurable quantity a station reports, as listed by
/// `GET /fields/{station_id}/available_fields` and in every bulk response.
///
/// `id` is the key measurement rows use to refer to the field; `standard_name`
/// is the stable human-facing key used when requesting a subset of fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Field {
    pub id: i64,
    pub collection_frequency: Option<String>,
    pub conversion_type: Option<String>,
    pub data_type: Option<String>,
    pub final_units: Option<String>,
    pub measure_type: Option<String>,
    pub qualifier: Option<String>,
    pub sensor: Option<String>,
    pub source_field: Option<String>,
    pub source_units: Option<String>,
    pub standard_name: Option<String>,
    pub units_abbrev: Option<String>,
    pub use_for: Option<String>,
}

impl Field {
    /// Names of the metadata attributes, in the order they appear as table columns.
    pub const ATTRIBUTE_NAMES: [&'static str; 12] = [
        "collection_frequency",
        "conversion_type",
        "data_type",
        "final_units",
        "measure_type",
        "qualifier",
        "sensor",
        "source_field",
        "source_units",
        "standard_name",
        "units_abbrev",
        "use_for",
    ];

    /// The string attributes in [`Field::ATTRIBUTE_NAMES`] order.
    pub fn attributes(&self) -> [Option<&str>; 12] {
        [
            self.collection_frequency.as_deref(),
            self.conversion_type.as_deref(),
            self.data_type.as_deref(),
            self.final_units.as_deref(),
            self.measure_type.as_deref(),
            self.qualifier.as_deref(),
            self.sensor.as_deref(),
            self.source_field.as_deref(),
            self.source_units.as_deref(),
            self.standard_name.as_deref(),
            self.units_abbrev.as_deref(),
            self.use_for.as_deref(),
        ]
    }
}
