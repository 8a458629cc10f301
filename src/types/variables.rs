//! Controlled vocabularies for field metadata.
//!
//! Each enum maps onto the literal strings the API uses in the
//! `collection_frequency`, `measure_type` and `final_units` attributes of a
//! [`crate::Field`]. They are mainly used with [`crate::filter_fields`].

use std::fmt;

/// How often a field is collected or aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionFrequency {
    /// Every 5 minutes.
    Min5,
    /// Hourly.
    Min60,
    /// Daily aggregate.
    Daily,
}

impl CollectionFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionFrequency::Min5 => "5min",
            CollectionFrequency::Min60 => "60min",
            CollectionFrequency::Daily => "daily",
        }
    }
}

/// The general kind of environmental measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureType {
    AirTemp,
    Battery,
    DewPoint,
    LeafWetness,
    Rain,
    RelativeHumidity,
    SoilMoisture,
    SoilTemp,
    WindSpeed,
    CanopyWetness,
    Pressure,
    WindDir,
    SolarRadiation,
    OtherCalculated,
}

impl MeasureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureType::AirTemp => "Air Temp",
            MeasureType::Battery => "Battery",
            MeasureType::DewPoint => "Dew Point",
            MeasureType::LeafWetness => "Leaf Wetness",
            MeasureType::Rain => "Rain",
            MeasureType::RelativeHumidity => "Relative Humidity",
            MeasureType::SoilMoisture => "Soil Moisture",
            MeasureType::SoilTemp => "Soil Temp",
            MeasureType::WindSpeed => "Wind Speed",
            MeasureType::CanopyWetness => "Canopy Wetness",
            MeasureType::Pressure => "Pressure",
            MeasureType::WindDir => "Wind Dir",
            MeasureType::SolarRadiation => "Solar Radiation",
            MeasureType::OtherCalculated => "Other Calculated",
        }
    }
}

/// Units a field's final value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    Celsius,
    Volts,
    Millivolts,
    /// Sunshine hours.
    Hst,
    Millimeters,
    Percent,
    MetersPerSecond,
    Millibars,
    Hours,
    Degrees,
    Seconds,
    Kilojoules,
    Fahrenheit,
    Inches,
    Mph,
    /// Cardinal direction (N, NE, ...).
    Dir,
    WattsPerSquareMeter,
    /// Millibars, abbreviated spelling.
    Mb,
    KilowattHoursPerSquareMeter,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Celsius => "celsius",
            Units::Volts => "volts",
            Units::Millivolts => "mv",
            Units::Hst => "hst",
            Units::Millimeters => "millimeters",
            Units::Percent => "pct",
            Units::MetersPerSecond => "meters/sec",
            Units::Millibars => "millibars",
            Units::Hours => "hours",
            Units::Degrees => "degrees",
            Units::Seconds => "seconds",
            Units::Kilojoules => "kilojoules",
            Units::Fahrenheit => "fahrenheit",
            Units::Inches => "inches",
            Units::Mph => "mph",
            Units::Dir => "Dir",
            Units::WattsPerSquareMeter => "W/m\u{00B2}",
            Units::Mb => "mb",
            Units::KilowattHoursPerSquareMeter => "kWh/m\u{00B2}",
        }
    }
}

impl fmt::Display for CollectionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
