use crate::types::field::Field;
use crate::types::variables::{CollectionFrequency, MeasureType, Units};

/// One constraint on a field's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCriterion {
    Frequency(CollectionFrequency),
    MeasureType(MeasureType),
    Units(Units),
}

impl From<CollectionFrequency> for FieldCriterion {
    fn from(value: CollectionFrequency) -> Self {
        FieldCriterion::Frequency(value)
    }
}

impl From<MeasureType> for FieldCriterion {
    fn from(value: MeasureType) -> Self {
        FieldCriterion::MeasureType(value)
    }
}

impl From<Units> for FieldCriterion {
    fn from(value: Units) -> Self {
        FieldCriterion::Units(value)
    }
}

/// Keeps the fields that satisfy `criteria` and returns their `standard_name`s.
///
/// Criteria of the same kind are alternatives: `[Units::Celsius, Units::Fahrenheit]`
/// keeps fields in either unit. Different kinds must all hold. A kind with no
/// criterion does not constrain anything, so empty `criteria` keeps every field.
/// Fields without a `standard_name` are never returned.
///
/// ```
/// use wisconet::{filter_fields, CollectionFrequency, FieldCriterion, MeasureType};
///
/// let criteria: [FieldCriterion; 2] = [
///     CollectionFrequency::Min60.into(),
///     MeasureType::AirTemp.into(),
/// ];
/// assert!(filter_fields(&[], &criteria).is_empty());
/// ```
pub fn filter_fields(fields: &[Field], criteria: &[FieldCriterion]) -> Vec<String> {
    let mut frequencies = Vec::new();
    let mut measure_types = Vec::new();
    let mut units = Vec::new();
    for criterion in criteria {
        match criterion {
            FieldCriterion::Frequency(f) => frequencies.push(f.as_str()),
            FieldCriterion::MeasureType(m) => measure_types.push(m.as_str()),
            FieldCriterion::Units(u) => units.push(u.as_str()),
        }
    }

    let admits = |allowed: &[&str], actual: Option<&str>| {
        allowed.is_empty() || actual.is_some_and(|value| allowed.contains(&value))
    };

    fields
        .iter()
        .filter(|f| admits(&frequencies, f.collection_frequency.as_deref()))
        .filter(|f| admits(&measure_types, f.measure_type.as_deref()))
        .filter(|f| admits(&units, f.final_units.as_deref()))
        .filter_map(|f| f.standard_name.clone())
        .collect()
}
