use crate::types::station::Station;
use crate::LatLon;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Proximity queries over a loaded station directory.
///
/// The directory is a few hundred stations, so every query is a linear scan that
/// keeps the best `n` candidates in a max-heap keyed on distance.
#[derive(Debug, Clone, Copy)]
pub struct StationLocator<'a> {
    stations: &'a [Station],
}

// Heap entry, ordered by distance only
struct StationCandidate<'a> {
    distance_m: OrderedFloat<f64>,
    station: &'a Station,
}
impl PartialEq for StationCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.distance_m == other.distance_m
    }
}
impl Eq for StationCandidate<'_> {}
impl PartialOrd for StationCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for StationCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_m.cmp(&other.distance_m)
    }
}

impl<'a> StationLocator<'a> {
    pub fn new(stations: &'a [Station]) -> Self {
        Self { stations }
    }

    /// Up to `n_results` stations closest to `location`, nearest first, with their
    /// great-circle distance in meters. Stations farther than `max_distance_m`
    /// are left out when a bound is given.
    pub fn query(
        &self,
        location: LatLon,
        n_results: usize,
        max_distance_m: Option<f64>,
    ) -> Vec<(&'a Station, f64)> {
        if n_results == 0 {
            return vec![];
        }
        let mut heap: BinaryHeap<StationCandidate<'a>> = BinaryHeap::with_capacity(n_results + 1);

        for station in self.stations {
            let distance_m = station.distance_to(location);
            if max_distance_m.is_some_and(|max| distance_m > max) {
                continue;
            }
            heap.push(StationCandidate {
                distance_m: OrderedFloat(distance_m),
                station,
            });
            if heap.len() > n_results {
                // Drop the farthest
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.station, c.distance_m.into_inner()))
            .collect()
    }

    pub fn nearest(&self, location: LatLon) -> Option<(&'a Station, f64)> {
        self.query(location, 1, None).into_iter().next()
    }
}
