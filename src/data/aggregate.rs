use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::{Selection, state_indices};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Region counts (bar chart input)
// ---------------------------------------------------------------------------

/// Restaurant counts per region, with the labels the chart is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCounts {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// `(region, count)` in ascending region order.
    pub pairs: Vec<(String, usize)>,
}

impl RegionCounts {
    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.pairs.iter().map(|(_, n)| n).sum()
    }

    /// Pairs ordered by count, largest first. Equal counts keep region order.
    pub fn sorted_desc(&self) -> Vec<(String, usize)> {
        let mut pairs = self.pairs.clone();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }
}

/// Count rows per state, or per city within the selected state.
///
/// Only the state choice matters here; city and category are ignored.
pub fn compute_region_counts(dataset: &Dataset, selection: &Selection) -> RegionCounts {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    let (title, x_label) = match selection.state.value() {
        None => {
            for r in &dataset.restaurants {
                *counts.entry(r.province.as_str()).or_default() += 1;
            }
            ("Number of Restaurants by State".to_string(), "State")
        }
        Some(state) => {
            for i in state_indices(dataset, selection) {
                *counts.entry(dataset.restaurants[i].city.as_str()).or_default() += 1;
            }
            (format!("Number of Restaurants in {state}"), "City")
        }
    };

    RegionCounts {
        title,
        x_label,
        y_label: "Number of Restaurants",
        pairs: counts.into_iter().map(|(k, n)| (k.to_string(), n)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Most common restaurant per state
// ---------------------------------------------------------------------------

/// The restaurant name with the most locations in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRestaurant {
    pub state: String,
    pub name: String,
    pub count: usize,
}

/// One entry per state with at least one row, sorted by state.
///
/// Always computed over the whole dataset. When several names share the
/// maximum count the alphabetically first name wins.
pub fn compute_top_restaurant_per_state(dataset: &Dataset) -> Vec<TopRestaurant> {
    let mut group_sizes: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in &dataset.restaurants {
        *group_sizes
            .entry((r.province.as_str(), r.name.as_str()))
            .or_default() += 1;
    }

    // Keys iterate in (state, name) order, so the first maximum seen per
    // state is the alphabetically first one.
    let mut best: BTreeMap<&str, (&str, usize)> = BTreeMap::new();
    for ((state, name), count) in group_sizes {
        match best.get(state) {
            Some(&(_, top)) if top >= count => {}
            _ => {
                best.insert(state, (name, count));
            }
        }
    }

    best.into_iter()
        .map(|(state, (name, count))| TopRestaurant {
            state: state.to_string(),
            name: name.to_string(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Map points
// ---------------------------------------------------------------------------

/// A plottable location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub address: String,
}

/// Locations in the selected state (or everywhere), skipping rows without
/// usable coordinates. City and category are ignored.
pub fn compute_map_points(dataset: &Dataset, selection: &Selection) -> Vec<MapPoint> {
    state_indices(dataset, selection)
        .into_iter()
        .filter_map(|i| {
            let r = &dataset.restaurants[i];
            let (lat, lon) = r.coordinates()?;
            Some(MapPoint {
                lat,
                lon,
                name: r.name.clone(),
                address: r.address.clone(),
            })
        })
        .collect()
}
