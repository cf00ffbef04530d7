use serde::Serialize;

use crate::data::aggregate::{
    MapPoint, RegionCounts, TopRestaurant, compute_map_points, compute_region_counts,
    compute_top_restaurant_per_state,
};
use crate::data::filter::{Choice, Level, Selection, apply_filter, compute_options};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// ViewModel – everything the dashboard draws for one selection
// ---------------------------------------------------------------------------

/// A row of the filtered restaurants table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub name: String,
    pub address: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub categories: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// The selection the views were computed for.
    pub selection: Selection,
    pub state_options: Vec<Choice>,
    pub city_options: Vec<Choice>,
    pub category_options: Vec<Choice>,
    /// Indices into the dataset of rows matching `selection`.
    #[serde(skip)]
    pub rows: Vec<usize>,
    pub caption: String,
    pub total: usize,
    pub region_counts: RegionCounts,
    pub top_restaurants: Vec<TopRestaurant>,
    pub map_points: Vec<MapPoint>,
}

impl ViewModel {
    /// Table rows for the filtered view.
    pub fn table_rows(&self, dataset: &Dataset) -> Vec<TableRow> {
        self.rows
            .iter()
            .filter_map(|&i| dataset.get(i))
            .map(|r| TableRow {
                name: r.name.clone(),
                address: r.address.clone(),
                postal_code: r.postal_code.clone(),
                categories: r.categories.clone(),
            })
            .collect()
    }
}

/// Recompute every view for `selection`. Nothing is cached between calls.
///
/// The selection is used as given: a concrete choice that matches nothing
/// yields empty views, never a wider one.
pub fn render(dataset: &Dataset, selection: &Selection) -> ViewModel {
    let selection = selection.clone();
    let rows = apply_filter(dataset, &selection);
    let caption = format!(
        "Filtered Restaurants in {}, {}:",
        selection.city.label(Level::City),
        selection.state.label(Level::State)
    );

    let view = ViewModel {
        state_options: compute_options(dataset, Level::State, &selection),
        city_options: compute_options(dataset, Level::City, &selection),
        category_options: compute_options(dataset, Level::Category, &selection),
        caption,
        total: rows.len(),
        region_counts: compute_region_counts(dataset, &selection),
        top_restaurants: compute_top_restaurant_per_state(dataset),
        map_points: compute_map_points(dataset, &selection),
        rows,
        selection,
    };

    log::debug!(
        "Rendered {:?}: {} rows, {} map points",
        view.selection,
        view.total,
        view.map_points.len()
    );
    view
}

// ---------------------------------------------------------------------------
// Headless report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub view: &'a ViewModel,
    pub rows: Vec<TableRow>,
}

impl<'a> Report<'a> {
    pub fn new(view: &'a ViewModel, dataset: &Dataset) -> Self {
        Report {
            view,
            rows: view.table_rows(dataset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::restaurant;

    fn sample() -> Dataset {
        Dataset::from_restaurants(vec![
            restaurant("McDonald's", "Austin", "TX", Some("Fast Food, Burgers")),
            restaurant("Subway", "Dallas", "TX", Some("Sandwich Shop")),
            restaurant("Taco Bell", "Fresno", "CA", None),
        ])
    }

    fn only(v: &str) -> Choice {
        Choice::Only(v.to_string())
    }

    #[test]
    fn test_render_default_selection() {
        let ds = sample();
        let view = render(&ds, &Selection::default());
        assert_eq!(view.total, 3);
        assert_eq!(view.caption, "Filtered Restaurants in All Cities, All States:");
        assert_eq!(view.state_options.len(), 3);
        assert_eq!(view.region_counts.x_label, "State");
        assert_eq!(view.top_restaurants.len(), 2);
        assert_eq!(view.map_points.len(), 3);
    }

    #[test]
    fn test_render_category_matches_by_containment() {
        let ds = Dataset::from_restaurants(vec![
            restaurant("Pizza Hut", "Austin", "TX", Some("Pizza Place, Fast Food")),
            restaurant("Taco Bell", "Austin", "TX", None),
            restaurant("Subway", "Austin", "TX", Some("Sandwich Shop")),
        ]);
        let view = render(&ds, &Selection { category: only("Pizza"), ..Default::default() });
        assert_eq!(view.selection.category, only("Pizza"));
        assert_eq!(view.rows, vec![0]);
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_render_keeps_unmatched_city() {
        let ds = sample();
        let sel = Selection { state: only("CA"), city: only("Austin"), ..Default::default() };
        let view = render(&ds, &sel);
        assert_eq!(view.selection.city, only("Austin"));
        assert!(view.rows.is_empty());
        assert_eq!(view.caption, "Filtered Restaurants in Austin, CA:");
    }

    #[test]
    fn test_render_top_restaurants_ignore_selection() {
        let ds = sample();
        let all = render(&ds, &Selection::default());
        let tx = render(&ds, &Selection { state: only("TX"), ..Default::default() });
        assert_eq!(all.top_restaurants, tx.top_restaurants);
    }

    #[test]
    fn test_render_empty_view() {
        let ds = sample();
        let view = render(&ds, &Selection { state: only("ZZ"), ..Default::default() });
        assert_eq!(view.total, 0);
        assert!(view.region_counts.pairs.is_empty());
        assert!(view.map_points.is_empty());
        assert_eq!(view.city_options, vec![Choice::All]);
    }

    #[test]
    fn test_report_serializes_rows() {
        let ds = sample();
        let view = render(&ds, &Selection { category: only("Burgers"), ..Default::default() });
        let json = serde_json::to_value(Report::new(&view, &ds)).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["rows"][0]["name"], "McDonald's");
        assert_eq!(json["rows"][0]["postalCode"], "00000");
        assert_eq!(json["selection"]["state"], serde_json::Value::Null);
        assert_eq!(json["selection"]["category"], "Burgers");
    }
}
