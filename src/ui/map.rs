use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui::Ui;
use egui_plot::{Plot, PlotBounds, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::MapPoint;

/// Zoom used when every state is shown.
const COUNTRY_ZOOM: i32 = 5;
/// Zoom used when a single state is selected.
const STATE_ZOOM: i32 = 8;

// ---------------------------------------------------------------------------
// Map view policy
// ---------------------------------------------------------------------------

/// Where the map is centred and how much of it is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: i32,
}

impl MapView {
    /// Centre on the mean position of `points`; `None` when there are none.
    pub fn for_points(points: &[MapPoint], state_selected: bool) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(MapView {
            lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
            lon: points.iter().map(|p| p.lon).sum::<f64>() / n,
            zoom: if state_selected { STATE_ZOOM } else { COUNTRY_ZOOM },
        })
    }

    /// Visible longitude span in degrees: a web-map zoom level `z` shows
    /// 360 / 2^z degrees of longitude.
    pub fn span(&self) -> f64 {
        360.0 / f64::from(1 << self.zoom)
    }

    pub fn bounds(&self) -> PlotBounds {
        let half_lon = self.span() / 2.0;
        let half_lat = half_lon / 2.0;
        PlotBounds::from_min_max(
            [self.lon - half_lon, self.lat - half_lat],
            [self.lon + half_lon, self.lat + half_lat],
        )
    }
}

/// The point closest to `(lon, lat)`, if any.
fn nearest(points: &[MapPoint], lon: f64, lat: f64) -> Option<&MapPoint> {
    points.iter().min_by(|a, b| {
        let da = (a.lon - lon).powi(2) + (a.lat - lat).powi(2);
        let db = (b.lon - lon).powi(2) + (b.lat - lat).powi(2);
        da.total_cmp(&db)
    })
}

// ---------------------------------------------------------------------------
// Point map (central panel)
// ---------------------------------------------------------------------------

/// Scatter restaurants in lon/lat space with a name/address hover label.
/// The hover label shares `points` with the caller.
pub fn restaurant_map(
    ui: &mut Ui,
    points: &Arc<[MapPoint]>,
    colors: &ColorMap,
    state_selected: bool,
    reset: bool,
) {
    ui.heading("Interactive Map of Restaurants");
    ui.label(format!("{} locations, {} restaurants", points.len(), colors.len()));

    let view = MapView::for_points(points, state_selected);

    let mut by_name: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points.iter() {
        by_name.entry(p.name.as_str()).or_default().push([p.lon, p.lat]);
    }

    let hover_points = Arc::clone(points);

    Plot::new("restaurant_map")
        .height(480.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| {
            // Empty series name: the pointer is not over a marker.
            if name.is_empty() {
                return String::new();
            }
            match nearest(&hover_points, value.x, value.y) {
                Some(p) => format!("Restaurant Name: {}\nAddress: {}", p.name, p.address),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            if let (true, Some(view)) = (reset, view) {
                plot_ui.set_plot_bounds(view.bounds());
            }
            for (name, positions) in by_name {
                let series = Points::new(PlotPoints::new(positions))
                    .name(name)
                    .radius(3.0)
                    .color(colors.color_for(name));
                plot_ui.points(series);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> MapPoint {
        MapPoint { lat, lon, name: "Subway".into(), address: "1 Main".into() }
    }

    #[test]
    fn test_view_centres_on_mean() {
        let view = MapView::for_points(&[point(30.0, -100.0), point(40.0, -90.0)], false).unwrap();
        assert_eq!((view.lat, view.lon), (35.0, -95.0));
        assert_eq!(view.zoom, COUNTRY_ZOOM);
    }

    #[test]
    fn test_state_selection_zooms_closer() {
        let country = MapView::for_points(&[point(30.0, -100.0)], false).unwrap();
        let state = MapView::for_points(&[point(30.0, -100.0)], true).unwrap();
        assert!(state.span() < country.span());
        assert_eq!(state.span(), 360.0 / 256.0);
    }

    #[test]
    fn test_no_points_no_view() {
        assert!(MapView::for_points(&[], true).is_none());
    }

    #[test]
    fn test_nearest_point() {
        let pts = [point(30.0, -100.0), point(40.0, -90.0)];
        assert_eq!(nearest(&pts, -91.0, 39.0).unwrap().lat, 40.0);
        assert!(nearest(&[], 0.0, 0.0).is_none());
    }
}
