use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::color::ColorMap;
use crate::data::aggregate::{MapPoint, TopRestaurant};
use crate::data::filter::{Choice, Level, Selection, reset_below};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::view::{ViewModel, render};

// ---------------------------------------------------------------------------
// Top-restaurants table ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopColumn {
    State,
    Name,
    Count,
}

/// Consumer-side ordering of the top-restaurants table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopSort {
    pub column: TopColumn,
    pub descending: bool,
}

impl Default for TopSort {
    fn default() -> Self {
        Self {
            column: TopColumn::Count,
            descending: true,
        }
    }
}

impl TopSort {
    /// Clicking the active column flips direction; another column starts ascending.
    pub fn toggle(&mut self, column: TopColumn) {
        if self.column == column {
            self.descending = !self.descending;
        } else {
            self.column = column;
            self.descending = false;
        }
    }

    /// Stable sort, so equal keys keep state order.
    pub fn apply(&self, rows: &mut [TopRestaurant]) {
        rows.sort_by(|a, b| {
            let ord = match self.column {
                TopColumn::State => a.state.cmp(&b.state),
                TopColumn::Name => a.name.cmp(&b.name),
                TopColumn::Count => a.count.cmp(&b.count),
            };
            if self.descending { ord.reverse() } else { ord }
        });
    }

    pub fn arrow(&self, column: TopColumn) -> &'static str {
        match (self.column == column, self.descending) {
            (false, _) => "",
            (true, true) => " ⬇",
            (true, false) => " ⬆",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None if loading failed).
    pub dataset: Option<Dataset>,

    /// Current dropdown selection.
    pub selection: Selection,

    /// Views for the current selection, rebuilt on every change.
    pub view: Option<ViewModel>,

    /// Top-restaurants rows in display order.
    pub top_sorted: Vec<TopRestaurant>,
    pub top_sort: TopSort,

    /// Map points of the current view, shared with the hover label.
    pub map_points: Arc<[MapPoint]>,

    /// Colours for the map points.
    pub color_map: ColorMap,

    /// Set when the map should re-centre on the next frame.
    pub map_reset_pending: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.selection = Selection::default();
        self.status_message = None;
        self.refresh();
        self.map_reset_pending = true;
    }

    /// Load `path`, replacing the current dataset. A failure is logged and
    /// shown with its full cause chain.
    pub fn load(&mut self, path: &Path) {
        match load_file(path).with_context(|| format!("loading {}", path.display())) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("{e:#}");
                self.set_load_error(format!("{e:#}"));
            }
        }
    }

    /// Show a fatal load error; nothing else is computed.
    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.view = None;
        self.top_sorted.clear();
        self.map_points = Arc::from([]);
        self.status_message = Some(message);
    }

    /// Change one dropdown and recompute every view. Levels below `level`
    /// that no longer match anything fall back to "all".
    pub fn select(&mut self, level: Level, choice: Choice) {
        if *self.selection.get(level) == choice {
            return;
        }
        self.selection.set(level, choice);
        if let Some(ds) = &self.dataset {
            reset_below(ds, &mut self.selection, level);
        }
        if level == Level::State {
            self.map_reset_pending = true;
        }
        log::info!("Selection changed: {:?}", self.selection);
        self.refresh();
    }

    /// Change the ordering of the top-restaurants table.
    pub fn sort_top(&mut self, column: TopColumn) {
        self.top_sort.toggle(column);
        self.top_sort.apply(&mut self.top_sorted);
    }

    fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = render(ds, &self.selection);
        self.map_points = Arc::from(view.map_points.as_slice());
        self.color_map = ColorMap::for_points(&view.map_points);
        self.top_sorted = view.top_restaurants.clone();
        self.top_sort.apply(&mut self.top_sorted);
        self.view = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::restaurant;

    fn state() -> AppState {
        let mut s = AppState::default();
        s.set_dataset(Dataset::from_restaurants(vec![
            restaurant("McDonald's", "Austin", "TX", Some("Burgers")),
            restaurant("McDonald's", "Dallas", "TX", Some("Burgers")),
            restaurant("Subway", "Fresno", "CA", Some("Sandwich Shop")),
            restaurant("Wendy's", "Albany", "NY", None),
        ]));
        s
    }

    fn only(v: &str) -> Choice {
        Choice::Only(v.to_string())
    }

    #[test]
    fn test_select_state_resets_city_and_recentres() {
        let mut s = state();
        s.select(Level::City, only("Austin"));
        s.map_reset_pending = false;

        s.select(Level::State, only("CA"));
        assert_eq!(s.selection.city, Choice::All);
        assert!(s.map_reset_pending);
        assert_eq!(s.view.as_ref().unwrap().total, 1);
    }

    #[test]
    fn test_city_change_keeps_map_position() {
        let mut s = state();
        s.map_reset_pending = false;
        s.select(Level::City, only("Austin"));
        assert!(!s.map_reset_pending);
        assert_eq!(s.view.as_ref().unwrap().rows, vec![0]);
    }

    #[test]
    fn test_category_kept_when_city_changes_within_match() {
        let mut s = AppState::default();
        s.set_dataset(Dataset::from_restaurants(vec![
            restaurant("Pizza Hut", "Austin", "TX", Some("Pizza Place, Fast Food")),
            restaurant("Pizza Hut", "Dallas", "TX", Some("Pizza Place")),
            restaurant("Subway", "Dallas", "TX", Some("Sandwich Shop")),
        ]));
        s.select(Level::Category, only("Pizza"));
        assert_eq!(s.view.as_ref().unwrap().rows, vec![0, 1]);

        s.select(Level::City, only("Dallas"));
        assert_eq!(s.selection.category, only("Pizza"));
        assert_eq!(s.view.as_ref().unwrap().rows, vec![1]);
    }

    #[test]
    fn test_map_points_shared_until_selection_changes() {
        let mut s = state();
        let before = Arc::clone(&s.map_points);
        assert_eq!(before.len(), 4);

        s.sort_top(TopColumn::Name);
        assert!(Arc::ptr_eq(&before, &s.map_points));

        s.select(Level::State, only("TX"));
        assert!(!Arc::ptr_eq(&before, &s.map_points));
        assert_eq!(s.map_points.len(), 2);
    }

    #[test]
    fn test_top_table_default_order_is_count_desc() {
        let s = state();
        assert_eq!(s.top_sorted[0].state, "TX");
        assert_eq!(s.top_sorted[0].count, 2);
    }

    #[test]
    fn test_sort_top_by_state() {
        let mut s = state();
        s.sort_top(TopColumn::State);
        let states: Vec<_> = s.top_sorted.iter().map(|t| t.state.as_str()).collect();
        assert_eq!(states, vec!["CA", "NY", "TX"]);
        s.sort_top(TopColumn::State);
        let states: Vec<_> = s.top_sorted.iter().map(|t| t.state.as_str()).collect();
        assert_eq!(states, vec!["TX", "NY", "CA"]);
    }

    #[test]
    fn test_load_failure_reports_cause_chain() {
        let mut s = state();
        s.load(Path::new("/definitely/not/here.csv"));
        let msg = s.status_message.as_deref().unwrap();
        assert!(msg.starts_with("loading /definitely/not/here.csv: "));
        assert!(msg.contains("was not found"));
        assert!(s.view.is_none());
    }

    #[test]
    fn test_load_replaces_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food.csv");
        std::fs::write(&path, "name,address,city,province\nSubway,1 Elm,Austin,TX\n").unwrap();

        let mut s = state();
        s.select(Level::State, only("CA"));
        s.load(&path);
        assert_eq!(s.selection, Selection::default());
        assert_eq!(s.dataset.as_ref().unwrap().len(), 1);
        assert!(s.status_message.is_none());
    }

    #[test]
    fn test_load_error_clears_views() {
        let mut s = state();
        s.set_load_error("boom".into());
        assert!(s.dataset.is_none());
        assert!(s.view.is_none());
        assert!(s.map_points.is_empty());
        assert_eq!(s.status_message.as_deref(), Some("boom"));
    }
}
