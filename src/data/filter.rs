use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::model::{Dataset, Restaurant};

// ---------------------------------------------------------------------------
// Selection: one choice per cascade level
// ---------------------------------------------------------------------------

/// A single dropdown value: the "all" sentinel or a concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// `None` and the empty string both mean "no restriction".
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Choice::Only(v),
            _ => Choice::All,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }

    /// Human-readable label, using the level's sentinel text for `All`.
    pub fn label(&self, level: Level) -> &str {
        match self {
            Choice::All => level.all_label(),
            Choice::Only(v) => v,
        }
    }
}

/// The three levels of the cascade, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    State,
    City,
    Category,
}

impl Level {
    pub fn all_label(self) -> &'static str {
        match self {
            Level::State => "All States",
            Level::City => "All Cities",
            Level::Category => "All Categories",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Level::State => "Select State",
            Level::City => "Select City",
            Level::Category => "Select Subcategory",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::State => write!(f, "state"),
            Level::City => write!(f, "city"),
            Level::Category => write!(f, "category"),
        }
    }
}

/// The current (state, city, category) selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub state: Choice,
    pub city: Choice,
    pub category: Choice,
}

impl Selection {
    pub fn get(&self, level: Level) -> &Choice {
        match level {
            Level::State => &self.state,
            Level::City => &self.city,
            Level::Category => &self.category,
        }
    }

    /// Replace one level. Levels below it are kept; call
    /// [`reset_below`] to drop values that no longer match.
    pub fn set(&mut self, level: Level, choice: Choice) {
        match level {
            Level::State => self.state = choice,
            Level::City => self.city = choice,
            Level::Category => self.category = choice,
        }
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

fn state_matches(r: &Restaurant, choice: &Choice) -> bool {
    choice.value().map_or(true, |s| r.province == s)
}

fn city_matches(r: &Restaurant, choice: &Choice) -> bool {
    choice.value().map_or(true, |c| r.city == c)
}

/// Substring containment against the raw categories field, so `"Pizza"`
/// also matches a row tagged `"Pizza Place"`. Rows without categories never
/// match a concrete category.
fn category_matches(r: &Restaurant, choice: &Choice) -> bool {
    match choice.value() {
        None => true,
        Some(tag) => r.categories.as_deref().is_some_and(|c| c.contains(tag)),
    }
}

/// Indices of rows matching every level down to and including `through`.
fn matching_indices(dataset: &Dataset, selection: &Selection, through: Option<Level>) -> Vec<usize> {
    dataset
        .restaurants
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            let Some(level) = through else {
                return true;
            };
            if !state_matches(r, &selection.state) {
                return false;
            }
            if level == Level::State {
                return true;
            }
            if !city_matches(r, &selection.city) {
                return false;
            }
            level == Level::City || category_matches(r, &selection.category)
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Cascade operations
// ---------------------------------------------------------------------------

/// Indices of rows restricted by the state choice alone.
pub fn state_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    matching_indices(dataset, selection, Some(Level::State))
}

/// Valid options for `level`, conditioned on the levels above it.
///
/// The `All` sentinel is always first, followed by the distinct values of
/// the upstream subset in ascending byte order. Selections at `level` and
/// below are ignored.
pub fn compute_options(dataset: &Dataset, level: Level, upstream: &Selection) -> Vec<Choice> {
    let parent = match level {
        Level::State => None,
        Level::City => Some(Level::State),
        Level::Category => Some(Level::City),
    };
    let rows = matching_indices(dataset, upstream, parent);
    let subset = rows.iter().map(|&i| &dataset.restaurants[i]);

    let values: BTreeSet<&str> = match level {
        Level::State => subset.map(|r| r.province.as_str()).collect(),
        Level::City => subset.map(|r| r.city.as_str()).collect(),
        Level::Category => subset.flat_map(|r| r.tags()).collect(),
    };

    std::iter::once(Choice::All)
        .chain(values.into_iter().map(|v| Choice::Only(v.to_string())))
        .collect()
}

/// Indices of rows matching the full selection, in dataset order.
///
/// State, then city, then category. An empty result is valid.
pub fn apply_filter(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    matching_indices(dataset, selection, Some(Level::Category))
}

/// After `changed` was set, reset any lower level whose choice no longer
/// matches a row under the levels above it.
///
/// A category is kept while it still matches by containment, so a typed
/// value that is not an exact tag survives. Levels at or above `changed` are
/// never touched.
///
/// Returns the levels that were reset.
pub fn reset_below(dataset: &Dataset, selection: &mut Selection, changed: Level) -> Vec<Level> {
    let below: &[Level] = match changed {
        Level::State => &[Level::City, Level::Category],
        Level::City => &[Level::Category],
        Level::Category => &[],
    };

    let mut reset = Vec::new();
    for &level in below {
        let current = selection.get(level);
        if current.is_all() {
            continue;
        }
        if matching_indices(dataset, selection, Some(level)).is_empty() {
            log::warn!(
                "{level} '{}' is not available for the current selection; showing all",
                current.label(level)
            );
            selection.set(level, Choice::All);
            reset.push(level);
        }
    }
    reset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::restaurant;

    fn sample() -> Dataset {
        Dataset::from_restaurants(vec![
            restaurant("McDonald's", "Austin", "TX", Some("Fast Food, Burgers")),
            restaurant("Subway", "Dallas", "TX", Some("Sandwich Shop")),
            restaurant("Pizza Hut", "Austin", "TX", Some("Pizza Place, Fast Food")),
            restaurant("Taco Bell", "Fresno", "CA", None),
            restaurant("In-N-Out", "Fresno", "CA", Some("Burgers")),
            restaurant("Wendy's", "Albany", "NY", Some("Fast Food")),
        ])
    }

    fn only(v: &str) -> Choice {
        Choice::Only(v.to_string())
    }

    fn values(options: &[Choice]) -> Vec<&str> {
        options.iter().filter_map(Choice::value).collect()
    }

    #[test]
    fn test_state_options_sorted_with_sentinel() {
        let opts = compute_options(&sample(), Level::State, &Selection::default());
        assert_eq!(opts[0], Choice::All);
        assert_eq!(values(&opts), vec!["CA", "NY", "TX"]);
    }

    #[test]
    fn test_city_options_follow_state() {
        let sel = Selection { state: only("TX"), ..Default::default() };
        let opts = compute_options(&sample(), Level::City, &sel);
        assert_eq!(values(&opts), vec!["Austin", "Dallas"]);
    }

    #[test]
    fn test_category_options_flatten_tags() {
        let sel = Selection { state: only("TX"), city: only("Austin"), ..Default::default() };
        let opts = compute_options(&sample(), Level::Category, &sel);
        assert_eq!(values(&opts), vec!["Burgers", "Fast Food", "Pizza Place"]);
    }

    #[test]
    fn test_category_options_skip_null_categories() {
        let sel = Selection { state: only("CA"), ..Default::default() };
        let opts = compute_options(&sample(), Level::Category, &sel);
        assert_eq!(values(&opts), vec!["Burgers"]);
    }

    #[test]
    fn test_options_on_empty_subset_keep_sentinel() {
        let sel = Selection { state: only("ZZ"), ..Default::default() };
        let opts = compute_options(&sample(), Level::City, &sel);
        assert_eq!(opts, vec![Choice::All]);
    }

    #[test]
    fn test_options_ignore_own_level() {
        let sel = Selection { state: only("TX"), city: only("Dallas"), ..Default::default() };
        let opts = compute_options(&sample(), Level::City, &sel);
        assert_eq!(values(&opts), vec!["Austin", "Dallas"]);
    }

    #[test]
    fn test_apply_filter_preserves_order_and_is_idempotent() {
        let ds = sample();
        let sel = Selection { state: only("TX"), ..Default::default() };
        let rows = apply_filter(&ds, &sel);
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(apply_filter(&ds, &sel), rows);
    }

    #[test]
    fn test_apply_filter_all_passthrough() {
        let ds = sample();
        assert_eq!(apply_filter(&ds, &Selection::default()).len(), ds.len());
    }

    #[test]
    fn test_category_is_substring_match() {
        let sel = Selection { category: only("Pizza"), ..Default::default() };
        assert_eq!(apply_filter(&sample(), &sel), vec![2]);
    }

    #[test]
    fn test_null_categories_never_match_concrete_category() {
        let ds = sample();
        let sel = Selection { state: only("CA"), category: only("Pizza"), ..Default::default() };
        assert!(apply_filter(&ds, &sel).is_empty());

        let sel = Selection { state: only("CA"), ..Default::default() };
        assert_eq!(apply_filter(&ds, &sel), vec![3, 4]);
    }

    #[test]
    fn test_unknown_state_yields_no_rows() {
        let sel = Selection { state: only("ZZ"), ..Default::default() };
        assert!(apply_filter(&sample(), &sel).is_empty());
    }

    #[test]
    fn test_city_options_cover_state_subset() {
        let ds = sample();
        for state in compute_options(&ds, Level::State, &Selection::default()) {
            let base = Selection { state: state.clone(), ..Default::default() };
            let expected = state_indices(&ds, &base);
            let mut covered: Vec<usize> = compute_options(&ds, Level::City, &base)
                .into_iter()
                .filter(|c| !c.is_all())
                .flat_map(|city| apply_filter(&ds, &Selection { city, ..base.clone() }))
                .collect();
            covered.sort_unstable();
            assert_eq!(covered, expected);
        }
    }

    #[test]
    fn test_state_change_drops_stale_city() {
        let ds = sample();
        let mut sel = Selection {
            state: only("CA"),
            city: only("Austin"),
            category: only("Burgers"),
        };
        let reset = reset_below(&ds, &mut sel, Level::State);
        assert_eq!(reset, vec![Level::City]);
        assert_eq!(sel.city, Choice::All);
        assert_eq!(sel.category, only("Burgers"));
    }

    #[test]
    fn test_state_change_cascades() {
        let ds = sample();
        let mut sel = Selection {
            state: only("NY"),
            city: only("Austin"),
            category: only("Pizza Place"),
        };
        let reset = reset_below(&ds, &mut sel, Level::State);
        assert_eq!(reset, vec![Level::City, Level::Category]);
        assert_eq!(sel, Selection { state: only("NY"), ..Default::default() });
    }

    #[test]
    fn test_reset_keeps_changed_level_and_above() {
        let ds = sample();
        let mut sel = Selection { state: only("ZZ"), city: only("Austin"), ..Default::default() };
        assert!(reset_below(&ds, &mut sel, Level::City).is_empty());
        assert_eq!(sel.state, only("ZZ"));
        assert_eq!(sel.city, only("Austin"));
        assert!(apply_filter(&ds, &sel).is_empty());
    }

    #[test]
    fn test_city_change_keeps_containment_category() {
        let ds = sample();
        // "Pizza" is not a tag, but it is contained in Austin's "Pizza Place".
        let mut sel = Selection { state: only("TX"), city: only("Austin"), category: only("Pizza") };
        assert!(reset_below(&ds, &mut sel, Level::City).is_empty());
        assert_eq!(apply_filter(&ds, &sel), vec![2]);

        sel.city = only("Dallas");
        assert_eq!(reset_below(&ds, &mut sel, Level::City), vec![Level::Category]);
        assert_eq!(sel.category, Choice::All);
    }

    #[test]
    fn test_choice_from_option() {
        assert_eq!(Choice::from_option(None), Choice::All);
        assert_eq!(Choice::from_option(Some(String::new())), Choice::All);
        assert_eq!(Choice::from_option(Some("TX".into())), only("TX"));
        assert_eq!(Choice::All.label(Level::City), "All Cities");
    }
}
