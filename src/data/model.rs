use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Restaurant – one row of the source table
// ---------------------------------------------------------------------------

/// A single restaurant location.
///
/// Column names follow the source file (`postalCode` is camel-cased there).
/// Unknown columns are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub address: String,
    pub city: String,
    /// Two-letter state code.
    pub province: String,
    #[serde(rename = "postalCode", default)]
    pub postal_code: String,
    /// Comma-separated tags, e.g. `"Fast Food, Burgers"`.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
}

/// Separator between tags in the `categories` field.
pub const TAG_SEPARATOR: &str = ", ";

impl Restaurant {
    /// Iterate the individual tags of the categories field (none if absent).
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.categories
            .as_deref()
            .into_iter()
            .flat_map(|c| c.split(TAG_SEPARATOR))
            .filter(|t| !t.is_empty())
    }

    /// Coordinates, if both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Empty strings and nulls both mean "no value".
fn non_empty_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(de)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All restaurants, in file order.
    pub restaurants: Vec<Restaurant>,
}

impl Dataset {
    pub fn from_restaurants(restaurants: Vec<Restaurant>) -> Self {
        Dataset { restaurants }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Row by index into `restaurants`.
    pub fn get(&self, index: usize) -> Option<&Restaurant> {
        self.restaurants.get(index)
    }

    /// Distinct states present in the data.
    pub fn states(&self) -> BTreeSet<&str> {
        self.restaurants.iter().map(|r| r.province.as_str()).collect()
    }
}

#[cfg(test)]
pub(crate) fn restaurant(name: &str, city: &str, province: &str, categories: Option<&str>) -> Restaurant {
    Restaurant {
        name: name.to_string(),
        address: format!("1 {name} Way"),
        city: city.to_string(),
        province: province.to_string(),
        postal_code: "00000".to_string(),
        categories: categories.map(str::to_string),
        latitude: Some(30.0),
        longitude: Some(-97.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_split_on_separator() {
        let r = restaurant("Subway", "Austin", "TX", Some("Fast Food, Sandwich Shop"));
        assert_eq!(r.tags().collect::<Vec<_>>(), vec!["Fast Food", "Sandwich Shop"]);
    }

    #[test]
    fn test_tags_absent_categories() {
        let r = restaurant("Subway", "Austin", "TX", None);
        assert_eq!(r.tags().count(), 0);
    }

    #[test]
    fn test_tags_skip_empty() {
        let r = restaurant("Subway", "Austin", "TX", Some("Fast Food, "));
        assert_eq!(r.tags().collect::<Vec<_>>(), vec!["Fast Food"]);
    }

    #[test]
    fn test_coordinates_require_both() {
        let mut r = restaurant("Subway", "Austin", "TX", None);
        assert_eq!(r.coordinates(), Some((30.0, -97.0)));
        r.longitude = None;
        assert_eq!(r.coordinates(), None);
        r.longitude = Some(f64::NAN);
        assert_eq!(r.coordinates(), None);
    }

    #[test]
    fn test_states_distinct() {
        let ds = Dataset::from_restaurants(vec![
            restaurant("A", "Austin", "TX", None),
            restaurant("B", "Dallas", "TX", None),
            restaurant("C", "Fresno", "CA", None),
        ]);
        assert_eq!(ds.states().into_iter().collect::<Vec<_>>(), vec!["CA", "TX"]);
    }
}
