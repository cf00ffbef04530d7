use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::state::{AppState, TopColumn};
use crate::view::ViewModel;

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Filtered restaurants
// ---------------------------------------------------------------------------

/// Name / address / postal code / categories for every filtered row.
pub fn restaurant_table(ui: &mut Ui, dataset: &Dataset, view: &ViewModel) {
    ui.label(&view.caption);

    ui.push_id("restaurant_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(TABLE_HEIGHT)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(180.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["name", "address", "postalCode", "categories"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                    let Some(r) = dataset.get(view.rows[row.index()]) else {
                        return;
                    };
                    row.col(|ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui| {
                        ui.label(&r.address);
                    });
                    row.col(|ui| {
                        ui.label(&r.postal_code);
                    });
                    row.col(|ui| {
                        ui.label(r.categories.as_deref().unwrap_or(""));
                    });
                });
            });
    });

    ui.add_space(4.0);
    ui.label(format!("Total Restaurants: {}", view.total));
}

// ---------------------------------------------------------------------------
// Top restaurant per state
// ---------------------------------------------------------------------------

/// Sortable table of the most common restaurant in each state.
pub fn top_restaurants_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Top Restaurants by State");
    ui.label(
        "The restaurant with the most locations in each state. \
         Click a column header to sort by it; click again to reverse.",
    );

    let mut clicked: Option<TopColumn> = None;
    let sort = state.top_sort;
    let rows = &state.top_sorted;

    ui.push_id("top_restaurants_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(TABLE_HEIGHT)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(180.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for (column, title) in [
                    (TopColumn::State, "state"),
                    (TopColumn::Name, "name"),
                    (TopColumn::Count, "count"),
                ] {
                    header.col(|ui| {
                        let text = format!("{title}{}", sort.arrow(column));
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let top = &rows[row.index()];
                    row.col(|ui| {
                        ui.label(&top.state);
                    });
                    row.col(|ui| {
                        ui.label(&top.name);
                    });
                    row.col(|ui| {
                        ui.label(top.count.to_string());
                    });
                });
            });
    });

    if let Some(column) = clicked {
        state.sort_top(column);
    }
}
