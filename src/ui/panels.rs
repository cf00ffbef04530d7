use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{Choice, Level};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(view) = &state.view else {
        ui.label("No dataset loaded.");
        return;
    };

    // Collect the change first so `state` can be mutated after the widgets.
    let mut changed: Option<(Level, Choice)> = None;
    let levels = [
        (Level::State, &view.state_options),
        (Level::City, &view.city_options),
        (Level::Category, &view.category_options),
    ];

    for (level, options) in levels {
        let current = view.selection.get(level);
        ui.strong(level.prompt());
        egui::ComboBox::from_id_salt(level.prompt())
            .selected_text(current.label(level))
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    if ui
                        .selectable_label(option == current, option.label(level))
                        .clicked()
                    {
                        changed = Some((level, option.clone()));
                    }
                }
            });
        ui.add_space(6.0);
    }

    if let Some((level, choice)) = changed {
        state.select(level, choice);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset.as_ref().filter(|ds| ds.is_empty()) {
            ui.label(format!("{} restaurants loaded", ds.len()));
        } else if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} restaurants loaded, {} shown",
                ds.len(),
                view.total
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
