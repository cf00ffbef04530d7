use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{chart, map, panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, chart, top restaurants, map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("USA Fast Food Restaurants");

    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        match &state.status_message {
            Some(msg) => {
                ui.label(RichText::new(msg).color(egui::Color32::RED).strong());
            }
            None => {
                ui.label("Open a file to explore restaurants  (File → Open…)");
            }
        }
        return;
    };

    ui.label(
        "Filter by state, city and category in the sidebar. \
         The table and count follow every filter; the chart and map follow the state.",
    );
    ui.separator();

    tables::restaurant_table(ui, dataset, view);
    ui.separator();

    chart::region_chart(ui, &view.region_counts);
    ui.separator();

    tables::top_restaurants_table(ui, state);
    ui.separator();

    let reset = std::mem::take(&mut state.map_reset_pending);
    let Some(view) = &state.view else {
        return;
    };
    map::restaurant_map(
        ui,
        &state.map_points,
        &state.color_map,
        !view.selection.state.is_all(),
        reset,
    );
}
