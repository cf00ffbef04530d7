use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::data::aggregate::RegionCounts;

const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);

// ---------------------------------------------------------------------------
// Region bar chart
// ---------------------------------------------------------------------------

/// Bars sorted by count, largest first, one per region.
pub fn region_chart(ui: &mut Ui, counts: &RegionCounts) {
    ui.heading(&counts.title);
    ui.label(format!(
        "{} restaurants across {} regions",
        counts.total(),
        counts.pairs.len()
    ));

    let sorted = counts.sorted_desc();
    let bars: Vec<Bar> = sorted
        .iter()
        .enumerate()
        .map(|(i, (region, n))| {
            Bar::new(i as f64, *n as f64)
                .name(region)
                .width(0.8)
                .fill(SKY_BLUE)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    let labels: Vec<String> = sorted.into_iter().map(|(region, _)| region).collect();

    Plot::new("region_chart")
        .height(320.0)
        .x_axis_label(counts.x_label)
        .y_axis_label(counts.y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(counts.y_label));
        });
}
