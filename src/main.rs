mod app;
mod color;
mod data;
mod state;
mod ui;
mod view;

use std::path::PathBuf;

use anyhow::Context;
use app::ExplorerApp;
use clap::{Parser, Subcommand};
use data::filter::{Choice, Selection};
use eframe::egui;
use state::AppState;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Restaurant table (.csv, .json or .parquet)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "FASTFOOD_DATA",
        default_value = "fast_food_usa.csv",
        global = true
    )]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard views for one selection as JSON
    Report {
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Report { state, city, category }) => {
            let dataset = data::loader::load_file(&cli.data)
                .with_context(|| format!("loading {}", cli.data.display()))?;
            let selection = Selection {
                state: Choice::from_option(state),
                city: Choice::from_option(city),
                category: Choice::from_option(category),
            };
            let view = view::render(&dataset, &selection);
            let report = view::Report::new(&view, &dataset);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        None => run_dashboard(cli.data),
    }
}

fn run_dashboard(path: PathBuf) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.load(&path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "USA Fast Food Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
