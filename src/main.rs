//! Labbench - Primer Design, Protein Digestion and PCR Mix Calculator
//!
//! Desktop front end over the `labbench` analysis library.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;

use app::LabbenchApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting labbench {}", env!("CARGO_PKG_VERSION"));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([800.0, 560.0])
            .with_title("Labbench"),
        ..Default::default()
    };

    eframe::run_native(
        "Labbench",
        native_options,
        Box::new(|cc| Ok(Box::new(LabbenchApp::new(cc)))),
    )
}
