//! Photo Sifter - A lightweight tool for sorting a folder of photos
//!
//! Each image in a folder is shown in turn and copied into a `Keep`
//! or `Discard` folder with a single keystroke.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod collector;
mod config;
mod error;
mod file_ops;
mod session;

use app::PhotoSifterApp;
use config::AppConfig;

fn main() -> eframe::Result<()> {
    // Initialize logging in debug mode
    #[cfg(debug_assertions)]
    env_logger::init();

    let config = AppConfig::for_platform();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(config.idle_window_size)
            .with_min_inner_size([300.0, 100.0])
            .with_title("Photo Sifter"),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Photo Sifter",
        options,
        Box::new(|cc| Ok(Box::new(PhotoSifterApp::new(cc, config)))),
    )
}
