#![windows_subsystem = "windows"]

mod app;
mod config;
mod playlist;

use app::ViewerApp;
use eframe::egui;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // コマンドライン引数から画像フォルダを取得（exeへのD&Dで渡される）
    let initial_folder: Option<PathBuf> = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .filter(|p| p.is_dir());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([200.0, 150.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Random Picture Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, initial_folder)))),
    )
}
