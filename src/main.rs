//! Main application entry point.
//!
//! Uses eframe to bootstrap the window and hand the frame loop to
//! EditorApp from src/ui/app.rs.

use eframe::egui;

use chapterline::ui::EditorApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Chapterline - Video Chapter Editor")
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chapterline",
        native_options,
        Box::new(|cc| Box::new(EditorApp::new(cc))),
    )
}
