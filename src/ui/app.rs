//! Main application UI wiring the chapter editor surfaces to the engine.
//!
//! The store is the only shared state; the list editor and the timeline
//! strip each keep a rendering cache fed by the coordinator. Video
//! decoding and playback live outside this crate, so the playback
//! position is modeled as a plain slider feeding the current-chapter
//! readout, and the load screen takes a duration directly.

use eframe::{App, CreationContext};

use crate::chapters::{export_chapters, import_chapters, parse_chapters};
use crate::core::store::SegmentStore;
use crate::core::time::{constants, format_timestamp, Time};
use crate::sync::SyncCoordinator;
use crate::ui::list_editor::ListEditor;
use crate::ui::timeline_view::TimelineView;

/// Main editor application UI
pub struct EditorApp {
    store: SegmentStore,
    coordinator: SyncCoordinator,
    timeline: TimelineView,
    editor: ListEditor,
    /// Stand-in for the playback-position feed of a real player.
    playhead: Time,
    pending_duration: f64,
    export_open: bool,
    export_text: String,
    import_open: bool,
    import_text: String,
    import_errors: Vec<String>,
}

impl EditorApp {
    /// Create a new editor application
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let mut store = SegmentStore::default();
        let coordinator = SyncCoordinator::new(&mut store);

        Self {
            store,
            coordinator,
            timeline: TimelineView::new(),
            editor: ListEditor::new(false),
            playhead: 0,
            pending_duration: 600.0,
            export_open: false,
            export_text: String::new(),
            import_open: false,
            import_text: String::new(),
            import_errors: Vec::new(),
        }
    }

    fn setup_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("Chapterline");
                ui.label("Set the video duration to start laying out chapters.");
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    ui.label("Video duration:");
                    ui.add(
                        egui::DragValue::new(&mut self.pending_duration)
                            .clamp_range(0.0..=86_400.0)
                            .speed(1.0)
                            .suffix(" s"),
                    );
                });

                let min = self.store.config().min_video_duration();
                let long_enough = self.pending_duration >= min as f64;
                if !long_enough {
                    ui.label(format!("A video needs at least {min}s to host chapters."));
                }

                if ui
                    .add_enabled(long_enough, egui::Button::new("Create timeline"))
                    .clicked()
                    && self.store.initialize(self.pending_duration).is_ok()
                {
                    let duration = self.store.video_duration().unwrap_or(0);
                    self.editor = ListEditor::new(duration >= constants::SECONDS_PER_HOUR);
                }
            });
        });
    }

    fn controls_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let add = ui.add_enabled(
                    self.store.can_add_segment(),
                    egui::Button::new("Add chapter"),
                );
                if add.clicked() {
                    let _ = self.store.add_segment();
                }

                let export = ui.add_enabled(
                    self.store.has_minimum_chapters(),
                    egui::Button::new("Export…"),
                );
                if export.clicked() {
                    let duration = self.store.video_duration().unwrap_or(0);
                    self.export_text = export_chapters(self.store.segments(), duration);
                    self.export_open = true;
                }

                if ui.button("Import…").clicked() {
                    self.import_open = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let duration = self.store.video_duration().unwrap_or(0);
                    ui.label(format!(
                        "{} / {} chapters · {}",
                        self.store.segments().len(),
                        self.store.max_segments(),
                        format_timestamp(duration, false),
                    ));
                });
            });
        });
    }

    fn export_window(&mut self, ctx: &egui::Context) {
        let mut open = self.export_open;
        egui::Window::new("Export chapters")
            .open(&mut open)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Paste into your video description:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.export_text)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
            });
        self.export_open = open;
    }

    fn import_window(&mut self, ctx: &egui::Context) {
        let mut open = self.import_open;
        let mut imported = false;

        egui::Window::new("Import chapters")
            .open(&mut open)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("One chapter per line: \"<timestamp> <title>\"");
                ui.add(
                    egui::TextEdit::multiline(&mut self.import_text)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );

                if ui.button("Import").clicked() {
                    let duration = self.store.video_duration();
                    match parse_chapters(&self.import_text, duration, self.store.config()) {
                        Ok(chapters) => {
                            match import_chapters(&mut self.store, &chapters) {
                                Ok(()) => {
                                    self.import_errors.clear();
                                    imported = true;
                                }
                                Err(error) => {
                                    self.import_errors = vec![error.to_string()];
                                }
                            }
                        }
                        Err(errors) => {
                            self.import_errors =
                                errors.iter().map(ToString::to_string).collect();
                        }
                    }
                }

                for error in &self.import_errors {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
            });

        self.import_open = open && !imported;
    }
}

impl App for EditorApp {
    /// Update the UI each frame, then run one synchronization round so
    /// both views reflect every mutation made during the frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.store.is_initialized() {
            self.setup_panel(ctx);
        } else {
            self.controls_bar(ctx);

            egui::SidePanel::left("chapter_list")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| {
                    ui.heading("Chapters");
                    ui.separator();
                    self.editor.show(ui, &mut self.store);
                });

            egui::TopBottomPanel::bottom("timeline")
                .resizable(false)
                .show(ctx, |ui| {
                    let min_len = self.store.config().min_segment_len;
                    if let Some(seek) = self.timeline.show(ui, min_len, self.playhead) {
                        self.playhead = seek;
                    }
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                let duration = self.store.video_duration().unwrap_or(0);
                ui.add_space(8.0);

                let current = self
                    .store
                    .segment_containing(self.playhead)
                    .map(|segment| segment.title.clone())
                    .unwrap_or_default();
                ui.heading(current);
                ui.label(format_timestamp(self.playhead, false));

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Playhead:");
                    ui.add(egui::Slider::new(&mut self.playhead, 0..=duration).show_value(false));
                });
            });

            self.export_window(ctx);
            self.import_window(ctx);
        }

        self.coordinator
            .pump(&mut self.store, &mut self.timeline, &mut self.editor);
    }
}
