//! List-style chapter editor: one editable row per segment.
//!
//! Rows are a rendering cache patched/rebuilt from store notifications,
//! exactly like the timeline strip. Edits flow the other way, through the
//! same store operations any caller uses: titles retitle live, typed
//! start times commit through `resize_boundary` and revert the displayed
//! value when the store says no.

use crate::core::segment::{Segment, SegmentId};
use crate::core::store::SegmentStore;
use crate::core::time::{format_timestamp, Time};
use crate::sync::ViewUpdate;
use crate::ui::hms_input::HmsInput;

pub struct ListEditor {
    rows: Vec<Row>,
    show_hours: bool,
}

struct Row {
    id: SegmentId,
    title: String,
    /// Last store-confirmed range; the revert target for rejected edits.
    start: Time,
    end: Time,
    start_input: HmsInput,
}

impl Row {
    fn new(segment: &Segment, show_hours: bool) -> Self {
        Self {
            id: segment.id,
            title: segment.title.clone(),
            start: segment.start,
            end: segment.end,
            start_input: HmsInput::new(show_hours, segment.start),
        }
    }

    fn refresh(&mut self, segment: &Segment) {
        self.title = segment.title.clone();
        self.start = segment.start;
        self.end = segment.end;
        self.start_input.set_from_seconds(segment.start);
    }
}

impl ListEditor {
    /// `show_hours` should match the exported timestamp width: hours
    /// fields appear once the video is an hour or longer.
    pub fn new(show_hours: bool) -> Self {
        Self {
            rows: Vec::new(),
            show_hours,
        }
    }

    pub fn apply(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::Rebuild(segments) => {
                self.rows = segments
                    .iter()
                    .map(|segment| Row::new(segment, self.show_hours))
                    .collect();
            }
            ViewUpdate::Patch(segment) => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.id == segment.id) {
                    row.refresh(segment);
                }
            }
        }
    }

    /// Push a typed start time into the store; on rejection the input
    /// snaps back to the last confirmed value.
    fn commit_start(store: &mut SegmentStore, row: &mut Row, time: Time) {
        if store.resize_boundary(row.id, time).is_err() {
            row.start_input.set_from_seconds(row.start);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, store: &mut SegmentStore) {
        let row_count = self.rows.len();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, row) in self.rows.iter_mut().enumerate() {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.heading(if row.title.is_empty() {
                            "Untitled"
                        } else {
                            row.title.as_str()
                        });
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                let remove =
                                    ui.add_enabled(row_count > 1, egui::Button::new("Remove"));
                                if remove.clicked() {
                                    let _ = store.delete_segment(row.id);
                                }
                            },
                        );
                    });

                    ui.horizontal(|ui| {
                        ui.label("Title:");
                        if ui.text_edit_singleline(&mut row.title).changed() {
                            let _ = store.retitle(row.id, &row.title);
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Start:");
                        if index == 0 {
                            // The first chapter is pinned to 0:00.
                            ui.label(format_timestamp(0, false));
                        } else if let Some(committed) = row.start_input.show(ui, true) {
                            Self::commit_start(store, row, committed);
                        }

                        ui.label("End:");
                        ui.label(format_timestamp(row.end, false));
                    });
                });
            }
        });
    }
}
