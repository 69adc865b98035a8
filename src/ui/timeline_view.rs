//! Visual timeline strip: one chunk per chapter with draggable boundary
//! handles.
//!
//! The strip holds no authoritative state. Its chunk list is a rendering
//! cache rebuilt or patched from store notifications, and a drag produces
//! only a local optimistic preview until the pointer is released — the
//! clamp math below mirrors the store's own validation rules, so the
//! preview can never show a state the store would refuse. Pointer motion
//! between frames collapses into the frame's latest position, which keeps
//! per-move work off the full validation/notification path.

use egui::{pos2, vec2, Rect, Sense};

use crate::core::segment::{Segment, SegmentId};
use crate::core::time::Time;
use crate::sync::ViewUpdate;

/// Height of the strip in points.
pub const STRIP_HEIGHT: f32 = 48.0;

const HANDLE_WIDTH: f32 = 9.0;
const CHUNK_GAP: f32 = 1.5;

/// Which edge of a segment a handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleSide {
    Start,
    End,
}

/// The single authoritative message a finished drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragCommit {
    pub segment_id: SegmentId,
    pub side: HandleSide,
    pub time: Time,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    segment_id: SegmentId,
    side: HandleSide,
    /// Strip geometry captured once at drag begin, not re-measured per
    /// move.
    strip_left: f32,
    strip_width: f32,
    /// Local, unconfirmed preview of the boundary being moved.
    preview: Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chunk {
    id: SegmentId,
    start: Time,
    end: Time,
}

/// Map a pointer x position to a whole-second time on the video.
fn time_from_pointer(x: f32, strip_left: f32, strip_width: f32, duration: Time) -> Time {
    if strip_width <= 0.0 {
        return 0;
    }
    let fraction = ((x - strip_left) / strip_width).clamp(0.0, 1.0);
    let raw = (f64::from(fraction) * duration as f64).floor() as Time;
    raw.min(duration)
}

/// Legal range for one handle, derived from the confirmed chunk list.
/// `None` means the handle is pinned (first start / last end) and never
/// drags.
fn handle_bounds(
    chunks: &[Chunk],
    index: usize,
    side: HandleSide,
    min_len: Time,
) -> Option<(Time, Time)> {
    match side {
        HandleSide::Start => {
            let left = chunks.get(index.checked_sub(1)?)?;
            let chunk = chunks.get(index)?;
            Some((left.start + min_len, chunk.end.saturating_sub(min_len)))
        }
        HandleSide::End => {
            let chunk = chunks.get(index)?;
            let right = chunks.get(index + 1)?;
            Some((chunk.start + min_len, right.end.saturating_sub(min_len)))
        }
    }
}

/// The draggable strip widget.
pub struct TimelineView {
    duration: Time,
    chunks: Vec<Chunk>,
    drag: Option<DragState>,
    commits: Vec<DragCommit>,
    hover_time: Option<Time>,
}

impl TimelineView {
    pub fn new() -> Self {
        Self {
            duration: 0,
            chunks: Vec::new(),
            drag: None,
            commits: Vec::new(),
            hover_time: None,
        }
    }

    /// Apply a change notification to the rendering cache.
    pub fn apply(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::Rebuild(segments) => {
                self.chunks = segments
                    .iter()
                    .map(|segment| Chunk {
                        id: segment.id,
                        start: segment.start,
                        end: segment.end,
                    })
                    .collect();
                self.duration = segments.last().map_or(0, |segment| segment.end);
                // Topology changed under an in-flight drag; its preview
                // no longer refers to anything real.
                self.drag = None;
            }
            ViewUpdate::Patch(segment) => {
                if let Some(chunk) = self.chunks.iter_mut().find(|chunk| chunk.id == segment.id) {
                    chunk.start = segment.start;
                    chunk.end = segment.end;
                }
            }
        }
    }

    /// Begin dragging a handle, capturing strip geometry once. Pinned
    /// handles ignore the request.
    pub fn begin_drag(
        &mut self,
        segment_id: SegmentId,
        side: HandleSide,
        strip_left: f32,
        strip_width: f32,
    ) {
        let Some(index) = self.index_of(segment_id) else {
            return;
        };
        let min_len = 0; // bounds existence alone decides whether the handle is pinned
        if handle_bounds(&self.chunks, index, side, min_len).is_none() {
            return;
        }

        let chunk = &self.chunks[index];
        let preview = match side {
            HandleSide::Start => chunk.start,
            HandleSide::End => chunk.end,
        };
        self.drag = Some(DragState {
            segment_id,
            side,
            strip_left,
            strip_width,
            preview,
        });
    }

    /// Update the optimistic preview from the latest pointer position.
    pub fn drag_to(&mut self, pointer_x: f32, min_len: Time) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(index) = self.index_of(drag.segment_id) else {
            return;
        };
        let Some((lo, hi)) = handle_bounds(&self.chunks, index, drag.side, min_len) else {
            return;
        };

        let raw = time_from_pointer(pointer_x, drag.strip_left, drag.strip_width, self.duration);
        if let Some(drag) = &mut self.drag {
            drag.preview = raw.clamp(lo, hi.max(lo));
        }
    }

    /// Pointer released: the final clamped time becomes the one
    /// authoritative boundary move.
    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.commits.push(DragCommit {
                segment_id: drag.segment_id,
                side: drag.side,
                time: drag.preview,
            });
        }
    }

    /// Pointer lost without a release: drop the preview, emit nothing.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drain the boundary moves produced by finished drags.
    pub fn take_commits(&mut self) -> Vec<DragCommit> {
        std::mem::take(&mut self.commits)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn hover_time(&self) -> Option<Time> {
        self.hover_time
    }

    fn index_of(&self, segment_id: SegmentId) -> Option<usize> {
        self.chunks.iter().position(|chunk| chunk.id == segment_id)
    }

    /// A chunk's visible span: the confirmed cache with the drag preview
    /// laid over the dragged chunk and the one neighbor sharing the
    /// boundary.
    fn display_span(&self, index: usize) -> (Time, Time) {
        let chunk = &self.chunks[index];
        let (mut start, mut end) = (chunk.start, chunk.end);

        if let Some(drag) = &self.drag {
            if let Some(drag_index) = self.index_of(drag.segment_id) {
                match drag.side {
                    HandleSide::Start => {
                        if index == drag_index {
                            start = drag.preview;
                        } else if index + 1 == drag_index {
                            end = drag.preview;
                        }
                    }
                    HandleSide::End => {
                        if index == drag_index {
                            end = drag.preview;
                        } else if index == drag_index + 1 {
                            start = drag.preview;
                        }
                    }
                }
            }
        }
        (start, end)
    }

    /// Render the strip. Returns a clicked seek time, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, min_len: Time, playhead: Time) -> Option<Time> {
        let desired = vec2(ui.available_width(), STRIP_HEIGHT);
        let (strip, strip_response) = ui.allocate_exact_size(desired, Sense::click());
        let painter = ui.painter_at(strip);
        painter.rect_filled(strip, 2.0, ui.visuals().extreme_bg_color);

        if self.chunks.is_empty() || self.duration == 0 {
            return None;
        }

        let duration = self.duration;
        let to_x = move |time: Time| strip.left() + (time as f32 / duration as f32) * strip.width();

        self.hover_time = if self.drag.is_none() {
            strip_response
                .hover_pos()
                .map(|pos| time_from_pointer(pos.x, strip.left(), strip.width(), duration))
        } else {
            None
        };

        for index in 0..self.chunks.len() {
            let (start, end) = self.display_span(index);
            let rect = Rect::from_min_max(
                pos2(to_x(start) + CHUNK_GAP, strip.top() + 14.0),
                pos2(to_x(end) - CHUNK_GAP, strip.bottom() - 4.0),
            );
            let hovered = self
                .hover_time
                .map_or(false, |time| time >= start && time <= end);
            let fill = if hovered {
                ui.visuals().widgets.hovered.bg_fill
            } else {
                ui.visuals().selection.bg_fill
            };
            painter.rect_filled(rect, 2.0, fill);
        }

        for index in 0..self.chunks.len() {
            for side in [HandleSide::Start, HandleSide::End] {
                if handle_bounds(&self.chunks, index, side, min_len).is_none() {
                    continue;
                }

                let (start, end) = self.display_span(index);
                let x = match side {
                    HandleSide::Start => to_x(start),
                    HandleSide::End => to_x(end),
                };
                let handle_rect = Rect::from_center_size(
                    pos2(x, strip.top() + 14.0 + (strip.height() - 18.0) / 2.0),
                    vec2(HANDLE_WIDTH, strip.height() - 18.0),
                );

                let chunk_id = self.chunks[index].id;
                let id = egui::Id::new(("boundary-handle", chunk_id, side));
                let response = ui.interact(handle_rect, id, Sense::drag());

                if response.hovered() || response.dragged() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                }
                painter.rect_filled(
                    handle_rect.shrink2(vec2(3.0, 2.0)),
                    1.5,
                    ui.visuals().widgets.active.fg_stroke.color,
                );

                if response.drag_started() {
                    self.begin_drag(chunk_id, side, strip.left(), strip.width());
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.drag_to(pos.x, min_len);
                    }
                }
                if response.drag_stopped() {
                    self.end_drag();
                }
            }
        }

        // Pointer vanished without a release event (focus loss, cancel):
        // the preview never becomes a commit.
        if self.drag.is_some() && !ui.input(|i| i.pointer.any_down()) {
            self.cancel_drag();
        }

        let playhead_x = to_x(playhead.min(duration));
        painter.line_segment(
            [pos2(playhead_x, strip.top()), pos2(playhead_x, strip.bottom())],
            egui::Stroke::new(2.0, ui.visuals().warn_fg_color),
        );

        if let Some(time) = self.hover_time {
            painter.text(
                pos2(strip.left() + 4.0, strip.top() + 2.0),
                egui::Align2::LEFT_TOP,
                crate::core::time::format_timestamp(time, false),
                egui::FontId::proportional(10.0),
                ui.visuals().text_color(),
            );
        }

        if strip_response.clicked() && self.drag.is_none() {
            if let Some(pos) = strip_response.interact_pointer_pos() {
                return Some(time_from_pointer(pos.x, strip.left(), strip.width(), duration));
            }
        }
        None
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(1, "Intro", 0, 10),
            Segment::new(2, "Chapter 2", 10, 20),
            Segment::new(3, "Chapter 3", 20, 30),
        ]
    }

    fn view() -> TimelineView {
        let mut view = TimelineView::new();
        view.apply(&ViewUpdate::Rebuild(segments()));
        view
    }

    #[test]
    fn test_time_from_pointer_maps_and_floors() {
        // 300pt strip over 30s: 10pt per second.
        assert_eq!(time_from_pointer(0.0, 0.0, 300.0, 30), 0);
        assert_eq!(time_from_pointer(155.0, 0.0, 300.0, 30), 15);
        assert_eq!(time_from_pointer(159.9, 0.0, 300.0, 30), 15);
        assert_eq!(time_from_pointer(300.0, 0.0, 300.0, 30), 30);
    }

    #[test]
    fn test_time_from_pointer_clamps_outside_strip() {
        assert_eq!(time_from_pointer(-50.0, 0.0, 300.0, 30), 0);
        assert_eq!(time_from_pointer(900.0, 0.0, 300.0, 30), 30);
    }

    #[test]
    fn test_time_from_pointer_respects_strip_origin() {
        assert_eq!(time_from_pointer(250.0, 100.0, 300.0, 30), 15);
    }

    #[test]
    fn test_handle_bounds_pins_outer_edges() {
        let view = view();
        assert!(handle_bounds(&view.chunks, 0, HandleSide::Start, 10).is_none());
        assert!(handle_bounds(&view.chunks, 2, HandleSide::End, 10).is_none());
    }

    #[test]
    fn test_handle_bounds_inner_handles() {
        let view = view();
        // Start of chunk 1 may move within [chunk0.start+10, chunk1.end-10].
        assert_eq!(
            handle_bounds(&view.chunks, 1, HandleSide::Start, 10),
            Some((10, 10))
        );
        // End of chunk 0 is the same boundary seen from the other side.
        assert_eq!(
            handle_bounds(&view.chunks, 0, HandleSide::End, 10),
            Some((10, 10))
        );
    }

    #[test]
    fn test_drag_preview_is_clamped_to_local_range() {
        let mut view = TimelineView::new();
        view.apply(&ViewUpdate::Rebuild(vec![
            Segment::new(1, "Intro", 0, 30),
            Segment::new(2, "Chapter 2", 30, 60),
        ]));

        // 600pt strip over 60s: 10pt per second.
        view.begin_drag(2, HandleSide::Start, 0.0, 600.0);

        // Raw pointer time 5s clamps up to chunk0.start + min = 10.
        view.drag_to(50.0, 10);
        assert_eq!(view.drag.unwrap().preview, 10);

        // Raw pointer time 55s clamps down to chunk1.end - min = 50.
        view.drag_to(550.0, 10);
        assert_eq!(view.drag.unwrap().preview, 50);

        // In-range positions floor to whole seconds.
        view.drag_to(257.0, 10);
        assert_eq!(view.drag.unwrap().preview, 25);
    }

    #[test]
    fn test_preview_touches_only_the_shared_boundary() {
        let mut view = view();
        // 300pt over 30s.
        view.begin_drag(2, HandleSide::Start, 0.0, 300.0);
        view.drag_to(150.0, 10);

        assert_eq!(view.display_span(0), (0, 15));
        assert_eq!(view.display_span(1), (15, 20));
        assert_eq!(view.display_span(2), (20, 30));
        // Confirmed cache is untouched.
        assert_eq!(view.chunks[0], Chunk { id: 1, start: 0, end: 10 });
    }

    #[test]
    fn test_end_drag_emits_single_commit() {
        let mut view = view();
        view.begin_drag(2, HandleSide::Start, 0.0, 300.0);
        view.drag_to(150.0, 10);
        view.end_drag();

        assert_eq!(
            view.take_commits(),
            vec![DragCommit {
                segment_id: 2,
                side: HandleSide::Start,
                time: 15
            }]
        );
        assert!(view.take_commits().is_empty());
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_cancelled_drag_emits_nothing_and_reverts_display() {
        let mut view = view();
        view.begin_drag(2, HandleSide::Start, 0.0, 300.0);
        view.drag_to(150.0, 10);
        view.cancel_drag();

        assert!(view.take_commits().is_empty());
        assert_eq!(view.display_span(0), (0, 10));
        assert_eq!(view.display_span(1), (10, 20));
    }

    #[test]
    fn test_begin_drag_ignores_pinned_handles() {
        let mut view = view();
        view.begin_drag(1, HandleSide::Start, 0.0, 300.0);
        assert!(!view.is_dragging());
        view.begin_drag(3, HandleSide::End, 0.0, 300.0);
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_end_handle_commit_carries_end_side() {
        let mut view = view();
        view.begin_drag(1, HandleSide::End, 0.0, 300.0);
        view.drag_to(130.0, 10);
        view.end_drag();

        assert_eq!(
            view.take_commits(),
            vec![DragCommit {
                segment_id: 1,
                side: HandleSide::End,
                time: 13
            }]
        );
    }

    #[test]
    fn test_apply_patch_updates_one_chunk() {
        let mut view = view();
        view.apply(&ViewUpdate::Patch(Segment::new(2, "Chapter 2", 12, 20)));

        assert_eq!(view.chunks[1], Chunk { id: 2, start: 12, end: 20 });
        assert_eq!(view.chunks[0], Chunk { id: 1, start: 0, end: 10 });
        assert_eq!(view.chunks.len(), 3);
    }

    #[test]
    fn test_apply_rebuild_replaces_cache_and_discards_drag() {
        let mut view = view();
        view.begin_drag(2, HandleSide::Start, 0.0, 300.0);

        view.apply(&ViewUpdate::Rebuild(vec![
            Segment::new(7, "Intro", 0, 20),
            Segment::new(8, "Chapter 2", 20, 40),
        ]));

        assert!(!view.is_dragging());
        assert_eq!(view.chunks.len(), 2);
        assert_eq!(view.duration, 40);
    }
}
