//! Translates between the store's change notifications and the two view
//! caches, and routes finished drags back into the store.
//!
//! The patch/rebuild split lives here: structural changes (segment count
//! or neighbor relationships) always rebuild a view's cache, purely
//! numeric boundary moves on an unchanged topology always patch a single
//! entry. Getting this wrong either leaves a view stale or pays a full
//! re-render for every boundary nudge.

use crossbeam::channel::Receiver;

use crate::core::segment::{Segment, SegmentId};
use crate::core::store::{SegmentEvent, SegmentStore};
use crate::core::time::Time;
use crate::ui::list_editor::ListEditor;
use crate::ui::timeline_view::{DragCommit, HandleSide, TimelineView};

/// What a view should do with its rendering cache.
#[derive(Debug, Clone)]
pub enum ViewUpdate {
    /// One segment's fields changed; update that entry in place.
    Patch(Segment),
    /// Topology changed; throw the cache away and rebuild from this list.
    Rebuild(Vec<Segment>),
}

pub struct SyncCoordinator {
    events: Receiver<SegmentEvent>,
}

impl SyncCoordinator {
    pub fn new(store: &mut SegmentStore) -> Self {
        Self {
            events: store.subscribe(),
        }
    }

    fn classify(event: SegmentEvent) -> ViewUpdate {
        match event {
            SegmentEvent::Added { segments }
            | SegmentEvent::Deleted { segments }
            | SegmentEvent::Synced { segments } => ViewUpdate::Rebuild(segments),
            SegmentEvent::Updated { segment } => ViewUpdate::Patch(segment),
        }
    }

    /// An end handle names the same boundary as the right neighbor's
    /// start handle; the store only speaks in segment starts.
    fn resolve_commit(store: &SegmentStore, commit: DragCommit) -> Option<(SegmentId, Time)> {
        match commit.side {
            HandleSide::Start => Some((commit.segment_id, commit.time)),
            HandleSide::End => {
                let segments = store.segments();
                let index = segments
                    .iter()
                    .position(|segment| segment.id == commit.segment_id)?;
                let right = segments.get(index + 1)?;
                Some((right.id, commit.time))
            }
        }
    }

    /// Run one synchronization round: finished drags first, then fan the
    /// resulting notifications (and any others queued this frame) out to
    /// both views. Events arrive in the order operations ran.
    pub fn pump(
        &mut self,
        store: &mut SegmentStore,
        timeline: &mut TimelineView,
        editor: &mut ListEditor,
    ) {
        for commit in timeline.take_commits() {
            let Some((segment_id, time)) = Self::resolve_commit(store, commit) else {
                continue;
            };
            // A rejection is routine: the drag preview was already
            // dropped on release, so the confirmed cache stays put.
            let _ = store.resize_boundary(segment_id, time);
        }

        while let Ok(event) = self.events.try_recv() {
            let update = Self::classify(event);
            timeline.apply(&update);
            editor.apply(&update);
        }
    }
}
