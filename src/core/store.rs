//! Segment store: the single source of truth for one video's chapter
//! timeline.
//!
//! The store owns the ordered segment list and is the only place it is
//! mutated. Every operation validates against the timeline invariants
//! before touching anything, so consumers never observe a partially
//! applied edit. Successful mutations are announced on a typed event
//! channel; both presentational views (the list editor and the visual
//! timeline strip) keep rendering caches that are pure functions of these
//! events.

use crossbeam::channel::{self, Receiver, Sender};

use crate::core::segment::{Segment, SegmentId};
use crate::core::time::Time;

/// Minimum-length and minimum-count rules for one timeline.
///
/// Constructor parameters rather than ambient constants, so independent
/// timelines (and tests) never share rule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineConfig {
    /// Shortest allowed segment, in seconds.
    pub min_segment_len: Time,
    /// Fewest chapters the destination platform accepts in an export.
    pub min_segment_count: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_segment_len: 10,
            min_segment_count: 3,
        }
    }
}

impl TimelineConfig {
    /// Shortest video that can host the minimum chapter count.
    pub fn min_video_duration(&self) -> Time {
        self.min_segment_count as Time * self.min_segment_len
    }
}

/// Change notification published after every successful mutation.
///
/// Variants carrying the full list signal a topology change: consumers
/// must rebuild their rendering caches. `Updated` is the cheap patch path
/// for a single-segment field change on an unchanged topology.
#[derive(Debug, Clone)]
pub enum SegmentEvent {
    /// A segment was added; positions of every later segment may have
    /// shifted to make room.
    Added { segments: Vec<Segment> },
    /// A segment was removed and a neighbor absorbed its range.
    Deleted { segments: Vec<Segment> },
    /// One segment's fields changed; everything else is untouched.
    Updated { segment: Segment },
    /// The whole list was replaced from an external authoritative set.
    Synced { segments: Vec<Segment> },
}

/// Error type for store operations.
///
/// Rejected boundary moves are an expected, frequent outcome of free-form
/// dragging and typing; callers revert their displayed value and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("timeline is not initialized")]
    NotInitialized,
    #[error("timeline is already bound to a video")]
    AlreadyInitialized,
    #[error("video duration {duration}s is less than the minimum required {required}s")]
    DurationTooShort { duration: Time, required: Time },
    #[error("chapter limit of {max} reached")]
    SegmentLimit { max: usize },
    #[error("no segment is long enough to split")]
    NoSplittableSegment,
    #[error("cannot delete the only remaining segment")]
    OnlySegment,
    #[error("no segment with id {0}")]
    UnknownSegment(SegmentId),
    #[error("start time {time}s is outside the video")]
    OutOfRange { time: Time },
    #[error("the first segment is pinned to 0:00")]
    FirstSegmentPinned,
    #[error("segment {id} would drop below the {min}s minimum")]
    SegmentTooShort { id: SegmentId, min: Time },
    #[error("replacement ranges do not form a valid timeline: {reason}")]
    MalformedRanges { reason: &'static str },
}

/// One entry of an external authoritative range set, fed to
/// [`SegmentStore::sync_from_external_ranges`]. Ranges coming back from
/// the visual timeline carry the ids they were rendered from; freshly
/// imported ranges carry `None` and get new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalRange {
    pub id: Option<SegmentId>,
    pub start: Time,
    pub end: Time,
}

/// Owns the ordered segment list for one timeline.
///
/// Two macro-states: uninitialized (no video duration, every mutation
/// rejects) and active (duration set, invariants hold after every
/// successful operation). There is no way back to uninitialized; loading
/// a new video drops the store and builds a fresh one.
pub struct SegmentStore {
    config: TimelineConfig,
    video_duration: Option<Time>,
    segments: Vec<Segment>,
    next_id: SegmentId,
    subscribers: Vec<Sender<SegmentEvent>>,
}

impl SegmentStore {
    /// Create an uninitialized store with the given rules.
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            video_duration: None,
            segments: Vec::new(),
            next_id: 1,
            subscribers: Vec::new(),
        }
    }

    /// Subscribe to change notifications. Events are delivered to every
    /// subscriber in the order operations are invoked.
    pub fn subscribe(&mut self) -> Receiver<SegmentEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.video_duration.is_some()
    }

    pub fn video_duration(&self) -> Option<Time> {
        self.video_duration
    }

    /// The ordered segment list. Read-only; all mutation goes through the
    /// operations below.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Most segments this video can hold at the minimum length.
    pub fn max_segments(&self) -> usize {
        match self.video_duration {
            Some(duration) => (duration / self.config.min_segment_len) as usize,
            None => 0,
        }
    }

    /// Whether the "add chapter" control should be enabled.
    pub fn can_add_segment(&self) -> bool {
        self.is_initialized() && self.segments.len() < self.max_segments()
    }

    /// Export is only meaningful once the platform's minimum chapter
    /// count is reached.
    pub fn has_minimum_chapters(&self) -> bool {
        self.segments.len() >= self.config.min_segment_count
    }

    /// Bind the store to a video and create the initial chapter spanning
    /// the whole duration. The duration is floored to whole seconds and
    /// immutable afterwards.
    pub fn initialize(&mut self, video_duration_secs: f64) -> Result<(), StoreError> {
        if self.video_duration.is_some() {
            log::warn!("initialize called on an already-active timeline");
            return Err(StoreError::AlreadyInitialized);
        }

        let duration = crate::core::time::from_seconds_f64(video_duration_secs);
        let required = self.config.min_video_duration();
        if duration < required {
            log::warn!(
                "video duration {duration}s is less than minimum required {required}s"
            );
            return Err(StoreError::DurationTooShort { duration, required });
        }

        self.video_duration = Some(duration);
        let id = self.fresh_id();
        self.segments.push(Segment::new(id, "Intro", 0, duration));

        self.emit(SegmentEvent::Added {
            segments: self.segments.clone(),
        });
        self.debug_check_invariants();
        Ok(())
    }

    /// Add a chapter by splitting room off an existing one.
    ///
    /// Scans from the end for the last segment long enough to donate a
    /// minimum-length slice, shrinks it, shifts every later segment back
    /// by that slice, and places the new chapter at the very end of the
    /// video. Returns the new segment's id.
    ///
    /// When every segment is under twice the minimum there is nothing to
    /// split and the add is rejected; the count guard alone does not
    /// guarantee a donor exists (three segments of 12s/10s/18s in a 40s
    /// video are under the limit of four but none can donate).
    pub fn add_segment(&mut self) -> Result<SegmentId, StoreError> {
        let duration = self.video_duration.ok_or(StoreError::NotInitialized)?;
        let min_len = self.config.min_segment_len;

        let max = self.max_segments();
        if self.segments.len() >= max {
            log::warn!("max chapter limit ({max}) reached");
            return Err(StoreError::SegmentLimit { max });
        }

        let donor = self
            .segments
            .iter()
            .rposition(|segment| segment.duration() >= 2 * min_len);
        let Some(donor_index) = donor else {
            log::warn!("no segment long enough to split");
            return Err(StoreError::NoSplittableSegment);
        };

        let title = format!("Chapter {}", self.segments.len() + 1);

        self.segments[donor_index].end -= min_len;
        for segment in &mut self.segments[donor_index + 1..] {
            segment.start -= min_len;
            segment.end -= min_len;
        }

        let id = self.fresh_id();
        self.segments
            .push(Segment::new(id, title, duration - min_len, duration));

        self.emit(SegmentEvent::Added {
            segments: self.segments.clone(),
        });
        self.debug_check_invariants();
        Ok(id)
    }

    /// Move the start of a segment, which is equally the end of its left
    /// neighbor. Only those two segments are affected; the right neighbor
    /// does not constrain the move (its own range never changes).
    ///
    /// Any validation failure leaves the list untouched and returns the
    /// reason so the view can revert its displayed value.
    pub fn resize_boundary(
        &mut self,
        segment_id: SegmentId,
        new_start: Time,
    ) -> Result<(), StoreError> {
        let duration = self.video_duration.ok_or(StoreError::NotInitialized)?;
        let min_len = self.config.min_segment_len;

        let index = self
            .index_of(segment_id)
            .ok_or(StoreError::UnknownSegment(segment_id))?;

        if new_start > duration {
            log::debug!("rejected boundary move: {new_start}s is outside the video");
            return Err(StoreError::OutOfRange { time: new_start });
        }

        if index == 0 {
            if new_start == 0 {
                return Ok(());
            }
            log::debug!("rejected boundary move: first segment start is pinned");
            return Err(StoreError::FirstSegmentPinned);
        }

        let segment = &self.segments[index];
        let remaining = segment.end.checked_sub(new_start);
        if remaining.map_or(true, |len| len < min_len) {
            log::debug!(
                "rejected boundary move: segment {segment_id} would be shorter than {min_len}s"
            );
            return Err(StoreError::SegmentTooShort {
                id: segment_id,
                min: min_len,
            });
        }

        let left = &self.segments[index - 1];
        let left_id = left.id;
        let left_len = new_start.checked_sub(left.start);
        if left_len.map_or(true, |len| len < min_len) {
            log::debug!(
                "rejected boundary move: segment {left_id} would be shorter than {min_len}s"
            );
            return Err(StoreError::SegmentTooShort {
                id: left_id,
                min: min_len,
            });
        }

        self.segments[index - 1].end = new_start;
        self.segments[index].start = new_start;

        let left = self.segments[index - 1].clone();
        let current = self.segments[index].clone();
        self.emit(SegmentEvent::Updated { segment: left });
        self.emit(SegmentEvent::Updated { segment: current });
        self.debug_check_invariants();
        Ok(())
    }

    /// Delete a segment and let a neighbor absorb its range: the left
    /// neighbor bridges forward when both exist, otherwise the surviving
    /// neighbor is stretched back to the pinned edge.
    pub fn delete_segment(&mut self, segment_id: SegmentId) -> Result<(), StoreError> {
        let duration = self.video_duration.ok_or(StoreError::NotInitialized)?;

        let index = self
            .index_of(segment_id)
            .ok_or(StoreError::UnknownSegment(segment_id))?;
        if self.segments.len() <= 1 {
            log::warn!("cannot delete the only chapter");
            return Err(StoreError::OnlySegment);
        }

        let has_left = index > 0;
        let has_right = index + 1 < self.segments.len();
        match (has_left, has_right) {
            (true, true) => {
                let right_start = self.segments[index + 1].start;
                self.segments[index - 1].end = right_start;
            }
            (false, true) => {
                self.segments[index + 1].start = 0;
            }
            (true, false) => {
                self.segments[index - 1].end = duration;
            }
            // len > 1 guarantees at least one neighbor
            (false, false) => unreachable!(),
        }

        self.segments.remove(index);

        self.emit(SegmentEvent::Deleted {
            segments: self.segments.clone(),
        });
        self.debug_check_invariants();
        Ok(())
    }

    /// Rename a segment. Titles carry no invariant weight.
    pub fn retitle(&mut self, segment_id: SegmentId, title: &str) -> Result<(), StoreError> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }
        let index = self
            .index_of(segment_id)
            .ok_or(StoreError::UnknownSegment(segment_id))?;

        self.segments[index].title = title.to_owned();
        let segment = self.segments[index].clone();
        self.emit(SegmentEvent::Updated { segment });
        Ok(())
    }

    /// Which chapter is the playhead in? Boundaries are inclusive; a
    /// shared instant resolves to the earlier chapter.
    pub fn segment_containing(&self, time: Time) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.contains(time))
    }

    /// Replace the whole segment list from an external authoritative set
    /// (the visual timeline after a drag end, or an imported chapter
    /// list). Titles survive for ids that already exist; new ranges get
    /// default titles. The ranges are re-validated here even when the
    /// producer already checked them: the store is the source of truth.
    pub fn sync_from_external_ranges(
        &mut self,
        ranges: &[ExternalRange],
    ) -> Result<(), StoreError> {
        let duration = self.video_duration.ok_or(StoreError::NotInitialized)?;
        self.validate_ranges(ranges, duration)?;

        let mut rebuilt = Vec::with_capacity(ranges.len());
        for (position, range) in ranges.iter().enumerate() {
            let (id, existing_title) = match range.id {
                Some(id) => (
                    id,
                    self.segments
                        .iter()
                        .find(|segment| segment.id == id)
                        .map(|segment| segment.title.clone()),
                ),
                None => (self.fresh_id(), None),
            };

            let title = existing_title.unwrap_or_else(|| {
                if position == 0 {
                    "Intro".to_owned()
                } else {
                    format!("Chapter {}", position + 1)
                }
            });

            rebuilt.push(Segment::new(id, title, range.start, range.end));
        }

        self.segments = rebuilt;

        self.emit(SegmentEvent::Synced {
            segments: self.segments.clone(),
        });
        self.debug_check_invariants();
        Ok(())
    }

    fn validate_ranges(
        &self,
        ranges: &[ExternalRange],
        duration: Time,
    ) -> Result<(), StoreError> {
        let malformed = |reason: &'static str| {
            log::warn!("rejected external ranges: {reason}");
            Err(StoreError::MalformedRanges { reason })
        };

        let Some(first) = ranges.first() else {
            return malformed("empty range set");
        };
        if first.start != 0 {
            return malformed("first range does not start at 0");
        }
        if ranges.last().map(|range| range.end) != Some(duration) {
            return malformed("last range does not end at the video duration");
        }
        for pair in ranges.windows(2) {
            if pair[0].end != pair[1].start {
                return malformed("ranges are not contiguous");
            }
        }
        for range in ranges {
            let len = range.end.checked_sub(range.start);
            if len.map_or(true, |len| len < self.config.min_segment_len) {
                return malformed("a range is shorter than the minimum segment length");
            }
        }
        Ok(())
    }

    fn index_of(&self, segment_id: SegmentId) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| segment.id == segment_id)
    }

    fn fresh_id(&mut self) -> SegmentId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn emit(&mut self, event: SegmentEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Invariant violations past the validated operations above are
    /// programmer errors, not recoverable conditions.
    fn debug_check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            let Some(duration) = self.video_duration else {
                return;
            };
            assert!(!self.segments.is_empty());
            assert_eq!(self.segments[0].start, 0);
            assert_eq!(self.segments[self.segments.len() - 1].end, duration);
            for pair in self.segments.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            for segment in &self.segments {
                assert!(segment.end > segment.start);
                assert!(segment.duration() >= self.config.min_segment_len);
            }
        }
    }
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}
