//! Parse YouTube chapter timestamp text into `(title, start)` pairs.
//!
//! The same minimum-length and ordering rules the store enforces are
//! validated here for early user feedback; the store re-checks them when
//! the parsed chapters are applied, since it is the source of truth.

use crate::core::store::{ExternalRange, SegmentStore, StoreError, TimelineConfig};
use crate::core::time::{format_timestamp, Time};

/// A chapter as it appears in the text format: a title and a start time.
/// End times are derived from the next chapter's start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChapter {
    pub title: String,
    pub start: Time,
}

/// Everything that can be wrong with a pasted chapter list. All findings
/// are collected and reported together rather than stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input cannot be empty")]
    EmptyInput,
    #[error("no valid chapters found")]
    NoChapters,
    #[error("line {line}: missing title (format: \"<timestamp> <title>\")")]
    MissingTitle { line: usize },
    #[error("line {line}: invalid timestamp {text:?} (use M:SS or H:MM:SS)")]
    InvalidTimestamp { line: usize, text: String },
    #[error("first chapter must start at 0:00")]
    FirstChapterNotAtZero,
    #[error("at least {required} chapters are required (found {found})")]
    TooFewChapters { required: usize, found: usize },
    #[error("chapters must be in time order: {previous:?} ({previous_start}) then {current:?} ({current_start})")]
    OutOfOrder {
        previous: String,
        previous_start: String,
        current: String,
        current_start: String,
    },
    #[error("chapter {title:?} is only {len}s long (minimum {min}s required)")]
    ChapterTooShort { title: String, len: Time, min: Time },
    #[error("last chapter starts at {start} but the video is only {duration} long")]
    StartBeyondDuration { start: String, duration: String },
}

/// Convert a timestamp string to seconds.
/// Supports `M:SS` (minutes unbounded) and `H:MM:SS`.
pub fn parse_timestamp(text: &str) -> Option<Time> {
    let parts: Result<Vec<Time>, _> = text.split(':').map(str::parse).collect();
    let parts = parts.ok()?;

    match parts[..] {
        [minutes, seconds] => {
            if seconds >= 60 {
                return None;
            }
            Some(minutes * 60 + seconds)
        }
        [hours, minutes, seconds] => {
            if minutes >= 60 || seconds >= 60 {
                return None;
            }
            Some(hours * 3_600 + minutes * 60 + seconds)
        }
        _ => None,
    }
}

/// Parse and validate a pasted chapter list.
///
/// Line format is `"<timestamp> <title>"`. After the line pass the chapter
/// rules are checked: first chapter at 0:00, at least
/// `config.min_segment_count` chapters, strictly ascending starts, every
/// chapter at least `config.min_segment_len` seconds, and (when the video
/// duration is known) the last chapter starting inside the video.
pub fn parse_chapters(
    input: &str,
    video_duration: Option<Time>,
    config: &TimelineConfig,
) -> Result<Vec<ParsedChapter>, Vec<ParseError>> {
    if input.trim().is_empty() {
        return Err(vec![ParseError::EmptyInput]);
    }

    let mut errors = Vec::new();
    let mut chapters = Vec::new();

    for (number, line) in input
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
    {
        let line_number = number + 1;
        let Some((timestamp, title)) = line.split_once(' ') else {
            errors.push(ParseError::MissingTitle { line: line_number });
            continue;
        };
        let title = title.trim();
        if title.is_empty() {
            errors.push(ParseError::MissingTitle { line: line_number });
            continue;
        }

        let Some(start) = parse_timestamp(timestamp) else {
            errors.push(ParseError::InvalidTimestamp {
                line: line_number,
                text: timestamp.to_owned(),
            });
            continue;
        };

        chapters.push(ParsedChapter {
            title: title.to_owned(),
            start,
        });
    }

    if chapters.is_empty() {
        if errors.is_empty() {
            errors.push(ParseError::NoChapters);
        }
        return Err(errors);
    }

    errors.extend(validate_chapter_rules(&chapters, video_duration, config));

    if errors.is_empty() {
        Ok(chapters)
    } else {
        Err(errors)
    }
}

fn validate_chapter_rules(
    chapters: &[ParsedChapter],
    video_duration: Option<Time>,
    config: &TimelineConfig,
) -> Vec<ParseError> {
    let mut errors = Vec::new();

    if chapters[0].start != 0 {
        errors.push(ParseError::FirstChapterNotAtZero);
    }

    if chapters.len() < config.min_segment_count {
        errors.push(ParseError::TooFewChapters {
            required: config.min_segment_count,
            found: chapters.len(),
        });
    }

    for pair in chapters.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        match next.start.checked_sub(current.start) {
            None | Some(0) => errors.push(ParseError::OutOfOrder {
                previous: current.title.clone(),
                previous_start: format_timestamp(current.start, false),
                current: next.title.clone(),
                current_start: format_timestamp(next.start, false),
            }),
            Some(len) if len < config.min_segment_len => {
                errors.push(ParseError::ChapterTooShort {
                    title: current.title.clone(),
                    len,
                    min: config.min_segment_len,
                });
            }
            Some(_) => {}
        }
    }

    if let Some(duration) = video_duration {
        let last = &chapters[chapters.len() - 1];
        if last.start >= duration {
            errors.push(ParseError::StartBeyondDuration {
                start: format_timestamp(last.start, false),
                duration: format_timestamp(duration, false),
            });
        }
    }

    errors
}

/// Synthesize end times (the next chapter's start, or the video duration
/// for the last) and turn parsed chapters into external ranges.
pub fn to_external_ranges(chapters: &[ParsedChapter], video_duration: Time) -> Vec<ExternalRange> {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| ExternalRange {
            id: None,
            start: chapter.start,
            end: chapters
                .get(index + 1)
                .map_or(video_duration, |next| next.start),
        })
        .collect()
}

/// Replace the store's timeline with a parsed chapter list.
///
/// The sync path only preserves titles for ids it already knows, and
/// imported ranges are all new, so the parsed titles are applied by
/// position afterwards.
pub fn import_chapters(
    store: &mut SegmentStore,
    chapters: &[ParsedChapter],
) -> Result<(), StoreError> {
    let duration = store.video_duration().ok_or(StoreError::NotInitialized)?;

    let ranges = to_external_ranges(chapters, duration);
    store.sync_from_external_ranges(&ranges)?;

    let ids: Vec<_> = store.segments().iter().map(|segment| segment.id).collect();
    for (id, chapter) in ids.into_iter().zip(chapters) {
        store.retitle(id, &chapter.title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TimelineConfig {
        TimelineConfig::default()
    }

    #[test]
    fn test_parse_timestamp_minutes_seconds() {
        assert_eq!(parse_timestamp("1:23"), Some(83));
        assert_eq!(parse_timestamp("0:00"), Some(0));
        // Minutes are unbounded in the two-part form.
        assert_eq!(parse_timestamp("90:00"), Some(5_400));
    }

    #[test]
    fn test_parse_timestamp_hours() {
        assert_eq!(parse_timestamp("1:23:45"), Some(5_025));
        assert_eq!(parse_timestamp("0:01:23"), Some(83));
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        assert_eq!(parse_timestamp("1:60"), None);
        assert_eq!(parse_timestamp("1:60:00"), None);
        assert_eq!(parse_timestamp("1:00:60"), None);
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
        assert_eq!(parse_timestamp("12"), None);
    }

    #[test]
    fn test_parse_valid_chapter_list() {
        let input = "0:00 Intro\n0:45 Setup\n2:00 Results\n";
        let chapters = parse_chapters(input, Some(300), &config()).unwrap();

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0], ParsedChapter { title: "Intro".into(), start: 0 });
        assert_eq!(chapters[1], ParsedChapter { title: "Setup".into(), start: 45 });
        assert_eq!(chapters[2], ParsedChapter { title: "Results".into(), start: 120 });
    }

    #[test]
    fn test_parse_keeps_spaces_inside_titles() {
        let input = "0:00 The very long intro\n0:30 Part two\n1:00 The end";
        let chapters = parse_chapters(input, Some(120), &config()).unwrap();
        assert_eq!(chapters[0].title, "The very long intro");
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(
            parse_chapters("   \n  ", None, &config()),
            Err(vec![ParseError::EmptyInput])
        );
    }

    #[test]
    fn test_parse_collects_line_errors_with_numbers() {
        let input = "0:00 Intro\nnonsense\n1:99 Broken\n2:00 Fine";
        let errors = parse_chapters(input, Some(300), &config()).unwrap_err();

        assert!(errors.contains(&ParseError::MissingTitle { line: 2 }));
        assert!(errors.contains(&ParseError::InvalidTimestamp {
            line: 3,
            text: "1:99".into()
        }));
    }

    #[test]
    fn test_parse_rejects_first_chapter_not_at_zero() {
        let input = "0:05 Intro\n0:30 Middle\n1:00 End";
        let errors = parse_chapters(input, Some(120), &config()).unwrap_err();
        assert!(errors.contains(&ParseError::FirstChapterNotAtZero));
    }

    #[test]
    fn test_parse_rejects_too_few_chapters() {
        let input = "0:00 Intro\n0:30 End";
        let errors = parse_chapters(input, Some(120), &config()).unwrap_err();
        assert!(errors.contains(&ParseError::TooFewChapters {
            required: 3,
            found: 2
        }));
    }

    #[test]
    fn test_parse_rejects_out_of_order() {
        let input = "0:00 Intro\n1:00 Later\n0:30 Earlier";
        let errors = parse_chapters(input, Some(300), &config()).unwrap_err();
        assert!(errors
            .iter()
            .any(|error| matches!(error, ParseError::OutOfOrder { .. })));
    }

    #[test]
    fn test_parse_rejects_short_chapter() {
        let input = "0:00 Intro\n0:05 Rushed\n0:30 End";
        let errors = parse_chapters(input, Some(120), &config()).unwrap_err();
        assert!(errors.contains(&ParseError::ChapterTooShort {
            title: "Intro".into(),
            len: 5,
            min: 10
        }));
    }

    #[test]
    fn test_parse_rejects_start_beyond_duration() {
        let input = "0:00 Intro\n0:30 Middle\n2:30 Past the end";
        let errors = parse_chapters(input, Some(120), &config()).unwrap_err();
        assert!(errors
            .iter()
            .any(|error| matches!(error, ParseError::StartBeyondDuration { .. })));
    }

    #[test]
    fn test_to_external_ranges_synthesizes_ends() {
        let chapters = [
            ParsedChapter { title: "A".into(), start: 0 },
            ParsedChapter { title: "B".into(), start: 40 },
            ParsedChapter { title: "C".into(), start: 90 },
        ];

        let ranges = to_external_ranges(&chapters, 120);
        assert_eq!(
            ranges,
            vec![
                ExternalRange { id: None, start: 0, end: 40 },
                ExternalRange { id: None, start: 40, end: 90 },
                ExternalRange { id: None, start: 90, end: 120 },
            ]
        );
    }

    #[test]
    fn test_import_chapters_applies_titles_and_ranges() {
        let mut store = SegmentStore::default();
        store.initialize(120.0).unwrap();

        let chapters = [
            ParsedChapter { title: "Opening".into(), start: 0 },
            ParsedChapter { title: "Act two".into(), start: 40 },
            ParsedChapter { title: "Credits".into(), start: 90 },
        ];
        import_chapters(&mut store, &chapters).unwrap();

        let rendered: Vec<(&str, Time, Time)> = store
            .segments()
            .iter()
            .map(|segment| (segment.title.as_str(), segment.start, segment.end))
            .collect();
        assert_eq!(
            rendered,
            vec![("Opening", 0, 40), ("Act two", 40, 90), ("Credits", 90, 120)]
        );
    }

    #[test]
    fn test_import_rejects_chapters_violating_store_rules() {
        let mut store = SegmentStore::default();
        store.initialize(120.0).unwrap();
        let before: Vec<_> = store.segments().to_vec();

        // 115..120 is shorter than the minimum segment length.
        let chapters = [
            ParsedChapter { title: "A".into(), start: 0 },
            ParsedChapter { title: "B".into(), start: 115 },
        ];
        assert!(import_chapters(&mut store, &chapters).is_err());
        assert_eq!(store.segments(), before.as_slice());
    }
}
