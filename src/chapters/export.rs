//! Render the segment list as YouTube chapter timestamp text.

use crate::core::segment::Segment;
use crate::core::time::{constants, format_timestamp, Time};

/// Format one line per segment as `"<timestamp> <title>"`.
///
/// Hour padding is forced for every line once the video itself is an hour
/// or longer; the destination platform requires a consistent timestamp
/// width as soon as any entry needs an hours field.
pub fn export_chapters(segments: &[Segment], video_duration: Time) -> String {
    let force_hours = video_duration >= constants::SECONDS_PER_HOUR;

    let mut out = String::new();
    for segment in segments {
        out.push_str(&format_timestamp(segment.start, force_hours));
        out.push(' ');
        out.push_str(&segment.title);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u64, title: &str, start: Time, end: Time) -> Segment {
        Segment::new(id, title, start, end)
    }

    #[test]
    fn test_export_short_video() {
        let segments = [
            segment(1, "Intro", 0, 60),
            segment(2, "Setup", 60, 185),
            segment(3, "Wrap up", 185, 300),
        ];

        assert_eq!(
            export_chapters(&segments, 300),
            "0:00 Intro\n1:00 Setup\n3:05 Wrap up\n"
        );
    }

    #[test]
    fn test_export_forces_hours_for_long_video() {
        let segments = [
            segment(1, "Intro", 0, 1_800),
            segment(2, "Deep dive", 1_800, 3_660),
            segment(3, "Outro", 3_660, 4_000),
        ];

        assert_eq!(
            export_chapters(&segments, 4_000),
            "0:00:00 Intro\n0:30:00 Deep dive\n1:01:00 Outro\n"
        );
    }

    #[test]
    fn test_export_roundtrips_through_parser() {
        use crate::chapters::parser::parse_chapters;
        use crate::core::store::TimelineConfig;

        let segments = [
            segment(1, "Intro", 0, 45),
            segment(2, "Chapter 2", 45, 120),
            segment(3, "Final thoughts", 120, 200),
        ];

        let text = export_chapters(&segments, 200);
        let parsed = parse_chapters(&text, Some(200), &TimelineConfig::default()).unwrap();

        let pairs: Vec<(&str, Time)> = parsed
            .iter()
            .map(|chapter| (chapter.title.as_str(), chapter.start))
            .collect();
        assert_eq!(
            pairs,
            vec![("Intro", 0), ("Chapter 2", 45), ("Final thoughts", 120)]
        );
    }
}
