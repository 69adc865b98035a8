//! Chapter text exchange: exporting the timeline as YouTube-style chapter
//! timestamps and parsing such text back into chapters.

pub mod export;
pub mod parser;

pub use export::export_chapters;
pub use parser::{import_chapters, parse_chapters, ParseError, ParsedChapter};
