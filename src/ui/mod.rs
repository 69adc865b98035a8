//! Presentational surfaces: the application shell, the list-style
//! chapter editor, the draggable timeline strip, and the
//! hours/minutes/seconds input widget.

pub mod app;
pub mod hms_input;
pub mod list_editor;
pub mod timeline_view;

pub use app::EditorApp;
pub use hms_input::HmsInput;
pub use list_editor::ListEditor;
pub use timeline_view::{DragCommit, HandleSide, TimelineView};
