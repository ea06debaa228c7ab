pub mod types;
pub mod nl;
pub mod weave;
pub mod document;
pub mod report;
pub mod ui;
pub mod line_editor;
