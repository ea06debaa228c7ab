// ---------------------------------------------------------------------------
// line_editor: rustyline wrapper for the proseweave REPL
// ---------------------------------------------------------------------------
//
// Emacs keybindings and arrow-key history. Entered fragments are
// remembered across sessions in ~/.proseweave_history (max 500 entries).

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::{Path, PathBuf};

use crate::types::Result;

const MAX_HISTORY: usize = 500;

const HISTORY_FILE: &str = ".proseweave_history";

/// Result of a single line read.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    Line(String),
    /// Ctrl-C.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
}

pub struct LineEditor {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    /// Editor with history in the user's home directory.
    pub fn new() -> Result<Self> {
        Self::with_history(home_dir().map(|home| home.join(HISTORY_FILE)))
    }

    /// Editor with history at `path`, or none. A missing or unreadable
    /// history file just means an empty history.
    pub fn with_history(history_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .max_history_size(MAX_HISTORY)?
            .auto_add_history(false)
            .build();
        let mut editor = DefaultEditor::with_config(config)?;

        if let Some(path) = history_path.as_deref() {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(path = %path.display(), error = %e, "no history loaded");
            }
        }

        Ok(LineEditor { editor, history_path })
    }

    pub fn read_line(&mut self, prompt: &str) -> ReadResult {
        match self.editor.readline(prompt) {
            Ok(line) => ReadResult::Line(line),
            Err(ReadlineError::Interrupted) => ReadResult::Interrupted,
            Err(ReadlineError::Eof) => ReadResult::Eof,
            Err(e) => {
                tracing::warn!(error = %e, "readline failed");
                ReadResult::Eof
            }
        }
    }

    /// Remember a fragment and persist the history. Write failures are
    /// logged, not returned.
    pub fn add_history(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let _ = self.editor.add_history_entry(line);
        if let Some(path) = self.history_path.clone() {
            self.save_history(&path);
        }
    }

    fn save_history(&mut self, path: &Path) {
        if let Err(e) = self.editor.save_history(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not save history");
        }
    }

    pub fn history_path(&self) -> Option<&Path> {
        self.history_path.as_deref()
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_history_file_name() {
        if let Some(home) = home_dir() {
            let editor = LineEditor::new().expect("editor should build");
            assert_eq!(editor.history_path(), Some(home.join(HISTORY_FILE).as_path()));
        }
    }

    #[test]
    fn test_history_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut editor = LineEditor::with_history(Some(path.clone())).unwrap();
        editor.add_history("the dog");
        editor.add_history("   ");
        editor.add_history("barked");

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("the dog"));
        assert!(saved.contains("barked"));
        assert_eq!(saved.lines().filter(|l| l.trim().is_empty()).count(), 0, "blank lines are not remembered");
    }

    #[test]
    fn test_corrupt_history_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, b"\xff\xfe\x00\x01garbage\n\x80\x90").unwrap();
        assert!(LineEditor::with_history(Some(path)).is_ok());
    }

    #[test]
    fn test_without_history() {
        let mut editor = LineEditor::with_history(None).unwrap();
        editor.add_history("kept in memory only");
        assert!(editor.history_path().is_none());
    }
}
