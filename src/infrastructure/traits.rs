//! I/O boundary traits for testability
//!
//! These traits abstract the collaborators the course builder needs from
//! its surroundings, allowing services to be tested with mock implementations.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

/// Turns a user-selected file into a locally resolvable reference.
pub trait PayloadResolver: Send + Sync {
    /// Create a reference for the file.
    fn resolve(&self, file: &Path) -> io::Result<String>;

    /// Release a reference created by [`PayloadResolver::resolve`].
    /// Returns false for references this resolver does not know.
    fn release(&self, reference: &str) -> bool;
}

/// Interactive prompt abstraction.
pub trait Prompter: Send + Sync {
    /// Ask for a line of text.
    /// Returns None if the user cancels (end of input). An empty answer is
    /// an empty string, not a cancellation.
    fn prompt(&self, message: &str) -> io::Result<Option<String>>;

    /// Show a message that needs no answer.
    fn alert(&self, message: &str);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// In-process registry of blob handles, one fresh handle per resolved file.
///
/// Handles stay registered until released; the service releases the
/// handles of resources it deletes.
#[derive(Debug)]
pub struct BlobRegistry {
    scheme: String,
    handles: Mutex<HashMap<String, PathBuf>>,
}

impl Default for BlobRegistry {
    fn default() -> Self {
        Self::new("blob")
    }
}

impl BlobRegistry {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// File a live handle points to.
    pub fn path_of(&self, reference: &str) -> Option<PathBuf> {
        self.lock().get(reference).cloned()
    }

    /// Number of handles not yet released.
    pub fn live_handles(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PathBuf>> {
        // A poisoned map is still a consistent map of handles.
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PayloadResolver for BlobRegistry {
    fn resolve(&self, file: &Path) -> io::Result<String> {
        if !file.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a readable file: {}", file.display()),
            ));
        }
        let path = file.canonicalize()?;
        let reference = format!("{}:{}", self.scheme, uuid::Uuid::new_v4());
        debug!("resolve: {} -> {}", path.display(), reference);
        self.lock().insert(reference.clone(), path);
        Ok(reference)
    }

    fn release(&self, reference: &str) -> bool {
        let released = self.lock().remove(reference).is_some();
        if released {
            debug!("release: {}", reference);
        }
        released
    }
}

/// One answer line without its line ending. None at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Prompter reading answers from stdin and writing to stdout.
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn prompt(&self, message: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{message} ")?;
        stdout.flush()?;

        read_answer(&mut io::stdin().lock())
    }

    fn alert(&self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_existing_file_when_resolving_twice_then_handles_differ() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("slides.pdf");
        std::fs::write(&file, b"%PDF-1.7").unwrap();
        let registry = BlobRegistry::default();

        let first = registry.resolve(&file).unwrap();
        let second = registry.resolve(&file).unwrap();

        assert!(first.starts_with("blob:"));
        assert_ne!(first, second);
        assert_eq!(registry.live_handles(), 2);
        assert_eq!(registry.path_of(&first), Some(file.canonicalize().unwrap()));
    }

    #[test]
    fn given_missing_file_when_resolving_then_not_found() {
        let registry = BlobRegistry::new("obj");
        let err = registry
            .resolve(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn given_handle_when_released_then_second_release_is_false() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("pic.png");
        std::fs::write(&file, b"png").unwrap();
        let registry = BlobRegistry::new("obj");
        let handle = registry.resolve(&file).unwrap();

        assert!(handle.starts_with("obj:"));
        assert!(registry.release(&handle));
        assert!(!registry.release(&handle));
        assert_eq!(registry.live_handles(), 0);
    }

    #[test]
    fn given_answer_lines_when_reading_then_empty_line_is_empty_and_eof_cancels() {
        let mut input = io::Cursor::new("New Title\r\n\n");

        assert_eq!(read_answer(&mut input).unwrap(), Some("New Title".into()));
        assert_eq!(read_answer(&mut input).unwrap(), Some(String::new()));
        assert_eq!(read_answer(&mut input).unwrap(), None);
    }
}
