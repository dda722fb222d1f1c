//! Question file reading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ReaderError;

/// File extensions holding raw question text.
pub const QUESTION_EXTENSIONS: &[&str] = &["txt", "qtxt"];

const MAX_DEPTH: usize = 8;

/// Reader for raw question files.
pub struct QuestionReader;

impl QuestionReader {
    /// Read a question file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<String, ReaderError> {
        let path = path.as_ref();
        debug!("Reading questions from {:?}", path);

        fs::read_to_string(path).map_err(|source| ReaderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve a path to the question files it names.
    ///
    /// A file is returned as-is whatever its extension. A directory is
    /// walked for files with a [`QUESTION_EXTENSIONS`] extension, sorted by
    /// path.
    pub fn collect_files(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, ReaderError> {
        let path = path.as_ref();

        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(ReaderError::NotFound(path.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).max_depth(MAX_DEPTH).sort_by_file_name() {
            let entry = entry?;
            let file = entry.path();
            if file.is_file() && Self::is_question_file(file) {
                files.push(file.to_path_buf());
            }
        }

        debug!("Found {} question files under {:?}", files.len(), path);
        Ok(files)
    }

    fn is_question_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| QUESTION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }
}
