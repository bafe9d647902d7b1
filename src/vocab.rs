use std::{collections::HashSet, fs, path::Path, sync::Arc};

use tracing::instrument;

use crate::error::{DataLoadError, InsufficientDataError};

/// Number of options shown for every quiz question.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    term: String,
    translation: String,
}

impl VocabEntry {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}

/// The word list, loaded once and shared read-only between sessions.
///
/// Entry indices are stable for the lifetime of the process, so they are
/// safe to hand out in callback data.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Arc<[VocabEntry]>,
}

impl Vocabulary {
    pub fn new(entries: Vec<VocabEntry>) -> Result<Self, DataLoadError> {
        if entries.is_empty() {
            return Err(DataLoadError::Empty);
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    #[instrument(level = "info")]
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let content = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Self::parse(&content)?;
        tracing::info!("Loaded {} words from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// Parses `term,translation` rows. Blank lines are skipped, anything else
    /// that isn't exactly two non-empty fields is rejected.
    pub fn parse(content: &str) -> Result<Self, DataLoadError> {
        let mut entries = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields.as_slice() {
                [term, translation] if !term.is_empty() && !translation.is_empty() => {
                    entries.push(VocabEntry::new(*term, *translation));
                }
                _ => {
                    return Err(DataLoadError::MalformedRow {
                        line: idx + 1,
                        content: line.to_owned(),
                    })
                }
            }
        }

        Self::new(entries)
    }

    /// Checks that a quiz question can always be built from this vocabulary.
    pub fn ensure_quizzable(&self) -> Result<(), InsufficientDataError> {
        let available = self.distinct_translations();
        if available < OPTION_COUNT {
            return Err(InsufficientDataError {
                required: OPTION_COUNT,
                available,
            });
        }
        Ok(())
    }

    pub fn distinct_translations(&self) -> usize {
        self.entries
            .iter()
            .map(VocabEntry::translation)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn get(&self, idx: usize) -> Option<&VocabEntry> {
        self.entries.get(idx)
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_rows() {
        let vocab = Vocabulary::parse("물, water\n\n  불 ,fire  \n").unwrap();

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get(0), Some(&VocabEntry::new("물", "water")));
        assert_eq!(vocab.get(1), Some(&VocabEntry::new("불", "fire")));
    }

    #[test]
    fn rejects_row_with_extra_field() {
        let err = Vocabulary::parse("물,water\n산,mountain,hill\n").unwrap_err();

        match err {
            DataLoadError::MalformedRow { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "산,mountain,hill");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_row_with_empty_field() {
        assert!(matches!(
            Vocabulary::parse("물,\n"),
            Err(DataLoadError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_empty_list() {
        assert!(matches!(
            Vocabulary::parse("\n  \n"),
            Err(DataLoadError::Empty)
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("hangulcardbot-missing-words.txt");
        let _ = fs::remove_file(&path);

        assert!(matches!(
            Vocabulary::load(&path),
            Err(DataLoadError::Io { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!(
            "hangulcardbot-words-{}.txt",
            std::process::id()
        ));
        fs::write(&path, "물,water\n불,fire\n").unwrap();

        let vocab = Vocabulary::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.entries()[1].term(), "불");
    }

    #[test]
    fn quiz_needs_four_distinct_translations() {
        let vocab = Vocabulary::parse("물,water\n불,fire\n산,mountain\n강,water\n").unwrap();

        let err = vocab.ensure_quizzable().unwrap_err();
        assert_eq!(err.required, 4);
        assert_eq!(err.available, 3);

        let vocab = Vocabulary::parse("물,water\n불,fire\n산,mountain\n강,river\n").unwrap();
        assert!(vocab.ensure_quizzable().is_ok());
    }
}
