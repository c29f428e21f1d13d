use crate::IndexError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One input file: its position in the manifest and its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub id: usize,
    pub path: PathBuf,
}

impl FileRecord {
    /// The 1-based identifier written to the output files.
    pub fn number(&self) -> usize {
        self.id + 1
    }
}

/// The file list: a count `N` followed by `N` whitespace separated paths.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    files: Vec<FileRecord>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = fs::read_to_string(path).map_err(|e| {
            IndexError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, IndexError> {
        let mut tokens = text.split_whitespace();
        let count_token = tokens
            .next()
            .ok_or_else(|| IndexError::Manifest("empty manifest".to_string()))?;
        let count: usize = count_token.parse().map_err(|_| {
            IndexError::Manifest(format!("invalid file count '{}'", count_token))
        })?;

        let files = (0..count)
            .map(|id| {
                tokens
                    .next()
                    .map(|path| FileRecord {
                        id,
                        path: PathBuf::from(path),
                    })
                    .ok_or_else(|| {
                        IndexError::Manifest(format!(
                            "expected {} paths, found {}",
                            count, id
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { files })
    }

    pub fn from_paths<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        let files = paths
            .into_iter()
            .enumerate()
            .map(|(id, path)| FileRecord {
                id,
                path: path.into(),
            })
            .collect();
        Self { files }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn get(&self, id: usize) -> Option<&FileRecord> {
        self.files.get(id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
