use crate::IndexError;
use std::path::PathBuf;

/// Settings for one indexing run
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub mappers: usize,
    pub reducers: usize,
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
}

impl IndexConfig {
    /// Output goes to the working directory unless overridden
    pub fn new(mappers: usize, reducers: usize, manifest: impl Into<PathBuf>) -> Self {
        Self {
            mappers,
            reducers,
            manifest: manifest.into(),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Size of the phase barrier cohort
    pub fn participants(&self) -> usize {
        self.mappers + self.reducers
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.mappers == 0 {
            return Err(IndexError::Config("mapper count must be at least 1".to_string()));
        }
        if self.reducers == 0 {
            return Err(IndexError::Config("reducer count must be at least 1".to_string()));
        }
        Ok(())
    }
}
