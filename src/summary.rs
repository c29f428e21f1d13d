use crate::IndexError;
use crate::mapper::{MapperReport, SkippedFile};
use crate::reducer::{FailedLetter, LetterOutput, ReducerReport};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// What a run did, collected from every worker after the join.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub mappers: usize,
    pub reducers: usize,
    pub files_total: usize,
    pub files_indexed: usize,
    pub words_indexed: usize,
    pub skipped: Vec<SkippedFile>,
    pub written: Vec<LetterOutput>,
    pub failed: Vec<FailedLetter>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(mappers: usize, reducers: usize, files_total: usize) -> Self {
        Self {
            mappers,
            reducers,
            files_total,
            ..Default::default()
        }
    }

    pub fn add_mapper(&mut self, report: MapperReport) {
        self.files_indexed += report.indexed.len();
        self.skipped.extend(report.skipped);
        self.skipped.sort_by_key(|s| s.id);
    }

    pub fn add_reducer(&mut self, report: ReducerReport) {
        self.words_indexed += report.written.iter().map(|w| w.words).sum::<usize>();
        self.written.extend(report.written);
        self.written.sort_by_key(|w| w.letter);
        self.failed.extend(report.failed);
        self.failed.sort_by_key(|f| f.letter);
    }

    /// True when every file was indexed and every letter written.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    pub fn write_json(&self, path: &Path) -> Result<(), IndexError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn print(&self) {
        println!("[windex] ===== RUN SUMMARY =====");
        println!("[windex] Workers: {} mappers, {} reducers", self.mappers, self.reducers);
        println!("[windex] Files indexed: {}/{}", self.files_indexed, self.files_total);
        println!("[windex] Words written: {}", self.words_indexed);
        println!("[windex] Letters written: {}/26", self.written.len());
        for skipped in &self.skipped {
            println!(
                "[windex] Skipped file {} ({}): {}",
                skipped.id + 1,
                skipped.path.display(),
                skipped.reason
            );
        }
        for failed in &self.failed {
            println!(
                "[windex] Failed letter '{}' ({}): {}",
                failed.letter,
                failed.path.display(),
                failed.reason
            );
        }
        println!("[windex] Elapsed: {} ms", self.elapsed_ms);
        println!("[windex] =======================");
    }
}
