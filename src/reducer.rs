use crate::barrier::PhaseBarrier;
use crate::index_table::{IndexTable, WordEntry};
use crate::splitter::letter_for;
use crate::NUM_LETTERS;
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info_span};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterOutput {
    pub letter: char,
    pub path: PathBuf,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLetter {
    pub letter: char,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReducerReport {
    pub worker: usize,
    pub letters: Range<usize>,
    pub written: Vec<LetterOutput>,
    pub failed: Vec<FailedLetter>,
}

/// Letters owned by reducer `reducer` out of `reducers`. Ranges of
/// consecutive reducers are adjacent and together cover all 26 letters;
/// with more than 26 reducers some ranges are empty.
pub fn letter_range(reducer: usize, reducers: usize) -> Range<usize> {
    let start = reducer * NUM_LETTERS / reducers;
    let end = ((reducer + 1) * NUM_LETTERS / reducers).min(NUM_LETTERS);
    start..end
}

/// Most widespread words first, ties broken alphabetically.
pub fn sort_entries(entries: &mut [WordEntry]) {
    entries.sort_by(|a, b| {
        b.file_ids
            .len()
            .cmp(&a.file_ids.len())
            .then_with(|| a.word.cmp(&b.word))
    });
}

/// `word:[1 2 3]`
pub fn format_entry(entry: &WordEntry) -> String {
    format!("{}:[{}]", entry.word, entry.file_ids.iter().join(" "))
}

pub fn output_path(output_dir: &Path, letter: usize) -> PathBuf {
    output_dir.join(format!("{}.txt", letter_for(letter)))
}

/// Create or truncate `path` and write one line per entry.
pub fn write_letter(path: &Path, entries: &[WordEntry]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for entry in entries {
        writeln!(writer, "{}", format_entry(entry))?;
    }
    writer.flush()
}

pub struct Reducer {
    worker: usize,
    reducers: usize,
    table: Arc<IndexTable>,
    barrier: Arc<PhaseBarrier>,
    output_dir: PathBuf,
}

impl Reducer {
    pub fn new(
        worker: usize,
        reducers: usize,
        table: Arc<IndexTable>,
        barrier: Arc<PhaseBarrier>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            worker,
            reducers,
            table,
            barrier,
            output_dir,
        }
    }

    /// Wait for every mapper, then emit the owned letters.
    pub fn run(&self) -> ReducerReport {
        let _span = info_span!("reducer", worker = self.worker).entered();
        self.barrier.arrival().wait();
        self.reduce()
    }

    /// Sort and write each owned letter. Must only run after the barrier.
    pub fn reduce(&self) -> ReducerReport {
        let letters = letter_range(self.worker, self.reducers);
        let mut report = ReducerReport {
            worker: self.worker,
            letters: letters.clone(),
            ..Default::default()
        };

        for letter in letters {
            let mut entries = self.table.bucket(letter).snapshot();
            sort_entries(&mut entries);

            let path = output_path(&self.output_dir, letter);
            match write_letter(&path, &entries) {
                Ok(()) => {
                    debug!(letter = %letter_for(letter), words = entries.len(), "letter written");
                    report.written.push(LetterOutput {
                        letter: letter_for(letter),
                        path,
                        words: entries.len(),
                    });
                }
                Err(e) => {
                    error!(letter = %letter_for(letter), path = %path.display(), error = %e, "cannot write output");
                    report.failed.push(FailedLetter {
                        letter: letter_for(letter),
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
