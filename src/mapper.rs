use crate::barrier::PhaseBarrier;
use crate::index_table::IndexTable;
use crate::manifest::{FileRecord, Manifest};
use crate::splitter::{Splitter, letter_index};
use crate::work_queue::WorkQueue;
use crate::NUM_LETTERS;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info_span, warn};

/// Thread-private word counts, one map per starting letter.
pub type LocalCounts = Vec<FxHashMap<String, usize>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub id: usize,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MapperReport {
    pub worker: usize,
    /// 0-based ids of the files this mapper merged into the table.
    pub indexed: Vec<usize>,
    pub skipped: Vec<SkippedFile>,
    pub distinct_words: usize,
}

/// Count the normalized words of one file, grouped by bucket.
pub fn count_words(splitter: &Splitter, text: &[u8]) -> LocalCounts {
    let mut counts: LocalCounts = (0..NUM_LETTERS).map(|_| FxHashMap::default()).collect();
    for word in splitter.words(text) {
        if let Some(letter) = letter_index(&word) {
            *counts[letter].entry(word).or_insert(0) += 1;
        }
    }
    counts
}

pub struct Mapper {
    worker: usize,
    queue: Arc<WorkQueue>,
    manifest: Arc<Manifest>,
    table: Arc<IndexTable>,
    barrier: Arc<PhaseBarrier>,
    splitter: Splitter,
}

impl Mapper {
    pub fn new(
        worker: usize,
        queue: Arc<WorkQueue>,
        manifest: Arc<Manifest>,
        table: Arc<IndexTable>,
        barrier: Arc<PhaseBarrier>,
    ) -> Self {
        Self {
            worker,
            queue,
            manifest,
            table,
            barrier,
            splitter: Splitter::new(),
        }
    }

    /// Drain the queue, then wait at the barrier. Never does reduction work.
    pub fn run(&self) -> MapperReport {
        let _span = info_span!("mapper", worker = self.worker).entered();
        let arrival = self.barrier.arrival();
        let report = self.drain();
        debug!(
            indexed = report.indexed.len(),
            skipped = report.skipped.len(),
            "queue drained, waiting for reducers"
        );
        arrival.wait();
        report
    }

    /// Pull file ids until the queue is empty, merging each file into the table.
    pub fn drain(&self) -> MapperReport {
        let mut report = MapperReport {
            worker: self.worker,
            ..Default::default()
        };

        while let Some(id) = self.queue.try_dequeue() {
            let Some(record) = self.manifest.get(id) else {
                warn!(file_id = id, "queued id has no manifest entry");
                continue;
            };
            match self.map_file(record) {
                Ok(words) => {
                    report.indexed.push(id);
                    report.distinct_words += words;
                }
                Err(e) => {
                    warn!(file_id = id, path = %record.path.display(), error = %e, "skipping unreadable file");
                    report.skipped.push(SkippedFile {
                        id,
                        path: record.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Index one file. Returns the number of distinct words merged.
    pub fn map_file(&self, record: &FileRecord) -> std::io::Result<usize> {
        let text = fs::read(&record.path)?;
        let counts = count_words(&self.splitter, &text);
        let file_number = record.number();

        let mut merged = 0;
        for (letter, words) in counts.iter().enumerate() {
            for word in words.keys() {
                self.table.add(letter, word, file_number);
                merged += 1;
            }
        }

        debug!(file_id = record.id, words = merged, "file merged");
        Ok(merged)
    }
}
