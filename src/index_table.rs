use crate::NUM_LETTERS;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A word and the ascending, de-duplicated 1-based ids of the files it occurs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub file_ids: Vec<usize>,
}

impl WordEntry {
    pub fn new(word: String) -> Self {
        Self {
            word,
            file_ids: Vec::new(),
        }
    }

    /// Sorted insert; returns false if the id was already present.
    pub fn insert_file(&mut self, file_id: usize) -> bool {
        match self.file_ids.binary_search(&file_id) {
            Ok(_) => false,
            Err(pos) => {
                self.file_ids.insert(pos, file_id);
                true
            }
        }
    }
}

#[derive(Default)]
pub struct IndexBucket {
    table: Mutex<FxHashMap<String, WordEntry>>,
}

impl IndexBucket {
    fn guard(&self) -> MutexGuard<'_, FxHashMap<String, WordEntry>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, word: &str, file_id: usize) {
        let mut table = self.guard();
        match table.get_mut(word) {
            Some(entry) => {
                entry.insert_file(file_id);
            }
            None => {
                let mut entry = WordEntry::new(word.to_string());
                entry.insert_file(file_id);
                table.insert(word.to_string(), entry);
            }
        }
    }

    /// Copy of every entry, taken under the lock. Order is unspecified.
    pub fn snapshot(&self) -> Vec<WordEntry> {
        self.guard().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

/// 26 independently locked buckets, one per starting letter.
pub struct IndexTable {
    buckets: Vec<IndexBucket>,
}

impl IndexTable {
    pub fn new() -> Self {
        Self {
            buckets: (0..NUM_LETTERS).map(|_| IndexBucket::default()).collect(),
        }
    }

    pub fn bucket(&self, letter: usize) -> &IndexBucket {
        &self.buckets[letter]
    }

    pub fn add(&self, letter: usize, word: &str, file_id: usize) {
        self.buckets[letter].add(word, file_id);
    }

    pub fn word_count(&self) -> usize {
        self.buckets.iter().map(IndexBucket::len).sum()
    }
}

impl Default for IndexTable {
    fn default() -> Self {
        Self::new()
    }
}
