use crate::barrier::PhaseBarrier;
use crate::config::IndexConfig;
use crate::index_table::IndexTable;
use crate::manifest::Manifest;
use crate::mapper::{Mapper, MapperReport};
use crate::reducer::{Reducer, ReducerReport};
use crate::summary::RunSummary;
use crate::work_queue::WorkQueue;
use crate::IndexError;
use std::fs;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{error, info};

/// Load the manifest named by `config` and index it.
///
/// Everything that can fail the whole run (bad worker counts, unreadable or
/// malformed manifest, missing output directory) is checked here, before any
/// worker thread exists.
pub fn run(config: &IndexConfig) -> Result<RunSummary, IndexError> {
    config.validate()?;
    let manifest = Manifest::load(&config.manifest)?;
    info!(manifest = %config.manifest.display(), files = manifest.len(), "manifest loaded");
    run_manifest(config, manifest)
}

/// Index an already loaded manifest with `config.mappers` mappers and
/// `config.reducers` reducers, writing the 26 letter files to
/// `config.output_dir`.
pub fn run_manifest(config: &IndexConfig, manifest: Manifest) -> Result<RunSummary, IndexError> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir).map_err(|e| {
        IndexError::Config(format!(
            "cannot create output directory {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    let start = Instant::now();
    let mut summary = RunSummary::new(config.mappers, config.reducers, manifest.len());

    let manifest = Arc::new(manifest);
    let queue = Arc::new(WorkQueue::from_ids(0..manifest.len()));
    let table = Arc::new(IndexTable::new());
    let barrier = Arc::new(PhaseBarrier::new(config.participants()));

    info!(
        mappers = config.mappers,
        reducers = config.reducers,
        files = manifest.len(),
        "starting workers"
    );

    let mut mappers: Vec<JoinHandle<MapperReport>> = Vec::with_capacity(config.mappers);
    let mut reducers: Vec<JoinHandle<ReducerReport>> = Vec::with_capacity(config.reducers);
    let mut spawn_error = None;

    for worker in 0..config.mappers {
        let mapper = Mapper::new(
            worker,
            queue.clone(),
            manifest.clone(),
            table.clone(),
            barrier.clone(),
        );
        match thread::Builder::new()
            .name(format!("mapper-{}", worker))
            .spawn(move || mapper.run())
        {
            Ok(handle) => mappers.push(handle),
            Err(e) => {
                spawn_error = Some(e);
                break;
            }
        }
    }

    if spawn_error.is_none() {
        for worker in 0..config.reducers {
            let reducer = Reducer::new(
                worker,
                config.reducers,
                table.clone(),
                barrier.clone(),
                config.output_dir.clone(),
            );
            match thread::Builder::new()
                .name(format!("reducer-{}", worker))
                .spawn(move || reducer.run())
            {
                Ok(handle) => reducers.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }
    }

    if let Some(e) = &spawn_error {
        let spawned = mappers.len() + reducers.len();
        error!(spawned, error = %e, "worker spawn failed, releasing barrier");
        barrier.forfeit(config.participants() - spawned);
    }

    let mut panicked = 0;
    for handle in mappers {
        match handle.join() {
            Ok(report) => summary.add_mapper(report),
            Err(_) => {
                error!("mapper panicked");
                panicked += 1;
            }
        }
    }
    for handle in reducers {
        match handle.join() {
            Ok(report) => summary.add_reducer(report),
            Err(_) => {
                error!("reducer panicked");
                panicked += 1;
            }
        }
    }

    summary.elapsed_ms = start.elapsed().as_millis() as u64;

    if let Some(e) = spawn_error {
        return Err(IndexError::Spawn(e));
    }
    if panicked > 0 {
        return Err(IndexError::Other(format!("{} worker(s) panicked", panicked)));
    }

    info!(
        indexed = summary.files_indexed,
        skipped = summary.skipped.len(),
        letters = summary.written.len(),
        elapsed_ms = summary.elapsed_ms,
        "index complete"
    );
    Ok(summary)
}
