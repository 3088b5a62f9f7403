//! Multi-threaded seed search
//!
//! Workers stride through the seed range (worker `i` visits `start + i`,
//! `start + i + n`, ...), so coverage is complete and disjoint no matter how
//! threads are scheduled. A monitor thread publishes progress at a fixed
//! cadence and emits the single completion event once every worker has exited.
//! All events travel over one unbounded crossbeam channel; workers never block
//! on delivery.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::evaluator::SeedEvaluator;
use super::events::{CompletionReason, ProgressSnapshot, SearchEvent};
use super::request::SearchRequest;
use crate::constants::{PROGRESS_INTERVAL_MS, SEED_SPACE};
use crate::error::{Error, Result};
use crate::world::loot::LootTable;
use crate::world::structures::{DESERT_PYRAMID, StructureConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Completed,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Finish the seed each worker is on, then exit
    Graceful,
    /// Also abandon in-flight seeds between loot generations
    Forced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    pub progress_interval_ms: u64,
    /// Stop gracefully once this many results have been published
    #[serde(default)]
    pub result_limit: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            progress_interval_ms: PROGRESS_INTERVAL_MS,
            result_limit: None,
        }
    }
}

/// Counters and flags shared by one run's workers and monitor
struct RunShared {
    stop: AtomicBool,
    abort: AtomicBool,
    processed: AtomicU64,
    current_seed: AtomicU64,
    found: AtomicU64,
    /// Per worker: the next seed it has not finished
    cursors: Vec<AtomicU64>,
    end_seed: u64,
    started: Instant,
}

impl RunShared {
    fn new(start_seed: u64, plans: &[WorkerPlan]) -> Self {
        Self {
            stop: AtomicBool::new(false),
            abort: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            current_seed: AtomicU64::new(start_seed),
            found: AtomicU64::new(0),
            cursors: plans
                .iter()
                .map(|plan| AtomicU64::new(plan.first_seed))
                .collect(),
            end_seed: plans.first().map_or(start_seed, |plan| plan.end_seed),
            started: Instant::now(),
        }
    }

    /// Lowest unfinished seed over all workers. Everything below it is done;
    /// seeds above it may already have been visited by faster workers.
    fn resume_seed(&self) -> u64 {
        self.cursors
            .iter()
            .map(|cursor| cursor.load(Ordering::Relaxed))
            .min()
            .unwrap_or(self.end_seed)
            .min(self.end_seed)
    }

    fn snapshot(&self) -> ProgressSnapshot {
        let elapsed = self.started.elapsed();
        let processed = self.processed.load(Ordering::Relaxed);
        let current_seed = self.current_seed.load(Ordering::Relaxed);
        let secs = elapsed.as_secs_f64();
        ProgressSnapshot {
            percent_complete: current_seed as f64 * 100.0 / SEED_SPACE as f64,
            current_seed,
            seeds_per_second: if secs > 0.0 {
                (processed as f64 / secs) as u64
            } else {
                0
            },
            elapsed_ms: elapsed.as_millis() as u64,
            seeds_processed: processed,
        }
    }
}

/// One worker's stride through the seed range
#[derive(Debug, Clone, Copy)]
struct WorkerPlan {
    first_seed: u64,
    step: u64,
    end_seed: u64,
    result_limit: Option<u64>,
}

impl WorkerPlan {
    fn for_request(request: &SearchRequest, result_limit: Option<u64>) -> Vec<WorkerPlan> {
        let step = request.worker_count as u64;
        (0..step)
            .map(|offset| WorkerPlan {
                first_seed: request.start_seed + offset,
                step,
                end_seed: request.end_seed,
                result_limit,
            })
            .collect()
    }

    fn seeds(&self) -> impl Iterator<Item = u64> {
        (self.first_seed..self.end_seed).step_by(self.step as usize)
    }
}

/// Search coordinator: Idle -> Running -> Completed | Stopped, then restartable
pub struct Searcher {
    structure: StructureConfig,
    table: Arc<LootTable>,
    options: SearchOptions,
    state: Arc<Mutex<SearchState>>,
    run: Mutex<Option<Arc<RunShared>>>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl Searcher {
    /// Searcher for desert pyramids using `table` for chest loot
    pub fn new(table: LootTable) -> Self {
        Self::with_structure(DESERT_PYRAMID, table)
    }

    pub fn with_structure(structure: StructureConfig, table: LootTable) -> Self {
        Searcher {
            structure,
            table: Arc::new(table),
            options: SearchOptions::default(),
            state: Arc::new(Mutex::new(SearchState::Idle)),
            run: Mutex::new(None),
            monitor: Mutex::new(None),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> SearchState {
        *self.state.lock()
    }

    pub fn is_running(&self) -> bool {
        self.state() == SearchState::Running
    }

    /// Where a new run should start to continue the latest one without gaps.
    /// Results just above it may be reported again.
    pub fn resume_seed(&self) -> Option<u64> {
        self.run.lock().as_ref().map(|run| run.resume_seed())
    }

    /// Validate `request` and launch the workers.
    ///
    /// Returns the event stream for this run. Fails without side effects when
    /// the request is invalid or a run is already active.
    pub fn start(&self, request: SearchRequest) -> Result<Receiver<SearchEvent>> {
        if let Err(e) = request.validate() {
            tracing::warn!("Search request rejected: {}", e);
            return Err(e);
        }

        {
            let mut state = self.state.lock();
            if *state == SearchState::Running {
                tracing::warn!("Search request rejected: a search is already running");
                return Err(Error::AlreadyRunning);
            }
            *state = SearchState::Running;
        }

        // The previous monitor has already published its completion; reap it.
        if let Some(previous) = self.monitor.lock().take() {
            let _ = previous.join();
        }

        let plans = WorkerPlan::for_request(&request, self.options.result_limit);
        let shared = Arc::new(RunShared::new(request.start_seed, &plans));
        *self.run.lock() = Some(Arc::clone(&shared));

        tracing::info!(
            "Starting search: {} workers, seeds {}..{}, {} targets",
            request.worker_count,
            request.start_seed,
            request.end_seed,
            request.targets.len()
        );

        match self.spawn_run(request, plans, shared.clone()) {
            Ok(events) => Ok(events),
            Err(e) => {
                shared.stop.store(true, Ordering::Relaxed);
                shared.abort.store(true, Ordering::Relaxed);
                *self.state.lock() = SearchState::Idle;
                tracing::error!("Failed to spawn search threads: {}", e);
                Err(e)
            }
        }
    }

    fn spawn_run(
        &self,
        request: SearchRequest,
        plans: Vec<WorkerPlan>,
        shared: Arc<RunShared>,
    ) -> Result<Receiver<SearchEvent>> {
        let (event_tx, event_rx) = unbounded::<SearchEvent>();
        // Never written to: the monitor watches for every worker dropping its sender.
        let (done_tx, done_rx) = bounded::<()>(0);

        let evaluator = Arc::new(SeedEvaluator::new(
            self.structure,
            Arc::clone(&self.table),
            request.targets,
        ));

        let mut workers = Vec::with_capacity(plans.len());
        for (worker_id, plan) in plans.into_iter().enumerate() {
            let evaluator = Arc::clone(&evaluator);
            let shared = Arc::clone(&shared);
            let tx = event_tx.clone();
            let done = done_tx.clone();

            let handle = thread::Builder::new()
                .name(format!("seed-search-{}", worker_id))
                .spawn(move || {
                    let _done = done;
                    run_worker(worker_id, plan, &evaluator, &shared, &tx);
                })?;
            workers.push(handle);
        }
        drop(done_tx);

        let interval = Duration::from_millis(self.options.progress_interval_ms.max(1));
        let state = Arc::clone(&self.state);
        let monitor = thread::Builder::new()
            .name("seed-search-monitor".to_string())
            .spawn(move || {
                monitor_run(workers, done_rx, event_tx, &shared, &state, interval);
            })?;
        *self.monitor.lock() = Some(monitor);

        Ok(event_rx)
    }

    /// Request the active run to stop. Always accepted; a no-op when idle.
    /// The run still ends with exactly one `Completed` event.
    pub fn stop(&self, mode: StopMode) {
        if let Some(run) = self.run.lock().as_ref() {
            tracing::info!("Stop requested ({:?})", mode);
            if mode == StopMode::Forced {
                run.abort.store(true, Ordering::Relaxed);
            }
            run.stop.store(true, Ordering::Relaxed);
        }
    }

    /// Block until the active run's completion event has been sent
    pub fn wait(&self) {
        let handle = self.monitor.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("Search monitor thread panicked");
            }
        }
    }
}

impl Drop for Searcher {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop(StopMode::Forced);
        }
    }
}

fn run_worker(
    worker_id: usize,
    plan: WorkerPlan,
    evaluator: &SeedEvaluator,
    shared: &RunShared,
    events: &Sender<SearchEvent>,
) {
    let mut visited = 0u64;
    for seed in plan.seeds() {
        if shared.stop.load(Ordering::Relaxed) {
            break;
        }
        shared.current_seed.store(seed, Ordering::Relaxed);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            evaluator.evaluate_until(seed as u32, &shared.abort)
        }));
        shared.processed.fetch_add(1, Ordering::Relaxed);
        // An aborted evaluation may not have looked at every candidate
        if shared.abort.load(Ordering::Relaxed) {
            break;
        }
        shared.cursors[worker_id].store(seed + plan.step, Ordering::Relaxed);

        match outcome {
            Ok(Some(result)) => {
                let found = shared.found.fetch_add(1, Ordering::Relaxed) + 1;
                let within_limit = plan.result_limit.is_none_or(|limit| found <= limit);
                if within_limit {
                    let _ = events.send(SearchEvent::Found(result));
                }
                if plan.result_limit.is_some_and(|limit| found >= limit) {
                    shared.stop.store(true, Ordering::Relaxed);
                }
            }
            Ok(None) => {}
            Err(_) => {
                tracing::error!("Evaluation of seed {} panicked, skipping it", seed);
            }
        }
        visited += 1;
    }
    tracing::debug!("Search worker {} exiting after {} seeds", worker_id, visited);
}

fn monitor_run(
    workers: Vec<JoinHandle<()>>,
    done: Receiver<()>,
    events: Sender<SearchEvent>,
    shared: &RunShared,
    state: &Mutex<SearchState>,
    interval: Duration,
) {
    loop {
        match done.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                let _ = events.send(SearchEvent::Progress(shared.snapshot()));
            }
            Err(RecvTimeoutError::Disconnected) => break,
            Ok(()) => {}
        }
    }

    for worker in workers {
        if worker.join().is_err() {
            tracing::error!("Search worker thread panicked");
        }
    }

    let reason = if shared.abort.load(Ordering::Relaxed) {
        CompletionReason::Aborted
    } else if shared.stop.load(Ordering::Relaxed) {
        CompletionReason::Stopped
    } else {
        CompletionReason::Exhausted
    };

    let snapshot = shared.snapshot();
    *state.lock() = match reason {
        CompletionReason::Exhausted => SearchState::Completed,
        CompletionReason::Stopped | CompletionReason::Aborted => SearchState::Stopped,
    };
    tracing::info!(
        "Search finished ({:?}): {} seeds in {} ms, {} results",
        reason,
        snapshot.seeds_processed,
        snapshot.elapsed_ms,
        shared.found.load(Ordering::Relaxed)
    );

    let _ = events.send(SearchEvent::Progress(snapshot));
    let _ = events.send(SearchEvent::Completed(reason));
}
