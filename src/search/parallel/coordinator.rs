//! Search coordinator that runs strategies on their own threads.

use crate::error::{Result, SearchError};
use crate::oracle::PasswordOracle;
use crate::search::SearchStrategy;
use crate::search::config::{StrategyKind, StrategyParams};
use crate::search::parallel::channel::{ProgressSink, SearchEvent, create_event_channel, publish};
use crate::search::parallel::config::CoordinatorConfig;
use crate::search::parallel::signal::{FoundPassword, SearchSignals};
use crate::search::result::{Progress, SearchResult, StrategyReport, StrategyStatus};
use crate::search::strategy::{IncrementalStrategy, RandomStrategy, WordlistStrategy};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Outcome of every strategy run in a session.
#[derive(Debug)]
pub struct SessionReport {
    /// The single recorded password, if any strategy found it.
    pub found: Option<FoundPassword>,
    /// Terminal outcome per strategy, in start order.
    pub strategies: Vec<(StrategyKind, Result<StrategyReport>)>,
}

impl SessionReport {
    pub fn outcome(&self, kind: StrategyKind) -> Option<&Result<StrategyReport>> {
        self.strategies
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }
}

/// Last status of each strategy.
#[derive(Debug, Default)]
struct StatusBoard {
    slots: Mutex<[StrategyStatus; 3]>,
}

impl StatusBoard {
    fn get(&self, kind: StrategyKind) -> StrategyStatus {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)[kind.index()].clone()
    }

    fn set(&self, kind: StrategyKind, status: StrategyStatus) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)[kind.index()] = status;
    }
}

/// State cloned into every strategy thread.
#[derive(Clone)]
struct WorkerShared {
    oracle: Arc<dyn PasswordOracle>,
    signals: Arc<SearchSignals>,
    statuses: Arc<StatusBoard>,
    active: Arc<AtomicUsize>,
    events: Sender<SearchEvent>,
}

struct Worker {
    strategy: StrategyKind,
    handle: JoinHandle<Result<StrategyReport>>,
}

/// Releases the active-strategy count even if the thread unwinds.
struct ActiveGuard {
    kind: StrategyKind,
    shared: WorkerShared,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        if self.shared.statuses.get(self.kind) == StrategyStatus::Searching {
            self.shared.statuses.set(
                self.kind,
                StrategyStatus::Failed("search thread panicked".to_string()),
            );
        }
        self.shared.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs up to one instance of each strategy concurrently against one
/// oracle and enforces that at most one password is recorded per session.
///
/// Stopping any strategy before a password is found stops all of them.
pub struct SearchCoordinator {
    config: CoordinatorConfig,
    shared: WorkerShared,
    workers: Mutex<Vec<Worker>>,
    events_rx: Receiver<SearchEvent>,
}

impl SearchCoordinator {
    pub fn new<O: PasswordOracle + 'static>(oracle: O, config: CoordinatorConfig) -> Self {
        Self::with_shared_oracle(Arc::new(oracle), config)
    }

    pub fn with_shared_oracle(oracle: Arc<dyn PasswordOracle>, config: CoordinatorConfig) -> Self {
        let (events, events_rx) = create_event_channel(config.event_capacity);
        Self {
            config,
            shared: WorkerShared {
                oracle,
                signals: Arc::new(SearchSignals::new()),
                statuses: Arc::new(StatusBoard::default()),
                active: Arc::new(AtomicUsize::new(0)),
                events,
            },
            workers: Mutex::new(Vec::new()),
            events_rx,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Receiver for progress and lifecycle events.
    pub fn events(&self) -> Receiver<SearchEvent> {
        self.events_rx.clone()
    }

    /// Validate `params` and launch the strategy on its own thread.
    ///
    /// Starting while nothing runs opens a new session, clearing the
    /// recorded password and every stop flag.
    pub fn start(&self, params: StrategyParams) -> Result<()> {
        let kind = params.kind();
        if let Err(e) = params.validate() {
            tracing::warn!(strategy = %kind, error = %e, "rejected search parameters");
            return Err(e);
        }

        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);

        if self.shared.statuses.get(kind) == StrategyStatus::Searching {
            return Err(SearchError::Validation(format!(
                "{kind} search is already running"
            )));
        }

        if self.shared.active.load(Ordering::SeqCst) == 0 {
            // Reports nobody waited for belong to the previous session.
            for worker in workers.drain(..) {
                let _ = worker.handle.join();
            }
            self.shared.signals.reset();
            tracing::info!("new search session");
        } else if self.shared.signals.is_found() {
            return Err(SearchError::Validation(
                "password already found; wait for the running strategies to finish".to_string(),
            ));
        } else {
            self.shared.signals.clear_stop(kind);
        }

        let strategy = self.plan(params);
        self.shared.statuses.set(kind, StrategyStatus::Searching);
        self.shared.active.fetch_add(1, Ordering::SeqCst);
        publish(&self.shared.events, SearchEvent::Started { strategy: kind });

        let shared = self.shared.clone();
        let progress_interval = self.config.progress_interval;
        let handle = std::thread::spawn(move || run_worker(strategy, shared, progress_interval));

        workers.push(Worker {
            strategy: kind,
            handle,
        });
        Ok(())
    }

    /// Stop `kind`. Unless a password was already recorded, the other two
    /// strategies are stopped as well.
    pub fn stop(&self, kind: StrategyKind) {
        self.shared.signals.request_stop(kind);
        if !self.shared.signals.is_found() {
            self.shared.signals.stop_others(kind);
            tracing::info!(strategy = %kind, "search stopped, cancelling all strategies");
        } else {
            tracing::debug!(strategy = %kind, "search stopped after password was found");
        }
    }

    pub fn is_stopped(&self, kind: StrategyKind) -> bool {
        self.shared.signals.is_stopped(kind)
    }

    /// The password recorded in the current session.
    pub fn result(&self) -> Option<FoundPassword> {
        self.shared.signals.winner()
    }

    pub fn is_found(&self) -> bool {
        self.shared.signals.is_found()
    }

    pub fn status(&self, kind: StrategyKind) -> StrategyStatus {
        self.shared.statuses.get(kind)
    }

    /// Whether any strategy thread is still searching.
    pub fn is_running(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst) > 0
    }

    /// Join every launched strategy and collect the session report.
    pub fn wait(&self) -> SessionReport {
        let workers = {
            let mut guard = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };

        let strategies = workers
            .into_iter()
            .map(|worker| {
                let outcome = worker
                    .handle
                    .join()
                    .unwrap_or_else(|_| Err(SearchError::Panicked(worker.strategy)));
                (worker.strategy, outcome)
            })
            .collect();

        SessionReport {
            found: self.result(),
            strategies,
        }
    }

    fn plan(&self, params: StrategyParams) -> Box<dyn SearchStrategy> {
        match params {
            StrategyParams::Wordlist { path } => Box::new(WordlistStrategy { path }),
            StrategyParams::Incremental { charset } => Box::new(IncrementalStrategy {
                alphabet: charset.alphabet(),
                lengths: self.config.incremental_lengths,
            }),
            StrategyParams::Random { lengths } => Box::new(RandomStrategy {
                lengths,
                seed: self.config.seed,
            }),
        }
    }
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("config", &self.config)
            .field("active", &self.shared.active.load(Ordering::SeqCst))
            .field("found", &self.shared.signals.is_found())
            .finish()
    }
}

/// Body of a strategy thread.
fn run_worker(
    strategy: Box<dyn SearchStrategy>,
    shared: WorkerShared,
    progress_interval: u64,
) -> Result<StrategyReport> {
    let kind = strategy.kind();
    let _guard = ActiveGuard {
        kind,
        shared: shared.clone(),
    };
    tracing::info!(strategy = %kind, "search started");

    let mut sink = ProgressSink::new(shared.events.clone(), progress_interval);
    let outcome = strategy.run(
        shared.oracle.as_ref(),
        shared.signals.stop_flag(kind),
        &mut |progress: &Progress| sink.report(progress),
    );
    let outcome = outcome.map(|report| settle(kind, report, &shared.signals, &mut sink));

    let (status, statistics) = match &outcome {
        Ok(report) => (
            StrategyStatus::from(&report.result),
            Some(report.statistics.clone()),
        ),
        Err(e) => (StrategyStatus::Failed(e.to_string()), None),
    };

    match &outcome {
        Ok(report) => tracing::info!(
            strategy = %kind,
            result = %report.result,
            attempts = report.statistics.attempts,
            elapsed = ?report.statistics.elapsed_time,
            "search finished"
        ),
        Err(e) => tracing::warn!(strategy = %kind, error = %e, "search failed"),
    }

    shared.statuses.set(kind, status.clone());
    publish(
        &shared.events,
        SearchEvent::Finished {
            strategy: kind,
            status,
            statistics,
        },
    );
    outcome
}

/// Claim the session result for a found password, or discard it if
/// another strategy already won.
fn settle(
    kind: StrategyKind,
    mut report: StrategyReport,
    signals: &SearchSignals,
    sink: &mut ProgressSink,
) -> StrategyReport {
    let SearchResult::Found { password, elapsed } = &report.result else {
        return report;
    };

    let found = FoundPassword {
        strategy: kind,
        password: password.clone(),
        elapsed: *elapsed,
    };
    if signals.try_record_found(found) {
        signals.stop_others(kind);
        sink.force(&Progress {
            strategy: kind,
            candidate: password.clone(),
            elapsed: *elapsed,
            attempts: report.statistics.attempts,
        });
        tracing::info!(strategy = %kind, attempts = report.statistics.attempts, "password found");
    } else {
        tracing::debug!(strategy = %kind, "password already recorded, discarding late result");
        report.result = SearchResult::Cancelled;
    }
    report
}
