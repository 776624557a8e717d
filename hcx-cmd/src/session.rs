//! Single shared holder for the latest analysis outcome.

use crate::analysis::{run_analysis, AnalysisError, AnalysisParams, AnalysisRequest};
use hcx_core::analysis::AnalysisResult;
use hcx_core::year_range::DatasetSpan;
use hcx_core::AnalyticsSource;
use log::info;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifies one run; later runs compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

#[derive(Debug, Default)]
struct SessionState {
    latest: u64,
    running: bool,
    result: Option<AnalysisResult>,
    error: Option<AnalysisError>,
}

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub running: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<AnalysisError>,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: Mutex<SessionState>,
}

impl AnalysisSession {
    pub fn new() -> AnalysisSession {
        AnalysisSession::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a run, superseding any still in flight.
    pub fn begin_run(&self) -> RunId {
        let mut state = self.lock();
        state.latest += 1;
        state.running = true;
        state.result = None;
        state.error = None;
        RunId(state.latest)
    }

    /// Applies `outcome` when `run` is still the latest run.
    ///
    /// Returns `false` when the outcome was discarded as stale.
    pub fn settle(&self, run: RunId, outcome: Result<AnalysisResult, AnalysisError>) -> bool {
        let mut state = self.lock();
        if run.0 != state.latest {
            info!(
                "Discarding stale analysis run {} (latest is {})",
                run.0, state.latest
            );
            return false;
        }
        state.running = false;
        match outcome {
            Ok(result) => state.result = Some(result),
            Err(e) => state.error = Some(e),
        }
        true
    }

    /// Clears the held result and error without touching a run in flight.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.result = None;
        state.error = None;
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            running: state.running,
            result: state.result.clone(),
            error: state.error.clone(),
        }
    }

    /// Begin a run, execute it and settle its outcome.
    ///
    /// Returns the run's id and whether its outcome was applied.
    pub async fn run<S>(
        &self,
        source: &S,
        request: &AnalysisRequest,
        params: &AnalysisParams,
        dataset: DatasetSpan,
    ) -> (RunId, bool)
    where
        S: AnalyticsSource + ?Sized,
    {
        let run = self.begin_run();
        let outcome = run_analysis(source, request, params, dataset).await;
        (run, self.settle(run, outcome))
    }
}
