use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::event;

use crate::core::PokerError;

use super::{Progress, Simulation, SimulationOutcome, SimulationRequest};

/// Messages sent from the worker thread to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    Progress(Progress),
    /// End of stream. Sent exactly once per run, whether it completed,
    /// was cancelled or failed.
    Finished(SimulationOutcome),
}

/// A simulation running on its own background thread.
///
/// The handle is an iterator over the events the worker sends. It yields
/// progress in playout order and ends right after the
/// [`SimulationEvent::Finished`] marker; it can't be restarted. Dropping
/// the handle cancels the run and joins the thread.
#[derive(Debug)]
pub struct SimulationHandle {
    cancel: Arc<AtomicBool>,
    events: Receiver<SimulationEvent>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl SimulationHandle {
    /// Validate the request and start it on a new thread. Invalid
    /// requests are rejected here, before any playout runs.
    ///
    /// ```
    /// use poker_odds::core::Card;
    /// use poker_odds::holdem::{SimulationEvent, SimulationHandle, SimulationRequest};
    ///
    /// let mut request = SimulationRequest::new(Card::parse_many("AH AC").unwrap(), vec![], 1);
    /// request.simulation_iterations = Some(2_000);
    /// request.progress_interval = 500;
    ///
    /// let handle = SimulationHandle::spawn(&request).unwrap();
    /// let events: Vec<SimulationEvent> = handle.collect();
    /// assert!(matches!(events.last(), Some(SimulationEvent::Finished(_))));
    /// ```
    pub fn spawn(request: &SimulationRequest) -> Result<Self, PokerError> {
        let simulation = request.build_simulation()?;
        Ok(Self::spawn_with_rng(simulation, StdRng::from_rng(&mut rand::rng())))
    }

    /// Start an already validated simulation with the given rng. Tests use
    /// this to get repeatable runs.
    pub fn spawn_with_rng<R>(mut simulation: Simulation, mut rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, events) = mpsc::channel();

        let worker_cancel = Arc::clone(&cancel);
        let worker = thread::spawn(move || {
            let outcome = simulation.run(&mut rng, &worker_cancel, |p| {
                // A closed channel means the caller went away, so stop early.
                if tx.send(SimulationEvent::Progress(p)).is_err() {
                    worker_cancel.store(true, Ordering::Relaxed);
                }
            });
            if tx.send(SimulationEvent::Finished(outcome)).is_err() {
                event!(tracing::Level::DEBUG, "Simulation finished with nobody listening");
            }
        });

        Self {
            cancel,
            events,
            worker: Some(worker),
            finished: false,
        }
    }

    /// Ask the worker to stop after the playout it is running.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain every remaining event and return how the run ended.
    pub fn wait(mut self) -> SimulationOutcome {
        let mut outcome = None;
        for e in self.by_ref() {
            if let SimulationEvent::Finished(o) = e {
                outcome = Some(o);
            }
        }
        outcome.unwrap_or_else(|| {
            SimulationOutcome::Failed(PokerError::WorkerFailed(String::from(
                "worker stopped without finishing",
            )))
        })
    }
}

impl Iterator for SimulationHandle {
    type Item = SimulationEvent;

    fn next(&mut self) -> Option<SimulationEvent> {
        if self.finished {
            return None;
        }
        match self.events.recv() {
            Ok(e) => {
                if matches!(e, SimulationEvent::Finished(_)) {
                    self.finished = true;
                    if let Some(worker) = self.worker.take() {
                        let _ = worker.join();
                    }
                }
                Some(e)
            }
            Err(_) => {
                // The worker hung up without a Finished marker.
                self.finished = true;
                None
            }
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Keeps at most one simulation running for a caller.
///
/// Starting a new run cancels the outstanding one first. Whatever the old
/// run still had queued, including its terminal marker, is handed back
/// so the caller can release anything waiting on it.
#[derive(Debug, Default)]
pub struct SimulationSession {
    current: Option<SimulationHandle>,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the current run, if any, and start `request`. Returns the
    /// events the cancelled run still delivered.
    pub fn start(&mut self, request: &SimulationRequest) -> Result<Vec<SimulationEvent>, PokerError> {
        // Validate first so a bad request leaves the running one alone.
        let simulation = request.build_simulation()?;
        let drained = self.cancel();
        self.current = Some(SimulationHandle::spawn_with_rng(
            simulation,
            StdRng::from_rng(&mut rand::rng()),
        ));
        Ok(drained)
    }

    /// Cancel the current run and wait for its terminal marker.
    pub fn cancel(&mut self) -> Vec<SimulationEvent> {
        match self.current.take() {
            Some(handle) => {
                handle.cancel();
                handle.collect()
            }
            None => vec![],
        }
    }

    /// The running simulation, to pull events from.
    pub fn current(&mut self) -> Option<&mut SimulationHandle> {
        self.current.as_mut()
    }

    /// Take ownership of the running simulation, leaving the session idle.
    pub fn take(&mut self) -> Option<SimulationHandle> {
        self.current.take()
    }
}
