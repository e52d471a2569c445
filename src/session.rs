//! Collection session
//!
//! Owns the cached [`FingerprintResult`] and the run-generation counter.
//! Every call to [`FingerprintSession::collect`] takes a fresh generation;
//! when a pass finishes, it commits only if no newer pass has started in
//! the meantime. Passes are never cancelled, so an older pass always runs
//! to completion and is then discarded.
//!
//! Single-threaded: state lives in `Cell`/`RefCell` and no borrow is held
//! across an `.await`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::config::FingerprintConfig;
use crate::environment::Environment;
use crate::error::{FingerprintError, Result};
use crate::pipeline::{self, FingerprintResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No pass has completed and none is running.
    Uninitialized,
    /// At least one pass is running.
    Collecting,
    /// A result is cached and nothing is running.
    Ready,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Collecting => "collecting",
            SessionState::Ready => "ready",
        }
    }
}

pub struct FingerprintSession<E: Environment + ?Sized> {
    env: Rc<E>,
    config: FingerprintConfig,
    generation: Cell<u64>,
    in_flight: Cell<usize>,
    result: RefCell<Option<Rc<FingerprintResult>>>,
}

impl<E: Environment + ?Sized> FingerprintSession<E> {
    pub fn new(env: Rc<E>, config: FingerprintConfig) -> Self {
        Self {
            env,
            config,
            generation: Cell::new(0),
            in_flight: Cell::new(0),
            result: RefCell::new(None),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.get() > 0 {
            SessionState::Collecting
        } else if self.result.borrow().is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    /// Latest committed result. Still served while a newer pass runs.
    pub fn result(&self) -> Option<Rc<FingerprintResult>> {
        self.result.borrow().clone()
    }

    /// Like [`result`](Self::result), failing with `NotReady` when nothing
    /// has been committed.
    pub fn require_result(&self) -> Result<Rc<FingerprintResult>> {
        self.result().ok_or(FingerprintError::NotReady)
    }

    /// Run one collection pass.
    ///
    /// Returns `Superseded` when another pass started before this one
    /// finished; the cached result is then left untouched.
    pub async fn collect(&self) -> Result<Rc<FingerprintResult>> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.in_flight.set(self.in_flight.get() + 1);

        let outcome = pipeline::run(&*self.env, &self.config, generation).await;
        self.in_flight.set(self.in_flight.get() - 1);
        let result = Rc::new(outcome?);

        let latest = self.generation.get();
        if generation != latest {
            log::info!("Discarding run {} (run {} is newer)", generation, latest);
            return Err(FingerprintError::Superseded {
                run: generation,
                latest,
            });
        }

        *self.result.borrow_mut() = Some(Rc::clone(&result));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::fake::FakeEnvironment;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    fn session(env: FakeEnvironment) -> FingerprintSession<FakeEnvironment> {
        FingerprintSession::new(Rc::new(env), FingerprintConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let session = session(FakeEnvironment::new());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.result().is_none());
        assert!(matches!(
            session.require_result(),
            Err(FingerprintError::NotReady)
        ));
    }

    #[test]
    fn test_collect_commits() {
        let session = session(FakeEnvironment::new());
        let result = block_on(session.collect()).unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(result.generation, 1);
        assert_eq!(session.require_result().unwrap().digest, result.digest);
    }

    #[test]
    fn test_recollect_replaces_result() {
        let session = session(FakeEnvironment::new());
        let first = block_on(session.collect()).unwrap();
        let second = block_on(session.collect()).unwrap();

        assert_eq!(second.generation, 2);
        assert_eq!(first.digest, second.digest);
        assert_eq!(session.result().unwrap().generation, 2);
    }

    #[test]
    fn test_stale_run_does_not_clobber() {
        let (release, gate) = oneshot::channel();
        let session = session(FakeEnvironment::new().with_audio_gate(gate));

        let (older, newer, _) = block_on(async {
            futures::join!(session.collect(), session.collect(), async {
                // Both passes have started; only the older one is parked.
                assert_eq!(session.state(), SessionState::Collecting);
                let _ = release.send(());
            })
        });

        assert!(matches!(
            older,
            Err(FingerprintError::Superseded { run: 1, latest: 2 })
        ));
        assert_eq!(newer.unwrap().generation, 2);
        assert_eq!(session.result().unwrap().generation, 2);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.env().audio_renders(), 2);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Collecting.as_str(), "collecting");
        assert_eq!(
            serde_json::to_string(&SessionState::Ready).unwrap(),
            "\"ready\""
        );
    }
}
