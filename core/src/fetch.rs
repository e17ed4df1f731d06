//! Fetch state shared by list view models.
//!
//! # Design
//! A `FetchController` owns the `FetchState` of one screen. Starting a fetch
//! hands out a `FetchTicket` stamped with a generation number; a completion
//! is applied only while its ticket is still the newest one, so an older
//! request finishing late cannot overwrite the result of a newer one.
//!
//! Completions arrive on whatever thread the transport uses. They are
//! re-posted through a `Dispatch` implementation supplied by the host (for
//! example the UI queue) before state is touched or observers run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::ManagerError;
use crate::manager::ManagerResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<M> {
    Idle,
    Loading,
    Displaying(M),
    Failed(ManagerError),
}

impl<M> FetchState<M> {
    pub fn displaying(&self) -> Option<&M> {
        match self {
            FetchState::Displaying(model) => Some(model),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Runs jobs on the thread that owns view state.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>);
}

/// Runs the job inline on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl Dispatch for Immediate {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>) {
        job()
    }
}

/// Identifies one started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

type Observer<M> = Arc<dyn Fn(&FetchState<M>) + Send + Sync>;

struct Inner<M> {
    state: FetchState<M>,
    generation: u64,
}

pub struct FetchController<M> {
    inner: Mutex<Inner<M>>,
    observers: Mutex<Vec<Observer<M>>>,
    dispatcher: Arc<dyn Dispatch>,
}

impl<M> FetchController<M>
where
    M: Clone + Send + 'static,
{
    pub fn new(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: FetchState::Idle,
                generation: 0,
            }),
            observers: Mutex::new(Vec::new()),
            dispatcher,
        }
    }

    pub fn state(&self) -> FetchState<M> {
        self.lock().state.clone()
    }

    /// Number of fetches started so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Register an observer called after every state change.
    pub fn subscribe(&self, observer: impl Fn(&FetchState<M>) + Send + Sync + 'static) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Enter `Loading` and supersede every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        let ticket = self.advance();
        self.announce(ticket);
        ticket
    }

    /// Enter `Loading` without notifying observers yet.
    ///
    /// Lets a caller stamp a ticket while holding its own lock; observers
    /// must then be told through `announce` once that lock is released.
    pub fn advance(&self) -> FetchTicket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = FetchState::Loading;
        FetchTicket {
            generation: inner.generation,
        }
    }

    /// Notify observers of `Loading` if `ticket` is still the newest.
    pub fn announce(&self, ticket: FetchTicket) {
        let snapshot = {
            let inner = self.lock();
            if inner.generation != ticket.generation {
                return;
            }
            inner.state.clone()
        };
        self.notify(&snapshot);
    }

    /// Apply `result` on the dispatcher if `ticket` is still current.
    pub fn complete(self: &Arc<Self>, ticket: FetchTicket, result: ManagerResult<M>) {
        let this = Arc::clone(self);
        self.dispatcher
            .dispatch(Box::new(move || this.apply(ticket, result)));
    }

    fn apply(&self, ticket: FetchTicket, result: ManagerResult<M>) {
        let snapshot = {
            let mut inner = self.lock();
            if inner.generation != ticket.generation {
                debug!(
                    stale = ticket.generation,
                    current = inner.generation,
                    "dropping superseded fetch result"
                );
                return;
            }
            inner.state = match result {
                Ok(model) => FetchState::Displaying(model),
                Err(e) => FetchState::Failed(e),
            };
            inner.state.clone()
        };
        self.notify(&snapshot);
    }

    /// Observers run without any lock held, so they may start a new fetch,
    /// mutate a filter or subscribe.
    fn notify(&self, state: &FetchState<M>) {
        let observers: Vec<Observer<M>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer(state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<M>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn controller() -> Arc<FetchController<Vec<u32>>> {
        Arc::new(FetchController::new(Arc::new(Immediate)))
    }

    #[test]
    fn starts_idle() {
        assert_eq!(controller().state(), FetchState::Idle);
    }

    #[test]
    fn success_displays_result() {
        let c = controller();
        let ticket = c.begin();
        assert!(c.state().is_loading());
        c.complete(ticket, Ok(vec![1, 2]));
        assert_eq!(c.state(), FetchState::Displaying(vec![1, 2]));
    }

    #[test]
    fn failure_is_recorded() {
        let c = controller();
        let ticket = c.begin();
        c.complete(ticket, Err(ManagerError::UserNetwork));
        assert_eq!(c.state(), FetchState::Failed(ManagerError::UserNetwork));
    }

    #[test]
    fn stale_completion_is_dropped() {
        let c = controller();
        let first = c.begin();
        let second = c.begin();
        c.complete(second, Ok(vec![2]));
        c.complete(first, Ok(vec![1]));
        assert_eq!(c.state(), FetchState::Displaying(vec![2]));
    }

    #[test]
    fn stale_completion_does_not_end_loading() {
        let c = controller();
        let first = c.begin();
        let _second = c.begin();
        c.complete(first, Err(ManagerError::Server));
        assert!(c.state().is_loading());
    }

    #[test]
    fn observers_see_loading_then_result() {
        let c = controller();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        c.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let ticket = c.begin();
        c.complete(ticket, Ok(vec![]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observer_can_begin_a_new_fetch() {
        let c = controller();
        let weak = Arc::downgrade(&c);
        let restarted = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&restarted);
        c.subscribe(move |state| {
            if matches!(state, FetchState::Failed(_)) && count.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(c) = weak.upgrade() {
                    let ticket = c.begin();
                    c.complete(ticket, Ok(vec![3]));
                }
            }
        });

        let ticket = c.begin();
        c.complete(ticket, Err(ManagerError::UserNetwork));
        assert_eq!(restarted.load(Ordering::SeqCst), 1);
        assert_eq!(c.state(), FetchState::Displaying(vec![3]));
        assert_eq!(c.generation(), 2);
    }

    #[test]
    fn observer_can_subscribe_another_observer() {
        let c = controller();
        let weak = Arc::downgrade(&c);
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late = Arc::clone(&late_calls);
        c.subscribe(move |state| {
            if state.is_loading() {
                if let Some(c) = weak.upgrade() {
                    let late = Arc::clone(&late);
                    c.subscribe(move |_| {
                        late.fetch_add(1, Ordering::SeqCst);
                    });
                }
            }
        });
        let ticket = c.begin();
        c.complete(ticket, Ok(vec![]));
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn announce_skips_superseded_ticket() {
        let c = controller();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        c.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let first = c.advance();
        let second = c.advance();
        c.announce(first);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        c.announce(second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completions_go_through_dispatcher() {
        struct Deferred(Mutex<Vec<Box<dyn FnOnce() + Send>>>);

        impl Dispatch for Deferred {
            fn dispatch(&self, job: Box<dyn FnOnce() + Send>) {
                self.0.lock().unwrap().push(job);
            }
        }

        let queue = Arc::new(Deferred(Mutex::new(Vec::new())));
        let c: Arc<FetchController<Vec<u32>>> = Arc::new(FetchController::new(queue.clone()));
        let ticket = c.begin();
        c.complete(ticket, Ok(vec![7]));
        assert!(c.state().is_loading());

        let jobs: Vec<_> = queue.0.lock().unwrap().drain(..).collect();
        for job in jobs {
            job();
        }
        assert_eq!(c.state(), FetchState::Displaying(vec![7]));
    }
}
