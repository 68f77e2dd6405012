//! Request lifetimes bound to the view that issued them.
//!
//! Every request a view sends runs through its [`RequestScope`]. Once the
//! scope is closed, either explicitly through a [`ScopeHandle`] or by
//! dropping the scope together with its view, pending requests are aborted
//! and whatever they would have returned is reported as
//! [`BlogError::Cancelled`] instead of reaching the view's state.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::future::{AbortHandle, Abortable};
use log::debug;

use crate::error::{BlogError, Result};

#[derive(Debug, Default)]
struct ScopeState {
    closed: bool,
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
}

type SharedState = Arc<Mutex<ScopeState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, ScopeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn close(state: &SharedState) {
    let mut state = lock(state);
    state.closed = true;
    let pending = state.in_flight.len();
    for (_, handle) in state.in_flight.drain() {
        handle.abort();
    }
    if pending > 0 {
        debug!("scope closed, {} request(s) discarded", pending);
    }
}

#[derive(Debug, Default)]
pub struct RequestScope {
    state: SharedState,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            state: self.state.clone(),
        }
    }

    /// Drive `operation` to completion unless the scope closes first.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = lock(&self.state);
            if state.closed {
                return Err(BlogError::Cancelled);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.insert(id, handle);
            id
        };
        let _entry = InFlight {
            state: &self.state,
            id,
        };

        let outcome = Abortable::new(operation, registration).await;
        let closed = lock(&self.state).closed;

        match outcome {
            Ok(result) if !closed => result,
            _ => Err(BlogError::Cancelled),
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        lock(&self.state).in_flight.len()
    }

    pub fn close(&self) {
        close(&self.state);
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        close(&self.state);
    }
}

/// Unregisters a request however its future ends, dropped halfway included.
struct InFlight<'a> {
    state: &'a SharedState,
    id: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.id);
    }
}

/// Lets the owner of a view tear its requests down from elsewhere.
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    state: SharedState,
}

impl ScopeHandle {
    pub fn close(&self) {
        close(&self.state);
    }
    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn passes_results_through_while_open() {
        let scope = RequestScope::new();
        let value = scope.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);

        let error = scope.run(async { Err::<(), _>(BlogError::Status(500)) }).await;
        assert!(matches!(error, Err(BlogError::Status(500))));
    }

    #[tokio::test]
    async fn closing_aborts_pending_requests() {
        let scope = RequestScope::new();
        let handle = scope.handle();

        let (result, _) = tokio::join!(
            scope.run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(1)
            }),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                handle.close();
            }
        );

        assert!(matches!(result, Err(BlogError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn closed_scope_refuses_new_requests() {
        let scope = RequestScope::new();
        scope.close();
        let result = scope.run(async { Ok(()) }).await;
        assert!(matches!(result, Err(BlogError::Cancelled)));
    }

    #[tokio::test]
    async fn abandoned_requests_are_unregistered() {
        let scope = RequestScope::new();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(20),
            scope.run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(scope.in_flight(), 0);

        scope.run(async { Ok(()) }).await.unwrap();
        assert_eq!(scope.in_flight(), 0);
        assert!(!scope.is_closed());
    }

    #[test]
    fn dropping_the_scope_closes_handles() {
        let scope = RequestScope::new();
        let handle = scope.handle();
        assert!(!handle.is_closed());
        drop(scope);
        assert!(handle.is_closed());
    }
}
