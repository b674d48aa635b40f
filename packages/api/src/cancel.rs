//! Request cancellation tied to the lifetime of a view.
//!
//! A page creates one [`CancelToken`], runs every request through
//! [`CancelToken::run`] and calls [`CancelToken::cancel`] when it unmounts.
//! Aborted requests resolve to [`ApiError::Canceled`], which the UI never
//! shows to the user.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable, Aborted};

use crate::error::ApiError;

#[derive(Default)]
struct CancelState {
    canceled: bool,
    next_id: u64,
    outstanding: Vec<(u64, AbortHandle)>,
}

/// Owner-scoped cancellation for outstanding requests. Clones share state.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Rc<RefCell<CancelState>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `future` unless the token is canceled first.
    pub async fn run<T, F>(&self, future: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let (id, registration) = {
            let mut state = self.state.borrow_mut();
            if state.canceled {
                return Err(ApiError::Canceled);
            }
            let (handle, registration) = AbortHandle::new_pair();
            let id = state.next_id;
            state.next_id += 1;
            state.outstanding.push((id, handle));
            (id, registration)
        };

        let result = Abortable::new(future, registration).await;
        self.state
            .borrow_mut()
            .outstanding
            .retain(|(handle_id, _)| *handle_id != id);

        match result {
            Ok(result) => result,
            Err(Aborted) => Err(ApiError::Canceled),
        }
    }

    /// Abort every outstanding request and refuse new ones.
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.canceled = true;
        for (_, handle) in state.outstanding.drain(..) {
            handle.abort();
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.state.borrow().canceled
    }

    /// Requests currently running through this token.
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let token = CancelToken::new();
        let result = token.run(async { Ok::<_, ApiError>(42) }).await;
        assert_eq!(result, Ok(42));
        assert_eq!(token.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let token = CancelToken::new();
        let canceller = token.clone();

        let (result, ()) = futures::join!(
            token.run(futures::future::pending::<Result<(), ApiError>>()),
            async move { canceller.cancel() }
        );

        assert_eq!(result, Err(ApiError::Canceled));
        assert_eq!(token.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_canceled_token_refuses_new_requests() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_canceled());

        let result = token.run(async { Ok::<_, ApiError>(()) }).await;
        assert_eq!(result, Err(ApiError::Canceled));
    }
}
