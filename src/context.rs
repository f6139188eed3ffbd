//! Operation Context Module
//!
//! Cancellable, deadline-bearing context passed to every cache operation.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::{CacheError, Result};

// == Context ==
/// Carries a cancellation signal and an optional deadline.
///
/// Cloning shares the same cancellation state. Backends call [`Context::check`]
/// once at entry, inside their critical section.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    // == Constructors ==
    /// A context with no deadline, cancelled only through [`Context::cancel`].
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derives a context that is cancelled whenever `self` is, but can also be
    /// cancelled on its own. The deadline is inherited.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    // == Cancellation ==
    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the cancellation token so async code can await it.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    // == Check ==
    /// Fails if the context is cancelled or its deadline has passed.
    ///
    /// `op` names the operation for the error message.
    pub fn check(&self, op: &'static str) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(CacheError::Cancelled { op });
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(CacheError::DeadlineExceeded { op })
            }
            _ => Ok(()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
