//! Cancellation token passed to lifecycle hooks.
//!
//! Every start and stop hook receives a token so callers can bound shutdown
//! work. The container never interrupts a hook forcibly; a hook that ignores
//! its token simply runs to completion (and a hung hook blocks the sequence,
//! which is the documented trade-off of ordered teardown).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token that signals cancellation to cooperating lifecycle hooks.
///
/// Tokens are cheap to clone and form parent/child chains: cancelling a
/// parent cancels every child derived from it, which suits layered shutdown
/// (process → container → individual hook).
///
/// # Examples
///
/// ```rust
/// use crucible_di::{CancellationToken, Container};
///
/// let container = Container::new();
/// container.lifecycle().on_stop(|token: &CancellationToken| {
///     if token.is_cancelled() {
///         return Ok(()); // skip slow cleanup, deadline already passed
///     }
///     Ok(())
/// });
///
/// let token = CancellationToken::new();
/// token.cancel();
/// container.close_with(&token).unwrap();
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    cancelled: AtomicBool,
    parent: Option<CancellationToken>,
}

impl CancellationToken {
    /// Creates a new, uncancelled token.
    pub fn new() -> CancellationToken {
        CancellationToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                parent: None,
            }),
        }
    }

    /// Creates a child token that reports cancelled when either it or any
    /// ancestor is cancelled. Cancelling the child leaves the parent alone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::CancellationToken;
    ///
    /// let parent = CancellationToken::new();
    /// let child = parent.child_token();
    ///
    /// parent.cancel();
    /// assert!(child.is_cancelled());
    /// ```
    pub fn child_token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once cancellation has been requested on this token or
    /// any ancestor.
    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::Acquire) {
            return true;
        }
        match &self.inner.parent {
            Some(parent) => parent.is_cancelled(),
            None => false,
        }
    }

    /// Returns an error if the token is cancelled, for hooks that want to
    /// bail out with `?`.
    pub fn check(&self) -> Result<(), CancellationError> {
        if self.is_cancelled() {
            Err(CancellationError::new("operation was cancelled"))
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Error returned by [`CancellationToken::check`] on a cancelled token.
#[derive(Debug, Clone)]
pub struct CancellationError {
    message: String,
}

impl CancellationError {
    /// Creates a new cancellation error with the given message.
    pub fn new(message: impl Into<String>) -> CancellationError {
        CancellationError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CancellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cancellation error: {}", self.message)
    }
}

impl std::error::Error for CancellationError {}
